// gov-kernel/src/core/composition.rs
// ============================================================================
// Module: Governance Kernel Composition Engine
// Description: Pure `(verdicts, rule) -> CompositionTrace` combinator.
// Purpose: Turn an ordered list of Law verdicts into one composed decision,
//          with a full trace of the reasoning.
// Dependencies: crate::core::{identifiers, law}, serde
// ============================================================================

//! ## Overview
//! The composition engine is a pure function: the same `(verdicts, rule,
//! jurisdiction_id, correlation_id)` tuple always produces a bit-identical
//! [`CompositionTrace`]. It is the only place the four composition rules are
//! implemented; [`crate::core::policy::GovernancePolicy`] is a thin caller
//! that gathers verdicts and delegates here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CorrelationId;
use crate::core::identifiers::JurisdictionId;
use crate::core::law::LawDecision;
use crate::core::law::LawVerdict;

// ============================================================================
// SECTION: CompositionRule
// ============================================================================

/// The algorithm used to combine a list of verdicts into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionRule {
    /// Any `Deny` wins over everything; otherwise any `Escalate` wins;
    /// otherwise `Allow`.
    DenyWins,
    /// Every active verdict must be `Allow`; a single `Deny` forces `Deny`,
    /// anything else forces `Escalate`.
    UnanimousAllow,
    /// A strict majority of active verdicts must be `Allow`; ties and
    /// non-majorities resolve to `Deny` (if any) or `Escalate`.
    MajorityAllow,
}

// ============================================================================
// SECTION: CompositionTrace
// ============================================================================

/// The full, ordered record of what each Law decided and what the
/// composition rule produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionTrace {
    /// Verdicts in evaluation order. Order IS meaning: it is the order the
    /// Laws were declared in the policy.
    pub verdicts: Vec<LawVerdict>,
    /// The rule used to combine `verdicts`.
    pub rule: CompositionRule,
    /// The combined decision.
    pub composed_decision: LawDecision,
    /// The jurisdiction responsible for this trace.
    pub jurisdiction_id: JurisdictionId,
    /// An opaque correlation identifier, passed through verbatim from the
    /// caller. Not checked against `action.correlation_id()` — see the
    /// open question recorded in `DESIGN.md`.
    pub correlation_id: Option<CorrelationId>,
}

// ============================================================================
// SECTION: compose
// ============================================================================

/// Combines `verdicts` under `rule` into a [`CompositionTrace`].
///
/// Deterministic: re-running with identical arguments yields a bit-identical
/// trace. Rule semantics, summarized here:
///
/// - Empty verdicts, or all verdicts `Abstain`: `Allow`.
/// - `DenyWins`: any `Deny` among the active (non-abstain) verdicts wins;
///   otherwise any `Escalate` wins; otherwise `Allow`.
/// - `UnanimousAllow`: all active verdicts `Allow` wins; else any `Deny`
///   forces `Deny`; else `Escalate`.
/// - `MajorityAllow`: a strict majority (`allow_count * 2 > active.len()`)
///   of active verdicts `Allow` wins; else any `Deny` forces `Deny`; else
///   `Escalate`. Ties never resolve to `Allow`.
#[must_use]
pub fn compose(
    verdicts: Vec<LawVerdict>,
    rule: CompositionRule,
    jurisdiction_id: JurisdictionId,
    correlation_id: Option<CorrelationId>,
) -> CompositionTrace {
    let active: Vec<&LawVerdict> =
        verdicts.iter().filter(|verdict| verdict.decision != LawDecision::Abstain).collect();

    let composed_decision = if active.is_empty() {
        LawDecision::Allow
    } else {
        match rule {
            CompositionRule::DenyWins => resolve_deny_wins(&active),
            CompositionRule::UnanimousAllow => resolve_unanimous_allow(&active),
            CompositionRule::MajorityAllow => resolve_majority_allow(&active),
        }
    };

    CompositionTrace { verdicts, rule, composed_decision, jurisdiction_id, correlation_id }
}

fn resolve_deny_wins(active: &[&LawVerdict]) -> LawDecision {
    if active.iter().any(|verdict| verdict.decision == LawDecision::Deny) {
        LawDecision::Deny
    } else if active.iter().any(|verdict| verdict.decision == LawDecision::Escalate) {
        LawDecision::Escalate
    } else {
        LawDecision::Allow
    }
}

fn resolve_unanimous_allow(active: &[&LawVerdict]) -> LawDecision {
    if active.iter().all(|verdict| verdict.decision == LawDecision::Allow) {
        LawDecision::Allow
    } else if active.iter().any(|verdict| verdict.decision == LawDecision::Deny) {
        LawDecision::Deny
    } else {
        LawDecision::Escalate
    }
}

fn resolve_majority_allow(active: &[&LawVerdict]) -> LawDecision {
    let allow_count = active.iter().filter(|verdict| verdict.decision == LawDecision::Allow).count();
    if allow_count * 2 > active.len() {
        LawDecision::Allow
    } else if active.iter().any(|verdict| verdict.decision == LawDecision::Deny) {
        LawDecision::Deny
    } else {
        LawDecision::Escalate
    }
}
