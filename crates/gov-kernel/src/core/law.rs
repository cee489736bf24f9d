// gov-kernel/src/core/law.rs
// ============================================================================
// Module: Governance Kernel Law & Verdict
// Description: Pure predicates over `(state, action)` and their wire type.
// Purpose: Define `LawDecision`, `LawVerdict`, `Law`, and the type-erased
//          `AnyLaw`.
// Dependencies: crate::core::{action, identifiers, state}, serde
// ============================================================================

//! ## Overview
//! A Law binds a stable [`LawId`] to a pure evaluator. Laws never see each
//! other and never see the composition rule; they only judge one
//! `(state, action)` pair in isolation. The composition engine in
//! [`crate::core::composition`] is what turns many verdicts into one
//! decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::action::Action;
use crate::core::identifiers::LawId;
use crate::core::state::State;

// ============================================================================
// SECTION: LawDecision
// ============================================================================

/// One Law's decision about a proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawDecision {
    /// The action is permitted.
    Allow,
    /// The action is forbidden.
    Deny,
    /// The action requires escalation beyond automatic governance.
    Escalate,
    /// The Law has no opinion; it is excluded from composition.
    Abstain,
}

// ============================================================================
// SECTION: LawVerdict
// ============================================================================

/// A single Law's decision and reason.
///
/// Pure data: no timestamp, no identifier beyond the Law's own `law_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawVerdict {
    /// The Law that produced this verdict.
    pub law_id: LawId,
    /// The decision.
    pub decision: LawDecision,
    /// Human-readable justification.
    pub reason: String,
}

impl LawVerdict {
    /// Builds a new verdict.
    #[must_use]
    pub fn new(law_id: LawId, decision: LawDecision, reason: impl Into<String>) -> Self {
        Self { law_id, decision, reason: reason.into() }
    }
}

// ============================================================================
// SECTION: Law Trait
// ============================================================================

/// A pure predicate on `(state, action)`.
///
/// Implementations must not call time, identity, or random sources; if a
/// Law's decision depends on time or chance, that must already be embedded
/// in `state` or `action`.
pub trait Law<S: State, A: Action> {
    /// The stable identifier for this Law. Conventionally matches the
    /// implementation's name and must remain stable across versions.
    fn law_id(&self) -> LawId;

    /// Evaluates this Law against the pre-state and proposed action.
    fn evaluate(&self, state: &S, action: &A) -> LawVerdict;
}

// ============================================================================
// SECTION: Type-Erased Law
// ============================================================================

/// A type-erased [`Law`], so a [`crate::core::policy::GovernancePolicy`] can
/// hold a heterogeneous, ordered sequence of Laws over the same `(S, A)`.
pub struct AnyLaw<S, A> {
    law_id: LawId,
    evaluate: Box<dyn Fn(&S, &A) -> LawVerdict + Send + Sync>,
}

impl<S, A> std::fmt::Debug for AnyLaw<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyLaw").field("law_id", &self.law_id).finish_non_exhaustive()
    }
}

impl<S: State + 'static, A: Action + 'static> AnyLaw<S, A> {
    /// Wraps a concrete Law.
    pub fn new<L>(law: L) -> Self
    where
        L: Law<S, A> + Send + Sync + 'static,
    {
        let law_id = law.law_id();
        Self { law_id, evaluate: Box::new(move |state, action| law.evaluate(state, action)) }
    }

    /// Builds an `AnyLaw` directly from a closure and an explicit `law_id`,
    /// for Laws that are more naturally expressed as a function than a
    /// named type.
    pub fn from_fn<F>(law_id: impl Into<LawId>, evaluate: F) -> Self
    where
        F: Fn(&S, &A) -> LawVerdict + Send + Sync + 'static,
    {
        Self { law_id: law_id.into(), evaluate: Box::new(evaluate) }
    }
}

impl<S: State, A: Action> Law<S, A> for AnyLaw<S, A> {
    fn law_id(&self) -> LawId {
        self.law_id.clone()
    }

    fn evaluate(&self, state: &S, action: &A) -> LawVerdict {
        (self.evaluate)(state, action)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::core::identifiers::CorrelationId;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct Health(i64);

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct TakeDamage(i64);

    impl Action for TakeDamage {
        fn description(&self) -> String {
            format!("take {} damage", self.0)
        }

        fn correlation_id(&self) -> CorrelationId {
            CorrelationId::new("take-damage")
        }
    }

    struct GameOverLaw;

    impl Law<Health, TakeDamage> for GameOverLaw {
        fn law_id(&self) -> LawId {
            LawId::new("GameOverLaw")
        }

        fn evaluate(&self, state: &Health, _action: &TakeDamage) -> LawVerdict {
            if state.0 <= 0 {
                LawVerdict::new(self.law_id(), LawDecision::Deny, "game is already over")
            } else {
                LawVerdict::new(self.law_id(), LawDecision::Allow, "player is alive")
            }
        }
    }

    #[test]
    fn any_law_preserves_the_law_id() {
        let erased: AnyLaw<Health, TakeDamage> = AnyLaw::new(GameOverLaw);
        assert_eq!(erased.law_id(), LawId::new("GameOverLaw"));
    }

    #[test]
    fn any_law_evaluates_through_the_wrapped_closure() {
        let erased: AnyLaw<Health, TakeDamage> = AnyLaw::new(GameOverLaw);
        let verdict = erased.evaluate(&Health(0), &TakeDamage(10));
        assert_eq!(verdict.decision, LawDecision::Deny);
    }

    #[test]
    fn from_fn_builds_a_law_from_a_closure_and_explicit_id() {
        let law: AnyLaw<Health, TakeDamage> =
            AnyLaw::from_fn("AlwaysAllow", |_state, _action| {
                LawVerdict::new(LawId::new("AlwaysAllow"), LawDecision::Allow, "no-op")
            });
        assert_eq!(law.law_id(), LawId::new("AlwaysAllow"));
        assert_eq!(law.evaluate(&Health(1), &TakeDamage(1)).decision, LawDecision::Allow);
    }

    #[test]
    fn decision_encodes_as_a_stable_snake_case_string() {
        let json = serde_json::to_string(&LawDecision::Escalate).expect("serializable");
        assert_eq!(json, "\"escalate\"");
    }
}
