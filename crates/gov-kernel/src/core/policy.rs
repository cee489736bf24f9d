// gov-kernel/src/core/policy.rs
// ============================================================================
// Module: Governance Kernel Policy
// Description: An ordered set of Laws plus a composition rule and
//              jurisdiction, with pure evaluation.
// Purpose: Define `GovernancePolicy`.
// Dependencies: crate::core::{action, composition, identifiers, law, state}
// ============================================================================

//! ## Overview
//! A `GovernancePolicy` is configuration, not behavior: it holds an ordered
//! list of Laws, a [`CompositionRule`], and a [`JurisdictionId`], and
//! `evaluate` is a pure function of those plus `(state, action,
//! correlation_id)`. Same inputs always produce a bit-identical trace.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::action::Action;
use crate::core::composition::CompositionRule;
use crate::core::composition::CompositionTrace;
use crate::core::composition::compose;
use crate::core::identifiers::CorrelationId;
use crate::core::identifiers::JurisdictionId;
use crate::core::law::AnyLaw;
use crate::core::law::Law;
use crate::core::state::State;

// ============================================================================
// SECTION: GovernancePolicy
// ============================================================================

/// A configured governance policy: Laws, a composition rule, and a
/// jurisdiction label.
pub struct GovernancePolicy<S, A> {
    laws: Vec<AnyLaw<S, A>>,
    rule: CompositionRule,
    jurisdiction_id: JurisdictionId,
}

impl<S: State, A: Action> GovernancePolicy<S, A> {
    /// Builds a policy from an ordered list of Laws, a composition rule, and
    /// a jurisdiction label. Law declaration order IS evaluation order.
    #[must_use]
    pub fn new(laws: Vec<AnyLaw<S, A>>, rule: CompositionRule, jurisdiction_id: JurisdictionId) -> Self {
        Self { laws, rule, jurisdiction_id }
    }

    /// The jurisdiction this policy is responsible for.
    #[must_use]
    pub fn jurisdiction_id(&self) -> &JurisdictionId {
        &self.jurisdiction_id
    }

    /// The number of Laws in this policy.
    #[must_use]
    pub fn law_count(&self) -> usize {
        self.laws.len()
    }

    /// Evaluates every Law in declaration order and composes the verdicts.
    ///
    /// Pure function of `(state, action, self.laws, self.rule,
    /// self.jurisdiction_id, correlation_id)`: identical inputs produce a
    /// bit-identical trace.
    #[must_use]
    pub fn evaluate(&self, state: &S, action: &A, correlation_id: Option<CorrelationId>) -> CompositionTrace {
        let verdicts = self.laws.iter().map(|law| law.evaluate(state, action)).collect();
        compose(verdicts, self.rule, self.jurisdiction_id.clone(), correlation_id)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::core::identifiers::LawId;
    use crate::core::law::LawDecision;
    use crate::core::law::LawVerdict;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct Dummy;

    impl Action for Dummy {
        fn description(&self) -> String {
            "dummy".to_string()
        }

        fn correlation_id(&self) -> CorrelationId {
            CorrelationId::new("dummy")
        }
    }

    fn allow_law(id: &str) -> AnyLaw<Dummy, Dummy> {
        let law_id = LawId::new(id);
        AnyLaw::from_fn(law_id.clone(), move |_s, _a| LawVerdict::new(law_id.clone(), LawDecision::Allow, "ok"))
    }

    fn deny_law(id: &str) -> AnyLaw<Dummy, Dummy> {
        let law_id = LawId::new(id);
        AnyLaw::from_fn(law_id.clone(), move |_s, _a| LawVerdict::new(law_id.clone(), LawDecision::Deny, "no"))
    }

    #[test]
    fn evaluates_laws_in_declaration_order() {
        let policy = GovernancePolicy::new(
            vec![deny_law("First"), allow_law("Second")],
            CompositionRule::DenyWins,
            JurisdictionId::new("jid"),
        );
        let trace = policy.evaluate(&Dummy, &Dummy, None);
        assert_eq!(trace.verdicts[0].law_id, LawId::new("First"));
        assert_eq!(trace.verdicts[1].law_id, LawId::new("Second"));
        assert_eq!(trace.composed_decision, LawDecision::Deny);
    }

    #[test]
    fn same_inputs_yield_a_bit_identical_trace() {
        let policy = GovernancePolicy::new(
            vec![allow_law("A"), deny_law("B")],
            CompositionRule::DenyWins,
            JurisdictionId::new("jid"),
        );
        let first = policy.evaluate(&Dummy, &Dummy, Some(CorrelationId::new("c")));
        let second = policy.evaluate(&Dummy, &Dummy, Some(CorrelationId::new("c")));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_policy_allows() {
        let policy: GovernancePolicy<Dummy, Dummy> =
            GovernancePolicy::new(vec![], CompositionRule::DenyWins, JurisdictionId::new("jid"));
        assert_eq!(policy.evaluate(&Dummy, &Dummy, None).composed_decision, LawDecision::Allow);
    }
}
