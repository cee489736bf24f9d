// gov-kernel/tests/proptest_invariants.rs
// ============================================================================
// Module: Universal Invariant Property Tests
// Description: Property-based tests for the kernel's core invariants: state
//              hash stability, reducer-rejection state preservation,
//              composition determinism, and abstain neutrality.
// Purpose: Check these invariants across wide, randomly generated inputs
//          rather than a handful of hand-picked examples.
// Dependencies: gov_kernel, proptest
// ============================================================================

use gov_kernel::{
    Action, CompositionRule, CorrelationId, JurisdictionId, LawDecision, LawId, LawVerdict, Reducer, ReducerResult,
    State, compose,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Counter {
    value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Increment {
    by: i64,
    correlation_id: CorrelationId,
}

impl Action for Increment {
    fn description(&self) -> String {
        format!("increment by {}", self.by)
    }

    fn correlation_id(&self) -> CorrelationId {
        self.correlation_id.clone()
    }
}

struct CounterReducer;

impl Reducer<Counter, Increment> for CounterReducer {
    fn reduce(&self, state: &Counter, action: &Increment) -> ReducerResult<Counter> {
        if action.by < 0 {
            return ReducerResult::rejected(state.clone(), "negative increment rejected");
        }
        ReducerResult::accepted(Counter { value: state.value + action.by }, "accepted")
    }
}

fn law_decision_strategy() -> impl Strategy<Value = LawDecision> {
    prop_oneof![
        Just(LawDecision::Allow),
        Just(LawDecision::Deny),
        Just(LawDecision::Escalate),
        Just(LawDecision::Abstain),
    ]
}

fn composition_rule_strategy() -> impl Strategy<Value = CompositionRule> {
    prop_oneof![
        Just(CompositionRule::DenyWins),
        Just(CompositionRule::UnanimousAllow),
        Just(CompositionRule::MajorityAllow),
    ]
}

fn verdicts_strategy() -> impl Strategy<Value = Vec<LawVerdict>> {
    prop::collection::vec(law_decision_strategy(), 0..12).prop_map(|decisions| {
        decisions
            .into_iter()
            .enumerate()
            .map(|(index, decision)| LawVerdict::new(LawId::new(format!("law-{index}")), decision, "generated"))
            .collect()
    })
}

proptest! {
    /// Invariant 2: a reducer that rejects an action echoes the input state
    /// back unchanged, by both equality and hash.
    #[test]
    fn rejected_reducer_result_preserves_the_input_state(initial in any::<i64>(), by in i64::MIN..0i64) {
        let state = Counter { value: initial };
        let action = Increment { by, correlation_id: CorrelationId::new("c1") };
        let result = CounterReducer.reduce(&state, &action);

        prop_assert!(!result.applied);
        prop_assert_eq!(&result.new_state, &state);
        prop_assert_eq!(result.new_state.state_hash(), state.state_hash());
    }

    /// Invariant 3: two encodings of the same state value yield identical
    /// `stateHash()`, stable across repeated calls.
    #[test]
    fn state_hash_is_determined_by_value_and_stable(value in any::<i64>()) {
        let a = Counter { value };
        let b = Counter { value };
        prop_assert_eq!(a.state_hash(), b.state_hash());
        prop_assert_eq!(a.state_hash(), a.state_hash());
    }

    /// Invariant 4: composing the same verdicts under the same rule twice
    /// yields a bit-identical trace.
    #[test]
    fn composition_is_deterministic(
        verdicts in verdicts_strategy(),
        rule in composition_rule_strategy(),
    ) {
        let jurisdiction_id = JurisdictionId::new("proptest-jurisdiction");
        let correlation_id = Some(CorrelationId::new("c1"));

        let first = compose(verdicts.clone(), rule, jurisdiction_id.clone(), correlation_id.clone());
        let second = compose(verdicts, rule, jurisdiction_id, correlation_id);
        prop_assert_eq!(first, second);
    }

    /// Invariant 8: removing `Abstain` verdicts never changes the composed
    /// decision, for any rule.
    #[test]
    fn abstain_verdicts_do_not_affect_the_composed_decision(
        verdicts in verdicts_strategy(),
        rule in composition_rule_strategy(),
    ) {
        let without_abstains: Vec<LawVerdict> =
            verdicts.iter().filter(|verdict| verdict.decision != LawDecision::Abstain).cloned().collect();

        let jurisdiction_id = JurisdictionId::new("proptest-jurisdiction");
        let with = compose(verdicts, rule, jurisdiction_id.clone(), None).composed_decision;
        let without = compose(without_abstains, rule, jurisdiction_id, None).composed_decision;
        prop_assert_eq!(with, without);
    }
}
