// system-tests/src/counter.rs
// ============================================================================
// Module: Counter Domain
// Description: A minimal domain for exercising governance-allow paired with
//              a reducer-level rejection (Scenario S6).
// Purpose: Isolate that interaction from the larger story domain's noise.
// Dependencies: gov_kernel::{Action, CorrelationId, Law, LawDecision, LawId,
//               LawVerdict, Reducer, ReducerResult, State}
// ============================================================================

use gov_kernel::{Action, CorrelationId, Law, LawDecision, LawId, LawVerdict, Reducer, ReducerResult};
use serde::{Deserialize, Serialize};

/// A bare integer counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub value: i64,
}

/// A proposed counter transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAction {
    Increment { correlation_id: CorrelationId },
    Decrement { correlation_id: CorrelationId },
}

impl CounterAction {
    #[must_use]
    pub fn increment(correlation_id: impl Into<String>) -> Self {
        Self::Increment { correlation_id: CorrelationId::new(correlation_id) }
    }

    #[must_use]
    pub fn decrement(correlation_id: impl Into<String>) -> Self {
        Self::Decrement { correlation_id: CorrelationId::new(correlation_id) }
    }
}

impl Action for CounterAction {
    fn description(&self) -> String {
        match self {
            Self::Increment { .. } => "increment".to_string(),
            Self::Decrement { .. } => "decrement".to_string(),
        }
    }

    fn correlation_id(&self) -> CorrelationId {
        match self {
            Self::Increment { correlation_id } | Self::Decrement { correlation_id } => correlation_id.clone(),
        }
    }
}

/// Rejects `.decrement` at zero rather than letting the counter go
/// negative; otherwise increments or decrements by one.
pub struct CounterReducer;

impl Reducer<CounterState, CounterAction> for CounterReducer {
    fn reduce(&self, state: &CounterState, action: &CounterAction) -> ReducerResult<CounterState> {
        match action {
            CounterAction::Increment { .. } => {
                ReducerResult::accepted(CounterState { value: state.value + 1 }, "incremented")
            }
            CounterAction::Decrement { .. } => {
                if state.value == 0 {
                    ReducerResult::rejected(state.clone(), "cannot decrement below zero")
                } else {
                    ReducerResult::accepted(CounterState { value: state.value - 1 }, "decremented")
                }
            }
        }
    }
}

/// A Law with no opinion: always allows. Used to give the counter scenario
/// an active governance policy without constraining it.
pub struct AlwaysAllowLaw;

impl Law<CounterState, CounterAction> for AlwaysAllowLaw {
    fn law_id(&self) -> LawId {
        LawId::new("AlwaysAllowLaw")
    }

    fn evaluate(&self, _state: &CounterState, _action: &CounterAction) -> LawVerdict {
        LawVerdict::new(self.law_id(), LawDecision::Allow, "no constraints")
    }
}
