// gov-kernel/src/core/reducer.rs
// ============================================================================
// Module: Governance Kernel Reducer
// Description: Pure state-transition function and its result discriminant.
// Purpose: Define `Reducer`, `ReducerResult`, and a type-erased wrapper.
// Dependencies: crate::core::{action, state}
// ============================================================================

//! ## Overview
//! A reducer is the only place domain semantics enter the kernel. It must be
//! pure: no I/O, no globals, no access to [`crate::determinism`]. If
//! randomness or time affects the reducer's decision, it must arrive already
//! embedded in the `State` or `Action` values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::action::Action;
use crate::core::state::State;

// ============================================================================
// SECTION: ReducerResult
// ============================================================================

/// The outcome of applying an action to a state.
///
/// # Invariants
/// - If `applied == false`, `new_state` equals the input state by both
///   equality and hash.
#[derive(Debug, Clone)]
pub struct ReducerResult<S> {
    /// The resulting state. Equal to the input state when `applied` is
    /// `false`.
    pub new_state: S,
    /// Whether the reducer accepted the action.
    pub applied: bool,
    /// Human-readable explanation of the outcome.
    pub rationale: String,
}

impl<S: State> ReducerResult<S> {
    /// Builds an accepted result.
    #[must_use]
    pub fn accepted(new_state: S, rationale: impl Into<String>) -> Self {
        Self { new_state, applied: true, rationale: rationale.into() }
    }

    /// Builds a rejected result. `original_state` is echoed back unchanged,
    /// preserving the invariant that a rejection never mutates state.
    #[must_use]
    pub fn rejected(original_state: S, rationale: impl Into<String>) -> Self {
        Self { new_state: original_state, applied: false, rationale: rationale.into() }
    }
}

// ============================================================================
// SECTION: Reducer Trait
// ============================================================================

/// A pure state-transition function.
pub trait Reducer<S: State, A: Action> {
    /// Applies `action` to `state`, returning the outcome.
    ///
    /// Must not perform I/O or consult ambient time, identity, or
    /// randomness.
    fn reduce(&self, state: &S, action: &A) -> ReducerResult<S>;
}

impl<S: State, A: Action, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> ReducerResult<S>,
{
    fn reduce(&self, state: &S, action: &A) -> ReducerResult<S> {
        self(state, action)
    }
}

// ============================================================================
// SECTION: Type-Erased Reducer
// ============================================================================

/// A type-erased [`Reducer`], so heterogeneous reducer implementations over
/// the same `(S, A)` can be stored interchangeably.
pub struct AnyReducer<S, A> {
    evaluate: Box<dyn Fn(&S, &A) -> ReducerResult<S> + Send + Sync>,
}

impl<S: State, A: Action> AnyReducer<S, A> {
    /// Wraps a concrete reducer.
    pub fn new<R>(reducer: R) -> Self
    where
        R: Reducer<S, A> + Send + Sync + 'static,
        S: 'static,
        A: 'static,
    {
        Self { evaluate: Box::new(move |state, action| reducer.reduce(state, action)) }
    }
}

impl<S: State, A: Action> Reducer<S, A> for AnyReducer<S, A> {
    fn reduce(&self, state: &S, action: &A) -> ReducerResult<S> {
        (self.evaluate)(state, action)
    }
}
