// gov-kernel/src/runtime/agent.rs
// ============================================================================
// Module: Governance Kernel Agent Contract
// Description: The external proposer interface the orchestrator drives.
// Purpose: Pin down the one capability the kernel consumes from a
//          probabilistic agent without constraining how it decides.
// Dependencies: crate::core::{action, state}
// ============================================================================

//! ## Overview
//! `Agent` is deliberately thin: `propose` takes an immutable state snapshot
//! and returns an action. The kernel never inspects *how* that decision was
//! made; it only ever sees the result, and only at the orchestrator boundary
//! where a panicking proposer is caught and turned into a rejection rather
//! than allowed to unwind into the serialized region.

use crate::core::action::Action;
use crate::core::state::State;

/// A stochastic proposer of state transitions. Implementations are external
/// to the kernel; the kernel never instantiates one.
pub trait Agent<S: State, A: Action>: Send + Sync {
    /// Proposes an action given the current state. May be nondeterministic;
    /// the kernel makes no assumptions about reproducibility here.
    fn propose(&self, state: &S) -> A;
}
