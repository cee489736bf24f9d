// gov-kernel/src/runtime/orchestrator.rs
// ============================================================================
// Module: Governance Kernel Orchestrator
// Description: Serialized apply loop sequencing proposal, governance,
//              reduction, audit append, and observer broadcast.
// Purpose: The single canonical execution path for the kernel. All external
//          submission must route through here to preserve the audit chain.
// Dependencies: crate::{core, determinism, runtime}, std::sync::Arc,
//               tokio::sync::{Mutex, broadcast}
// ============================================================================

//! ## Overview
//! The orchestrator is the only place the kernel's four subsystems meet. It
//! never contains domain semantics itself — those live in the reducer and
//! the Laws it is handed at construction. Every external mutation funnels
//! through [`Orchestrator::apply`], which is serialized by an internal
//! mutex: concurrent callers are admitted but totally ordered by the time
//! they acquire it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::broadcast;

use crate::core::action::Action;
use crate::core::audit::AuditEvent;
use crate::core::identifiers::AgentId;
use crate::core::identifiers::JurisdictionId;
use crate::core::law::LawDecision;
use crate::core::policy::GovernancePolicy;
use crate::core::reducer::Reducer;
use crate::core::reducer::ReducerResult;
use crate::core::state::State;
use crate::determinism::Clock;
use crate::determinism::IdentifierGenerator;
use crate::runtime::agent::Agent;
use crate::runtime::error::OrchestratorError;
use crate::runtime::log::EventLog;

/// The replay-driver's default agent identifier, per the `submit`/`replay`
/// convention described in the external interfaces.
pub const REPLAY_AGENT_ID: &str = "REPLAY";

const BROADCAST_CAPACITY: usize = 256;

// ============================================================================
// SECTION: StateStream
// ============================================================================

/// A subscription to an orchestrator's state broadcast: delivers the
/// current state first, then every subsequent post-transition state.
pub struct StateStream<S> {
    initial: Option<S>,
    receiver: broadcast::Receiver<S>,
}

impl<S: Clone + Send + 'static> StateStream<S> {
    /// Awaits the next state. The first call always returns the snapshot
    /// taken at subscription time; later calls forward the broadcast
    /// channel, skipping over any lag by re-polling once.
    pub async fn recv(&mut self) -> Option<S> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.recv().await {
                Ok(state) => return Some(state),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

// ============================================================================
// SECTION: Orchestrator Internals
// ============================================================================

struct Critical<S, A> {
    state: S,
    log: EventLog<A>,
}

/// The serialized apply loop: current state, reducer, determinism sources,
/// an optional governance policy, the append-only event log, and the
/// observer broadcast channel.
pub struct Orchestrator<S, A, R> {
    critical: Mutex<Critical<S, A>>,
    reducer: R,
    clock: Arc<dyn Clock>,
    identifiers: Arc<dyn IdentifierGenerator>,
    policy: Option<GovernancePolicy<S, A>>,
    broadcaster: broadcast::Sender<S>,
}

impl<S, A, R> Orchestrator<S, A, R>
where
    S: State + Send + 'static,
    A: Action + Send + 'static,
    R: Reducer<S, A>,
{
    /// Builds a new orchestrator, appending the `Initialization` event and
    /// emitting the initial state on the broadcast channel.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::JurisdictionMismatch`] when `policy` is
    /// supplied and its jurisdiction does not match `jurisdiction_id`.
    /// Returns [`OrchestratorError::InitialStateHash`] when `initial_state`
    /// cannot be canonically hashed.
    pub fn new(
        initial_state: S,
        reducer: R,
        clock: Arc<dyn Clock>,
        identifiers: Arc<dyn IdentifierGenerator>,
        jurisdiction_id: JurisdictionId,
        policy: Option<GovernancePolicy<S, A>>,
    ) -> Result<Self, OrchestratorError> {
        if let Some(policy) = &policy {
            if policy.jurisdiction_id() != &jurisdiction_id {
                return Err(OrchestratorError::JurisdictionMismatch {
                    expected: jurisdiction_id,
                    found: policy.jurisdiction_id().clone(),
                });
            }
        }

        let state_hash =
            initial_state.try_state_hash().map_err(|error| OrchestratorError::InitialStateHash(error.to_string()))?;

        let mut log = EventLog::new();
        log.append(AuditEvent::initialization(identifiers.next(), clock.now(), state_hash));

        let (broadcaster, _) = broadcast::channel(BROADCAST_CAPACITY);
        let _ = broadcaster.send(initial_state.clone());

        Ok(Self {
            critical: Mutex::new(Critical { state: initial_state, log }),
            reducer,
            clock,
            identifiers,
            policy,
            broadcaster,
        })
    }

    /// The single mutation entry point. Governance is checked first when a
    /// policy is configured; a `Deny` or `Escalate` verdict short-circuits
    /// the reducer entirely.
    pub async fn apply(&self, action: A, agent_id: AgentId) -> ReducerResult<S> {
        let mut critical = self.critical.lock().await;
        let hash_before = critical.state.state_hash();
        let correlation_id = action.correlation_id();

        let Some(policy) = &self.policy else {
            return self.apply_ungoverned(&mut critical, action, agent_id, &hash_before);
        };

        let trace = match Self::evaluate_guarded(policy, &critical.state, &action, Some(correlation_id)) {
            Ok(trace) => trace,
            Err(reason) => {
                let event = AuditEvent::rejected(
                    self.identifiers.next(),
                    self.clock.now(),
                    action,
                    agent_id,
                    &hash_before,
                    reason.clone(),
                );
                critical.log.append(event);
                let _ = self.broadcaster.send(critical.state.clone());
                return ReducerResult::rejected(critical.state.clone(), reason);
            }
        };

        if matches!(trace.composed_decision, LawDecision::Deny | LawDecision::Escalate) {
            let event = AuditEvent::governance_denied(
                self.identifiers.next(),
                self.clock.now(),
                action,
                agent_id,
                &hash_before,
                trace,
            );
            critical.log.append(event);
            let _ = self.broadcaster.send(critical.state.clone());
            return ReducerResult::rejected(critical.state.clone(), "Governance denied");
        }

        let outcome = Self::run_reducer_guarded(&self.reducer, &critical.state, &action);
        let event = if outcome.applied {
            critical.state = outcome.new_state.clone();
            AuditEvent::accepted_with_governance(
                self.identifiers.next(),
                self.clock.now(),
                action,
                agent_id,
                &hash_before,
                critical.state.state_hash(),
                outcome.rationale.clone(),
                trace,
            )
        } else {
            AuditEvent::rejected_with_governance(
                self.identifiers.next(),
                self.clock.now(),
                action,
                agent_id,
                &hash_before,
                outcome.rationale.clone(),
                trace,
            )
        };
        critical.log.append(event);
        let _ = self.broadcaster.send(critical.state.clone());
        outcome
    }

    fn apply_ungoverned(
        &self,
        critical: &mut Critical<S, A>,
        action: A,
        agent_id: AgentId,
        hash_before: &str,
    ) -> ReducerResult<S> {
        let outcome = Self::run_reducer_guarded(&self.reducer, &critical.state, &action);
        let event = if outcome.applied {
            critical.state = outcome.new_state.clone();
            AuditEvent::accepted(
                self.identifiers.next(),
                self.clock.now(),
                action,
                agent_id,
                hash_before,
                critical.state.state_hash(),
                outcome.rationale.clone(),
            )
        } else {
            AuditEvent::rejected(self.identifiers.next(), self.clock.now(), action, agent_id, hash_before, outcome.rationale.clone())
        };
        critical.log.append(event);
        let _ = self.broadcaster.send(critical.state.clone());
        outcome
    }

    fn run_reducer_guarded(reducer: &R, state: &S, action: &A) -> ReducerResult<S> {
        match std::panic::catch_unwind(AssertUnwindSafe(|| reducer.reduce(state, action))) {
            Ok(result) => result,
            Err(_) => ReducerResult::rejected(state.clone(), "Reducer panicked during execution"),
        }
    }

    fn evaluate_guarded(
        policy: &GovernancePolicy<S, A>,
        state: &S,
        action: &A,
        correlation_id: Option<crate::core::identifiers::CorrelationId>,
    ) -> Result<crate::core::composition::CompositionTrace, String> {
        std::panic::catch_unwind(AssertUnwindSafe(|| policy.evaluate(state, action, correlation_id)))
            .map_err(|_| "Law evaluation panicked during execution".to_string())
    }

    /// Submits an action under an explicit agent identity. Equivalent to
    /// [`Orchestrator::apply`]; kept as a distinct name for call-site
    /// clarity at the external interface.
    pub async fn submit(&self, action: A, agent_id: AgentId) -> ReducerResult<S> {
        self.apply(action, agent_id).await
    }

    /// Replays an action under the `"REPLAY"` agent identity convention.
    /// Not a distinct code path: it is the same transition logic driven by
    /// an external driver.
    pub async fn replay(&self, action: A) -> ReducerResult<S> {
        self.apply(action, AgentId::new(REPLAY_AGENT_ID)).await
    }

    /// Drives `agent.propose` outside the serialized region, catching a
    /// panicking proposer and converting it into a rejection before it ever
    /// reaches the critical section.
    pub async fn submit_from_agent<Ag: Agent<S, A>>(&self, agent: &Ag, agent_id: AgentId) -> ReducerResult<S> {
        let snapshot = self.current_state().await;
        match std::panic::catch_unwind(AssertUnwindSafe(|| agent.propose(&snapshot))) {
            Ok(action) => self.apply(action, agent_id).await,
            Err(_) => ReducerResult::rejected(snapshot, "Agent proposal panicked during execution"),
        }
    }

    /// Records a `SystemEvent` with no state mutation.
    pub async fn record_system_event(&self, description: impl Into<String>) -> AuditEvent<A> {
        let mut critical = self.critical.lock().await;
        let hash = critical.state.state_hash();
        let event = AuditEvent::system_event(self.identifiers.next(), self.clock.now(), description, hash);
        critical.log.append(event.clone());
        let _ = self.broadcaster.send(critical.state.clone());
        event
    }

    /// Restores state from an external snapshot, recording a
    /// `StateRestored` event. Chain verification cannot replay across this
    /// boundary; it is an explicit escape hatch, not part of the ordinary
    /// apply loop.
    pub async fn restore_state(&self, new_state: S, source: impl Into<String>) {
        let mut critical = self.critical.lock().await;
        let hash_before = critical.state.state_hash();
        let hash_after = new_state.state_hash();
        let event = AuditEvent::state_restored(self.identifiers.next(), self.clock.now(), source, hash_before, hash_after);
        critical.state = new_state;
        critical.log.append(event);
        let _ = self.broadcaster.send(critical.state.clone());
    }

    /// A read-only snapshot of the current state.
    pub async fn current_state(&self) -> S {
        self.critical.lock().await.state.clone()
    }

    /// Subscribes to the state broadcast; the returned stream yields the
    /// current state first, then every subsequent post-transition state.
    pub async fn state_stream(&self) -> StateStream<S> {
        let receiver = self.broadcaster.subscribe();
        let initial = self.current_state().await;
        StateStream { initial: Some(initial), receiver }
    }

    /// A value snapshot of the audit log accumulated so far.
    pub async fn audit_log(&self) -> EventLog<A> {
        self.critical.lock().await.log.clone()
    }
}
