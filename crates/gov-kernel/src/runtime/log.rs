// gov-kernel/src/runtime/log.rs
// ============================================================================
// Module: Governance Kernel Event Log
// Description: Hash-chained, append-only audit log with verification, replay
//              verification, and query helpers.
// Purpose: Make tampering with history detectable and make the entire run
//          reconstructible from its initial state alone.
// Dependencies: crate::core::{action, audit, hashing, identifiers, reducer,
//               state, time}, thiserror
// ============================================================================

//! ## Overview
//! [`EventLog`] never rewrites an entry once appended. [`EventLog::append`]
//! is the fast, trusting path used by the orchestrator, which always knows
//! the current chain tail; [`EventLog::append_validating`] is for callers
//! (tests, external drivers) that want the precondition enforced instead of
//! assumed. [`EventLog::verify`] checks chain integrity alone;
//! [`EventLog::verify_replay`] additionally re-derives every state transition
//! from a reducer and an initial state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::action::Action;
use crate::core::audit::{AuditEvent, AuditEventType};
use crate::core::identifiers::{AgentId, CorrelationId, EventId};
use crate::core::reducer::Reducer;
use crate::core::state::State;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: ChainDiscontinuity
// ============================================================================

/// Failure of `appendValidating`'s precondition: the candidate event's
/// `state_hash_before` does not match the log's current tail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chain discontinuity at index {index}: expected state hash {expected}, found {found}")]
pub struct ChainDiscontinuity {
    /// The log's current `stateHashAfter`.
    pub expected: String,
    /// The candidate event's `stateHashBefore`.
    pub found: String,
    /// The index the candidate would have occupied.
    pub index: usize,
}

// ============================================================================
// SECTION: VerificationResult
// ============================================================================

/// The outcome of [`EventLog::verify`] or [`EventLog::verify_replay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the log passed every check.
    pub is_valid: bool,
    /// The index of the first entry that failed a check, if any.
    pub broken_at_index: Option<usize>,
    /// A human-readable description of the failure, if any.
    pub failure_reason: Option<String>,
}

impl VerificationResult {
    fn valid() -> Self {
        Self { is_valid: true, broken_at_index: None, failure_reason: None }
    }

    fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Self { is_valid: false, broken_at_index: Some(index), failure_reason: Some(reason.into()) }
    }
}

// ============================================================================
// SECTION: EventLog
// ============================================================================

/// An ordered, hash-chained sequence of [`AuditEvent`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog<A> {
    entries: Vec<AuditEvent<A>>,
}

impl<A> Default for EventLog<A> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<A> EventLog<A> {
    /// Rebuilds a log from a previously persisted, already-ordered
    /// sequence of entries without re-deriving `previous_entry_hash` the
    /// way [`Self::append`] would. Callers loading a log from storage (or
    /// a test constructing a deliberately malformed one) should use this
    /// rather than replaying every entry through `append`.
    #[must_use]
    pub fn from_entries(entries: Vec<AuditEvent<A>>) -> Self {
        Self { entries }
    }
}

impl<A: Serialize> EventLog<A> {
    /// Builds an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The hash of the most recently appended entry, or an empty string if
    /// the log is empty.
    #[must_use]
    pub fn last_entry_hash(&self) -> String {
        self.entries.last().map(AuditEvent::entry_hash).unwrap_or_default()
    }

    /// Returns the entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[AuditEvent<A>] {
        &self.entries
    }

    /// Appends `event`, unconditionally overwriting its
    /// `previous_entry_hash` with the log's current tail hash.
    pub fn append(&mut self, mut event: AuditEvent<A>) {
        event.previous_entry_hash = self.last_entry_hash();
        self.entries.push(event);
    }

    /// Appends `event` after checking that its `state_hash_before` matches
    /// the log's current tail state hash. Fails closed: on error, the log is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ChainDiscontinuity`] when the precondition does not hold.
    pub fn append_validating(&mut self, event: AuditEvent<A>) -> Result<(), ChainDiscontinuity> {
        if let Some(tail) = self.entries.last() {
            if event.state_hash_before != tail.state_hash_after {
                return Err(ChainDiscontinuity {
                    expected: tail.state_hash_after.clone(),
                    found: event.state_hash_before.clone(),
                    index: self.entries.len(),
                });
            }
        }
        self.append(event);
        Ok(())
    }

    /// Checks chain integrity alone: hash continuity and state-hash
    /// continuity between consecutive entries. Does not consult a reducer.
    #[must_use]
    pub fn verify(&self) -> VerificationResult {
        let Some(first) = self.entries.first() else {
            return VerificationResult::valid();
        };
        if !first.previous_entry_hash.is_empty() {
            return VerificationResult::invalid(0, "First entry must have an empty previous hash");
        }
        for index in 1..self.entries.len() {
            let previous = &self.entries[index - 1];
            let current = &self.entries[index];
            if current.state_hash_before != previous.state_hash_after {
                return VerificationResult::invalid(index, "State hash mismatch");
            }
            if current.previous_entry_hash != previous.entry_hash() {
                return VerificationResult::invalid(index, "Hash chain broken");
            }
        }
        VerificationResult::valid()
    }
}

impl<A: Action> EventLog<A> {
    /// Verifies chain integrity, then replays every entry against
    /// `initial_state` using `reducer`, checking that every recorded hash
    /// and `applied` flag is reproducible from the initial state alone.
    #[must_use]
    pub fn verify_replay<S: State, R: Reducer<S, A>>(
        &self,
        initial_state: &S,
        reducer: &R,
    ) -> VerificationResult {
        let chain_check = self.verify();
        if !chain_check.is_valid {
            return chain_check;
        }

        let mut state = initial_state.clone();
        let mut computed_hash = initial_state.state_hash();

        for (index, entry) in self.entries.iter().enumerate() {
            match &entry.event_type {
                AuditEventType::Initialization => {
                    if index == 0 {
                        if entry.state_hash_after != computed_hash {
                            return VerificationResult::invalid(
                                index,
                                "Initialization state hash does not match initial state",
                            );
                        }
                    } else if entry.state_hash_before != computed_hash {
                        return VerificationResult::invalid(
                            index,
                            "Initialization state hash before does not match replay state",
                        );
                    }
                }
                AuditEventType::ActionProposed { action, .. } => {
                    if entry.state_hash_before != computed_hash {
                        return VerificationResult::invalid(
                            index,
                            "Action proposed state hash before does not match replay state",
                        );
                    }
                    let result = reducer.reduce(&state, action);
                    if result.applied != entry.applied {
                        return VerificationResult::invalid(
                            index,
                            "Replayed applied flag does not match recorded applied flag",
                        );
                    }
                    if result.applied {
                        state = result.new_state;
                    }
                    computed_hash = state.state_hash();
                    if entry.state_hash_after != computed_hash {
                        return VerificationResult::invalid(
                            index,
                            "Replayed state hash does not match recorded state hash after",
                        );
                    }
                }
                AuditEventType::SystemEvent { .. } | AuditEventType::GovernanceDenied { .. } => {
                    if entry.state_hash_before != entry.state_hash_after {
                        return VerificationResult::invalid(
                            index,
                            "Unmutating event must carry identical before and after hashes",
                        );
                    }
                    if entry.state_hash_before != computed_hash {
                        return VerificationResult::invalid(
                            index,
                            "Unmutating event hash does not match replay state",
                        );
                    }
                }
                AuditEventType::StateRestored { .. } => {
                    return VerificationResult::invalid(
                        index,
                        "Cannot verify replay across a state restoration",
                    );
                }
            }
        }

        VerificationResult::valid()
    }

    /// Returns every `ActionProposed` action together with its proposing
    /// agent, in log order.
    #[must_use]
    pub fn actions(&self) -> Vec<(&A, &AgentId)> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event_type {
                AuditEventType::ActionProposed { action, agent_id } => Some((action, agent_id)),
                _ => None,
            })
            .collect()
    }

    /// Returns every `ActionProposed` entry whose reducer accepted it.
    #[must_use]
    pub fn accepted_actions(&self) -> Vec<(&A, &AgentId)> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event_type {
                AuditEventType::ActionProposed { action, agent_id } if entry.applied => {
                    Some((action, agent_id))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns every `ActionProposed` entry the reducer rejected, together
    /// with its rationale.
    #[must_use]
    pub fn rejected_actions(&self) -> Vec<(&A, &AgentId, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event_type {
                AuditEventType::ActionProposed { action, agent_id } if !entry.applied => {
                    Some((action, agent_id, entry.rationale.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns every `GovernanceDenied` entry's action, agent, and trace.
    #[must_use]
    pub fn governance_denied_actions(
        &self,
    ) -> Vec<(&A, &AgentId, Option<&crate::core::composition::CompositionTrace>)> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.event_type {
                AuditEventType::GovernanceDenied { action, agent_id } => {
                    Some((action, agent_id, entry.governance_trace.as_ref()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns every entry with a timestamp in `[from, to]`, inclusive.
    #[must_use]
    pub fn between(&self, from: Timestamp, to: Timestamp) -> Vec<&AuditEvent<A>> {
        self.entries.iter().filter(|entry| entry.timestamp >= from && entry.timestamp <= to).collect()
    }

    /// Returns every `ActionProposed` or `GovernanceDenied` entry
    /// attributed to `agent_id`.
    #[must_use]
    pub fn for_agent(&self, agent_id: &AgentId) -> Vec<&AuditEvent<A>> {
        self.entries
            .iter()
            .filter(|entry| match &entry.event_type {
                AuditEventType::ActionProposed { agent_id: candidate, .. }
                | AuditEventType::GovernanceDenied { agent_id: candidate, .. } => candidate == agent_id,
                _ => false,
            })
            .collect()
    }

    /// Returns every entry carrying `correlation_id` in its governance
    /// trace, if any.
    #[must_use]
    pub fn for_correlation(&self, correlation_id: &CorrelationId) -> Vec<&AuditEvent<A>> {
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .governance_trace
                    .as_ref()
                    .is_some_and(|trace| trace.correlation_id.as_ref() == Some(correlation_id))
            })
            .collect()
    }

    /// Returns the entry with the given id, if present.
    #[must_use]
    pub fn find(&self, id: &EventId) -> Option<&AuditEvent<A>> {
        self.entries.iter().find(|entry| entry.id == *id)
    }
}

impl<A> IntoIterator for EventLog<A> {
    type Item = AuditEvent<A>;
    type IntoIter = std::vec::IntoIter<AuditEvent<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a EventLog<A> {
    type Item = &'a AuditEvent<A>;
    type IntoIter = std::slice::Iter<'a, AuditEvent<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
