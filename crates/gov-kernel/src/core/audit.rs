// gov-kernel/src/core/audit.rs
// ============================================================================
// Module: Governance Kernel Audit Event
// Description: Tamper-evident audit event type, its factories, and entry
//              hashing.
// Purpose: Define `AuditEventType`, `AuditEvent`, and the canonical
//          `entry_hash` computation that chains the log.
// Dependencies: crate::core::{action, composition, hashing, identifiers, time}
// ============================================================================

//! ## Overview
//! An `AuditEvent` is the unit the [`crate::runtime::log::EventLog`] chains
//! together. Every persisted field participates in `entry_hash`, including
//! `previous_entry_hash` and `governance_trace` — the trace is serialized as
//! `null` when absent and as an object when present, and `entry_hash` is
//! sensitive to which one it was. The timestamp is hashed and persisted at
//! microsecond precision as seconds since the Unix epoch (`"%.6f"`); this is
//! the single cross-implementation interoperability point any external
//! verifier of the chain must reproduce exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::composition::CompositionTrace;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::AgentId;
use crate::core::identifiers::EventId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: AuditEventType
// ============================================================================

/// The kind of transition an [`AuditEvent`] records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuditEventType<A> {
    /// The orchestrator was initialized with a starting state.
    Initialization,
    /// An agent proposed `action`; covers both reducer-accepted and
    /// reducer-rejected outcomes (see `AuditEvent::applied`).
    ActionProposed {
        /// The proposed action.
        action: A,
        /// The proposer credited with this action.
        #[serde(rename = "agentID")]
        agent_id: AgentId,
    },
    /// Governance denied `action` before the reducer ever ran.
    GovernanceDenied {
        /// The proposed action.
        action: A,
        /// The proposer credited with this action.
        #[serde(rename = "agentID")]
        agent_id: AgentId,
    },
    /// State was restored from an external snapshot named by `source`.
    StateRestored {
        /// A human-readable description of where the state came from.
        source: String,
    },
    /// A system-originated event unrelated to any agent proposal.
    SystemEvent {
        /// A human-readable description of the event.
        description: String,
    },
}

// ============================================================================
// SECTION: AuditEvent
// ============================================================================

/// One immutable record in the event log.
///
/// # Invariants
/// - `ActionProposed` with `applied == false`: `state_hash_before ==
///   state_hash_after`.
/// - `GovernanceDenied`: `applied == false`, `state_hash_before ==
///   state_hash_after`.
/// - `SystemEvent`: `state_hash_before == state_hash_after`.
/// - `Initialization`: `state_hash_before == ""`, `applied == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent<A> {
    /// Identifier of this event.
    pub id: EventId,
    /// When this event was recorded, per the injected `Clock`.
    #[serde(with = "epoch_micros_string")]
    pub timestamp: Timestamp,
    /// What kind of transition this is.
    pub event_type: AuditEventType<A>,
    /// Content hash of the state immediately before this event.
    pub state_hash_before: String,
    /// Content hash of the state immediately after this event.
    pub state_hash_after: String,
    /// Whether the reducer accepted the proposed transition.
    pub applied: bool,
    /// Human-readable explanation of the outcome.
    pub rationale: String,
    /// `entry_hash` of the preceding event, or `""` for the first entry.
    pub previous_entry_hash: String,
    /// The governance trace that led to this event, when governance was
    /// configured. Always present as a key (`null` when absent) so that
    /// `entry_hash` is sensitive to its presence.
    pub governance_trace: Option<CompositionTrace>,
}

impl<A: Serialize> AuditEvent<A> {
    /// Computes the SHA-256 content hash of this event over a canonical
    /// encoding of every persisted field, including `previous_entry_hash`
    /// and `governance_trace`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if `A` cannot be canonically serialized.
    pub fn try_entry_hash(&self) -> Result<String, HashError> {
        hash_canonical_json(self)
    }

    /// Like [`Self::try_entry_hash`], panicking on canonicalization failure.
    /// The kernel's own types always serialize; this panic path exists only
    /// for a domain `Action` that violates the serialization contract (see
    /// the error handling design).
    #[must_use]
    pub fn entry_hash(&self) -> String {
        match self.try_entry_hash() {
            Ok(digest) => digest,
            Err(err) => panic!("audit event violates the canonical serialization contract: {err}"),
        }
    }
}

// ============================================================================
// SECTION: Factories
// ============================================================================

impl<A> AuditEvent<A> {
    /// Builds the very first event in a log: `state_hash_before == ""`,
    /// `applied == true`.
    #[must_use]
    pub fn initialization(id: EventId, timestamp: Timestamp, initial_state_hash: impl Into<String>) -> Self {
        Self {
            id,
            timestamp,
            event_type: AuditEventType::Initialization,
            state_hash_before: String::new(),
            state_hash_after: initial_state_hash.into(),
            applied: true,
            rationale: "Orchestrator initialized".to_string(),
            previous_entry_hash: String::new(),
            governance_trace: None,
        }
    }

    /// Builds an `ActionProposed` event for an accepted action (no
    /// governance trace).
    #[must_use]
    pub fn accepted(
        id: EventId,
        timestamp: Timestamp,
        action: A,
        agent_id: AgentId,
        state_hash_before: impl Into<String>,
        state_hash_after: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            event_type: AuditEventType::ActionProposed { action, agent_id },
            state_hash_before: state_hash_before.into(),
            state_hash_after: state_hash_after.into(),
            applied: true,
            rationale: rationale.into(),
            previous_entry_hash: String::new(),
            governance_trace: None,
        }
    }

    /// Builds an `ActionProposed` event for a reducer-rejected action (no
    /// governance trace): `state_hash_before == state_hash_after`.
    #[must_use]
    pub fn rejected(
        id: EventId,
        timestamp: Timestamp,
        action: A,
        agent_id: AgentId,
        state_hash: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        let state_hash = state_hash.into();
        Self {
            id,
            timestamp,
            event_type: AuditEventType::ActionProposed { action, agent_id },
            state_hash_before: state_hash.clone(),
            state_hash_after: state_hash,
            applied: false,
            rationale: rationale.into(),
            previous_entry_hash: String::new(),
            governance_trace: None,
        }
    }

    /// Builds an `ActionProposed` event for an accepted action evaluated
    /// under an active governance policy.
    #[must_use]
    pub fn accepted_with_governance(
        id: EventId,
        timestamp: Timestamp,
        action: A,
        agent_id: AgentId,
        state_hash_before: impl Into<String>,
        state_hash_after: impl Into<String>,
        rationale: impl Into<String>,
        trace: CompositionTrace,
    ) -> Self {
        let mut event = Self::accepted(id, timestamp, action, agent_id, state_hash_before, state_hash_after, rationale);
        event.governance_trace = Some(trace);
        event
    }

    /// Builds an `ActionProposed` event for a reducer-rejected action that
    /// governance had allowed: `state_hash_before == state_hash_after`, with
    /// the allowing trace attached (Scenario S6).
    #[must_use]
    pub fn rejected_with_governance(
        id: EventId,
        timestamp: Timestamp,
        action: A,
        agent_id: AgentId,
        state_hash: impl Into<String>,
        rationale: impl Into<String>,
        trace: CompositionTrace,
    ) -> Self {
        let mut event = Self::rejected(id, timestamp, action, agent_id, state_hash, rationale);
        event.governance_trace = Some(trace);
        event
    }

    /// Builds a `GovernanceDenied` event: `applied == false`,
    /// `state_hash_before == state_hash_after`, with the denying trace
    /// attached. The reducer is never invoked for this outcome.
    #[must_use]
    pub fn governance_denied(
        id: EventId,
        timestamp: Timestamp,
        action: A,
        agent_id: AgentId,
        state_hash: impl Into<String>,
        trace: CompositionTrace,
    ) -> Self {
        let state_hash = state_hash.into();
        Self {
            id,
            timestamp,
            event_type: AuditEventType::GovernanceDenied { action, agent_id },
            state_hash_before: state_hash.clone(),
            state_hash_after: state_hash,
            applied: false,
            rationale: "Governance denied".to_string(),
            previous_entry_hash: String::new(),
            governance_trace: Some(trace),
        }
    }

    /// Builds a `SystemEvent`: `state_hash_before == state_hash_after`, no
    /// governance trace.
    #[must_use]
    pub fn system_event(id: EventId, timestamp: Timestamp, description: impl Into<String>, state_hash: impl Into<String>) -> Self {
        let state_hash = state_hash.into();
        Self {
            id,
            timestamp,
            event_type: AuditEventType::SystemEvent { description: description.into() },
            state_hash_before: state_hash.clone(),
            state_hash_after: state_hash,
            applied: true,
            rationale: "System event recorded".to_string(),
            previous_entry_hash: String::new(),
            governance_trace: None,
        }
    }

    /// Builds a `StateRestored` event from an external snapshot.
    #[must_use]
    pub fn state_restored(
        id: EventId,
        timestamp: Timestamp,
        source: impl Into<String>,
        state_hash_before: impl Into<String>,
        state_hash_after: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            event_type: AuditEventType::StateRestored { source: source.into() },
            state_hash_before: state_hash_before.into(),
            state_hash_after: state_hash_after.into(),
            applied: true,
            rationale: "State restored from external snapshot".to_string(),
            previous_entry_hash: String::new(),
            governance_trace: None,
        }
    }
}

// ============================================================================
// SECTION: Timestamp Wire Format
// ============================================================================

/// Serializes/deserializes [`Timestamp`] as the canonical `entry_hash` wire
/// form: seconds since the Unix epoch at microsecond precision. Kept
/// separate from `Timestamp`'s own `Serialize` impl (RFC 3339) so that other
/// call sites may still prefer a human-readable timestamp without disturbing
/// the one interoperability point the audit chain depends on.
mod epoch_micros_string {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use time::OffsetDateTime;

    use crate::core::time::Timestamp;

    pub fn serialize<S: Serializer>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.to_epoch_micros_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (whole, fraction) = raw.split_once('.').ok_or_else(|| {
            serde::de::Error::custom(format!("timestamp '{raw}' is missing a fractional-second component"))
        })?;
        let whole_seconds: i128 = whole.parse().map_err(serde::de::Error::custom)?;
        let micros: i128 = fraction.parse().map_err(serde::de::Error::custom)?;
        let nanos = whole_seconds * 1_000_000_000 + micros * 1_000;
        let at = OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(serde::de::Error::custom)?;
        Ok(Timestamp::new(at))
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::core::composition::CompositionRule;
    use crate::core::composition::compose;
    use crate::core::identifiers::JurisdictionId;
    use crate::core::identifiers::LawId;
    use crate::core::law::LawDecision;
    use crate::core::law::LawVerdict;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct TestAction(String);

    fn at() -> Timestamp {
        Timestamp::unix_epoch()
    }

    #[test]
    fn initialization_has_empty_before_hash_and_is_applied() {
        let event = AuditEvent::<TestAction>::initialization(EventId::new("e0"), at(), "abc");
        assert_eq!(event.state_hash_before, "");
        assert!(event.applied);
        assert_eq!(event.state_hash_after, "abc");
    }

    #[test]
    fn rejected_preserves_the_unchanged_state_hash_on_both_sides() {
        let event = AuditEvent::rejected(
            EventId::new("e1"),
            at(),
            TestAction("noop".to_string()),
            AgentId::new("agent-1"),
            "hash-x",
            "reducer said no",
        );
        assert!(!event.applied);
        assert_eq!(event.state_hash_before, event.state_hash_after);
    }

    #[test]
    fn entry_hash_changes_when_governance_trace_presence_changes() {
        let without_trace = AuditEvent::accepted(
            EventId::new("e2"),
            at(),
            TestAction("go".to_string()),
            AgentId::new("agent-1"),
            "h0",
            "h1",
            "accepted",
        );

        let trace = compose(
            vec![LawVerdict::new(LawId::new("L"), LawDecision::Allow, "ok")],
            CompositionRule::DenyWins,
            JurisdictionId::new("jid"),
            None,
        );
        let with_trace = AuditEvent::accepted_with_governance(
            EventId::new("e2"),
            at(),
            TestAction("go".to_string()),
            AgentId::new("agent-1"),
            "h0",
            "h1",
            "accepted",
            trace,
        );

        assert_ne!(without_trace.entry_hash(), with_trace.entry_hash());
    }

    #[test]
    fn entry_hash_is_sensitive_to_previous_entry_hash() {
        let mut first = AuditEvent::<TestAction>::initialization(EventId::new("e0"), at(), "abc");
        first.previous_entry_hash = "".to_string();
        let mut second = first.clone();
        second.previous_entry_hash = "nonempty".to_string();
        assert_ne!(first.entry_hash(), second.entry_hash());
    }

    #[test]
    fn timestamp_round_trips_through_json_at_microsecond_precision() {
        let event = AuditEvent::<TestAction>::initialization(EventId::new("e0"), at(), "abc");
        let json = serde_json::to_string(&event).expect("serializable");
        assert!(json.contains("\"0.000000\""));
        let restored: AuditEvent<TestAction> = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(restored.timestamp, event.timestamp);
        assert_eq!(restored.entry_hash(), event.entry_hash());
    }

    #[test]
    fn action_proposed_serializes_with_the_agent_id_key() {
        let event = AuditEvent::accepted(
            EventId::new("e3"),
            at(),
            TestAction("go".to_string()),
            AgentId::new("agent-7"),
            "h0",
            "h1",
            "accepted",
        );
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["eventType"]["type"], "actionProposed");
        assert_eq!(json["eventType"]["agentID"], "agent-7");
        assert_eq!(json["governanceTrace"], serde_json::Value::Null);
    }
}
