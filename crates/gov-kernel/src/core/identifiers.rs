// gov-kernel/src/core/identifiers.rs
// ============================================================================
// Module: Governance Kernel Identifiers
// Description: Canonical opaque identifiers for events, laws, and jurisdictions.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the opaque string-based identifiers used throughout
//! the kernel. Identifiers serialize as plain strings; validation (format,
//! emptiness) is handled at the boundary that constructs them rather than
//! inside these simple wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Macro: Opaque String Identifier
// ============================================================================

macro_rules! opaque_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", stringify!($name), ".")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_id!(EventId, "Identifier of a single audit event.");
opaque_id!(LawId, "Stable identifier of a Law, conventionally the implementation's name.");
opaque_id!(JurisdictionId, "Stable label identifying the domain-level policy responsible for a trace.");
opaque_id!(CorrelationId, "Opaque correlation identifier carried by an action and, optionally, its trace.");
opaque_id!(AgentId, "Identifier of the proposer credited with an action.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_as_str() {
        let id = LawId::new("GameOverLaw");
        assert_eq!(id.as_str(), "GameOverLaw");
        assert_eq!(id.to_string(), "GameOverLaw");
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let id = JurisdictionId::from("story-kernel");
        let json = serde_json::to_string(&id).expect("identifiers serialize");
        assert_eq!(json, "\"story-kernel\"");
    }

    #[test]
    fn equality_is_by_value_not_identity() {
        assert_eq!(AgentId::new("agent-1"), AgentId::from("agent-1".to_string()));
    }
}
