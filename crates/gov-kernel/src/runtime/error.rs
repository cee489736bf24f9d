// gov-kernel/src/runtime/error.rs
// ============================================================================
// Module: Governance Kernel Orchestrator Errors
// Description: Construction-time failure modes of the orchestrator.
// Purpose: Keep orchestrator setup failures typed and non-panicking.
// Dependencies: thiserror
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::JurisdictionId;

/// Failure to construct an [`crate::runtime::orchestrator::Orchestrator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The caller supplied a policy whose jurisdiction does not match the
    /// orchestrator's expected jurisdiction.
    #[error("policy jurisdiction {found} does not match expected jurisdiction {expected}")]
    JurisdictionMismatch {
        /// The jurisdiction the orchestrator was configured to expect.
        expected: JurisdictionId,
        /// The jurisdiction actually carried by the supplied policy.
        found: JurisdictionId,
    },

    /// The initial state could not be canonically hashed.
    #[error("failed to hash the initial state: {0}")]
    InitialStateHash(String),
}
