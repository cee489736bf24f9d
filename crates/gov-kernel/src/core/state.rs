// gov-kernel/src/core/state.rs
// ============================================================================
// Module: Governance Kernel State Contract
// Description: The `State` trait and its default content-hashing behavior.
// Purpose: Define what a domain value must provide to sit inside the kernel.
// Dependencies: crate::core::hashing, serde
// ============================================================================

//! ## Overview
//! A `State` is the single source of truth the orchestrator holds. It is
//! immutable from the kernel's point of view: every transition produces a
//! new value rather than mutating in place. Hashing has no side effects and
//! never touches the determinism sources.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;

// ============================================================================
// SECTION: State Trait
// ============================================================================

/// A domain state value owned by the orchestrator.
///
/// Implementors get `state_hash`/`try_state_hash` for free from `Serialize`
/// plus `Eq`; the default encoding is canonical, key-sorted JSON (RFC 8785)
/// hashed with SHA-256, matching the kernel's audit wire format exactly.
/// Override [`State::try_state_hash`] only if a domain has a cheaper stable
/// hash (e.g. a precomputed Merkle root) that still satisfies "identical
/// values produce identical hashes".
pub trait State: Clone + PartialEq + Eq + Serialize {
    /// Returns the 64-character lowercase hex content hash of this value.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if this value cannot be canonically serialized.
    /// A `State` implementation that can fail here violates the contract the
    /// kernel assumes and should be treated as a programmer error at the
    /// call site (see the error handling design).
    fn try_state_hash(&self) -> Result<String, HashError> {
        hash_canonical_json(self)
    }

    /// Returns the content hash, panicking on a canonicalization failure.
    ///
    /// This is the infallible convenience form used throughout the
    /// orchestrator; domains whose values always serialize (the overwhelming
    /// common case) never observe the panic path.
    fn state_hash(&self) -> String {
        match self.try_state_hash() {
            Ok(digest) => digest,
            Err(err) => panic!("state violates the canonical serialization contract: {err}"),
        }
    }
}

impl<T> State for T where T: Clone + PartialEq + Eq + Serialize {}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct Counter {
        value: i64,
    }

    #[test]
    fn identical_values_produce_identical_hashes() {
        let a = Counter { value: 7 };
        let b = Counter { value: 7 };
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn differing_values_produce_differing_hashes() {
        let a = Counter { value: 7 };
        let b = Counter { value: 8 };
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn hashing_is_stable_across_repeated_calls() {
        let a = Counter { value: 42 };
        assert_eq!(a.state_hash(), a.state_hash());
    }
}
