// gov-kernel/src/core/hashing.rs
// ============================================================================
// Module: Governance Kernel Canonical Hashing
// Description: RFC 8785 JSON canonicalization and content hashing utilities.
// Purpose: Provide deterministic hashes for state, actions, and audit events.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! The kernel hashes all canonical JSON using RFC 8785 (JCS) to guarantee
//! stable, replayable digests across processes and languages. Hashing has no
//! side effects and never consults the determinism sources in
//! [`crate::determinism`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical hashes.
///
/// A value of this type is reserved for the contract-violation case named in
/// the error handling design: a domain `State` or `Action` that cannot be
/// canonically serialized. It is never returned for ordinary rejection or
/// denial outcomes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes canonical JSON with SHA-256, returning a 64-character lowercase hex
/// digest.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(&bytes))
}

/// Hashes raw bytes with SHA-256, returning a 64-character lowercase hex
/// digest.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

/// Like [`hash_canonical_json`], but panics on canonicalization failure.
///
/// Reserved for the one sanctioned panic path in the kernel (see the error
/// handling design): a domain type that violates the serialization contract
/// demanded of `State`/`Action`. Prefer [`hash_canonical_json`] wherever a
/// `Result` can be threaded through.
#[must_use]
pub fn hash_canonical_json_or_panic<T: Serialize + ?Sized>(value: &T) -> String {
    match hash_canonical_json(value) {
        Ok(digest) => digest,
        Err(err) => panic!("state or action violates the canonical serialization contract: {err}"),
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Sample {
        b: u32,
        a: u32,
    }

    #[test]
    fn identical_values_hash_identically_regardless_of_field_order() {
        let left = hash_canonical_json(&Sample { a: 1, b: 2 }).expect("hashable");
        #[derive(Serialize)]
        struct Reordered {
            a: u32,
            b: u32,
        }
        let right = hash_canonical_json(&Reordered { a: 1, b: 2 }).expect("hashable");
        assert_eq!(left, right);
    }

    #[test]
    fn hash_is_sixty_four_lowercase_hex_characters() {
        let digest = hash_canonical_json(&Sample { a: 1, b: 2 }).expect("hashable");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn differing_values_hash_differently() {
        let left = hash_canonical_json(&Sample { a: 1, b: 2 }).expect("hashable");
        let right = hash_canonical_json(&Sample { a: 1, b: 3 }).expect("hashable");
        assert_ne!(left, right);
    }
}
