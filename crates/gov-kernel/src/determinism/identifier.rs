// gov-kernel/src/determinism/identifier.rs
// ============================================================================
// Module: Governance Kernel Identifier Generator
// Description: Injected identity source: system-backed and scripted.
// Purpose: Remove every hidden call to a random-identity source from core
//          logic.
// Dependencies: crate::core::identifiers, rand, std::sync::Mutex
// ============================================================================

//! ## Overview
//! [`IdentifierGenerator`] is the only sanctioned source of [`EventId`]
//! values inside the kernel. [`SystemIdentifierGenerator`] mints fresh
//! random IDs; [`ScriptedIdentifierGenerator`] replays a fixed sequence or a
//! deterministic monotonic pattern for reproducible tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use rand::Rng;

use crate::core::identifiers::EventId;

// ============================================================================
// SECTION: IdentifierGenerator Trait
// ============================================================================

/// A source of fresh, opaque [`EventId`] values.
pub trait IdentifierGenerator: Send + Sync {
    /// Returns the next identifier.
    fn next(&self) -> EventId;
}

// ============================================================================
// SECTION: SystemIdentifierGenerator
// ============================================================================

/// Mints identifiers from the platform random source.
#[derive(Debug, Default)]
pub struct SystemIdentifierGenerator;

impl SystemIdentifierGenerator {
    /// Builds a new system identifier generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierGenerator for SystemIdentifierGenerator {
    fn next(&self) -> EventId {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 16] = rng.gen();
        let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        EventId::new(hex)
    }
}

// ============================================================================
// SECTION: ScriptedIdentifierGenerator
// ============================================================================

enum Source {
    Fixed(Vec<EventId>),
    Monotonic { prefix: String },
}

/// An identifier generator under test control: either replays a fixed
/// sequence of identifiers, or yields a deterministic monotonic pattern
/// (`"{prefix}-000001"`, `"{prefix}-000002"`, ...).
pub struct ScriptedIdentifierGenerator {
    source: Source,
    call_count: Mutex<usize>,
}

impl ScriptedIdentifierGenerator {
    /// Builds a generator that replays `sequence` in order. Calling `next`
    /// past the end of `sequence` repeats the last entry.
    #[must_use]
    pub fn fixed(sequence: Vec<EventId>) -> Self {
        Self { source: Source::Fixed(sequence), call_count: Mutex::new(0) }
    }

    /// Builds a generator that yields `"{prefix}-000001"`, `"{prefix}-000002"`, ...
    #[must_use]
    pub fn monotonic(prefix: impl Into<String>) -> Self {
        Self { source: Source::Monotonic { prefix: prefix.into() }, call_count: Mutex::new(0) }
    }

    /// The number of times `next` has been called since the last `reset`.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// The number of fixed-sequence entries remaining, or `None` for the
    /// monotonic pattern (which never runs out).
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        match &self.source {
            Source::Fixed(sequence) => Some(sequence.len().saturating_sub(self.call_count())),
            Source::Monotonic { .. } => None,
        }
    }

    /// Resets the call counter back to zero.
    pub fn reset(&self) {
        let mut call_count = self.call_count.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *call_count = 0;
    }
}

impl IdentifierGenerator for ScriptedIdentifierGenerator {
    fn next(&self) -> EventId {
        let mut call_count = self.call_count.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let index = *call_count;
        *call_count += 1;
        match &self.source {
            Source::Fixed(sequence) => {
                let clamped = index.min(sequence.len().saturating_sub(1));
                sequence[clamped].clone()
            }
            Source::Monotonic { prefix } => EventId::new(format!("{prefix}-{:06}", index + 1)),
        }
    }
}
