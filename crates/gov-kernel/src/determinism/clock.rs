// gov-kernel/src/determinism/clock.rs
// ============================================================================
// Module: Governance Kernel Clock
// Description: Injected time source: system-backed and scripted.
// Purpose: Remove every hidden call to the platform clock from core logic.
// Dependencies: crate::core::time, std::sync::Mutex, time
// ============================================================================

//! ## Overview
//! [`Clock`] is the only sanctioned source of [`Timestamp`] values inside the
//! kernel. [`SystemClock`] reads wall time; [`ScriptedClock`] holds an
//! advancing value under test control and never touches the platform clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Clock Trait
// ============================================================================

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

// ============================================================================
// SECTION: SystemClock
// ============================================================================

/// Reads wall-clock time from the platform.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Builds a new system clock.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(OffsetDateTime::now_utc())
    }
}

// ============================================================================
// SECTION: ScriptedClock
// ============================================================================

/// A clock under test control: holds an internal, advancing timestamp and
/// returns the same value across repeated reads until explicitly advanced.
#[derive(Debug)]
pub struct ScriptedClock {
    current: Mutex<Timestamp>,
}

impl ScriptedClock {
    /// Starts the scripted clock at `initial`.
    #[must_use]
    pub fn new(initial: Timestamp) -> Self {
        Self { current: Mutex::new(initial) }
    }

    /// Starts the scripted clock at the Unix epoch.
    #[must_use]
    pub fn at_epoch() -> Self {
        Self::new(Timestamp::unix_epoch())
    }

    /// Sets the clock to an explicit value.
    pub fn set(&self, at: Timestamp) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = at;
    }

    /// Advances the clock by `by` and returns the new value.
    pub fn advance(&self, by: time::Duration) -> Timestamp {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = current.advance(by);
        *current
    }

    /// Resets the clock back to `initial`.
    pub fn reset(&self, initial: Timestamp) {
        self.set(initial);
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
