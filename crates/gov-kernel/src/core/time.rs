// gov-kernel/src/core/time.rs
// ============================================================================
// Module: Governance Kernel Timestamps
// Description: Wall-clock timestamp wrapper with the hashing wire format.
// Purpose: Provide a single, explicit timestamp type shared by the clock and
//          the audit event encoding.
// Dependencies: time, serde
// ============================================================================

//! ## Overview
//! `Timestamp` is an opaque wrapper over [`time::OffsetDateTime`]. It exists
//! so that no module other than [`crate::determinism::clock`] ever calls the
//! platform clock directly, and so the microsecond-precision string form
//! required by `entryHash` (`"%.6f"` seconds since the Unix epoch) lives in
//! exactly one place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// A point in time, serialized as RFC 3339 for ordinary wire use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl Timestamp {
    /// Wraps an existing `OffsetDateTime`.
    #[must_use]
    pub const fn new(at: OffsetDateTime) -> Self {
        Self(at)
    }

    /// Returns the Unix epoch.
    #[must_use]
    pub const fn unix_epoch() -> Self {
        Self(OffsetDateTime::UNIX_EPOCH)
    }

    /// Returns this timestamp shifted forward by the given duration.
    #[must_use]
    pub fn advance(self, by: time::Duration) -> Self {
        Self(self.0 + by)
    }

    /// Returns the underlying `OffsetDateTime`.
    #[must_use]
    pub const fn as_offset_date_time(self) -> OffsetDateTime {
        self.0
    }

    /// Returns the canonical hashing wire form: seconds since the Unix epoch
    /// formatted at microsecond precision, e.g. `"1700000000.123456"`.
    ///
    /// This is the single interoperability point that any implementation
    /// computing `entryHash` must agree on exactly.
    #[must_use]
    pub fn to_epoch_micros_string(self) -> String {
        let nanos = self.0.unix_timestamp_nanos();
        let whole_seconds = nanos.div_euclid(1_000_000_000);
        let remainder_nanos = nanos.rem_euclid(1_000_000_000);
        let micros = remainder_nanos / 1_000;
        format!("{whole_seconds}.{micros:06}")
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}
