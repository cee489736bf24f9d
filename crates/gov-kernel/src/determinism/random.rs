// gov-kernel/src/determinism/random.rs
// ============================================================================
// Module: Governance Kernel Random Source
// Description: Injected randomness: system-backed and scripted/seeded.
// Purpose: Remove every hidden call to the platform random source from core
//          logic.
// Dependencies: rand, std::sync::Mutex
// ============================================================================

//! ## Overview
//! [`RandomSource`] is the only sanctioned source of randomness inside the
//! kernel. [`SystemRandomSource`] delegates to the platform;
//! [`ScriptedRandomSource`] either replays a fixed sequence (with
//! out-of-range clamping) or draws from a seeded, reproducible generator.
//! `random_element` and `shuffled` are free functions built only from the
//! three primitive operations, so they stay available even though a trait
//! object cannot carry generic methods.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// SECTION: RandomSource Trait
// ============================================================================

/// A source of randomness: integers in a range, doubles in `[0, 1)`, and
/// booleans.
pub trait RandomSource: Send + Sync {
    /// Returns an integer in `[min, max]` (inclusive on both ends).
    fn int_in_range(&self, min: i64, max: i64) -> i64;

    /// Returns a double in `[0.0, 1.0)`.
    fn unit_double(&self) -> f64;

    /// Returns a boolean, true with probability `0.5`.
    fn bool(&self) -> bool;
}

/// Picks a uniformly random element of `items` using `source`.
#[must_use]
pub fn random_element<'a, T>(source: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = source.int_in_range(0, items.len() as i64 - 1);
    items.get(index as usize)
}

/// Returns a Fisher-Yates shuffle of `items` using `source`.
#[must_use]
pub fn shuffled<T: Clone>(source: &dyn RandomSource, items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = source.int_in_range(0, i as i64) as usize;
        shuffled.swap(i, j);
    }
    shuffled
}

// ============================================================================
// SECTION: SystemRandomSource
// ============================================================================

/// Delegates to the platform random source.
#[derive(Debug, Default)]
pub struct SystemRandomSource;

impl SystemRandomSource {
    /// Builds a new system random source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for SystemRandomSource {
    fn int_in_range(&self, min: i64, max: i64) -> i64 {
        rand::thread_rng().gen_range(min..=max)
    }

    fn unit_double(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }

    fn bool(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

// ============================================================================
// SECTION: ScriptedRandomSource
// ============================================================================

struct ReplayState {
    ints: Vec<i64>,
    int_index: usize,
    doubles: Vec<f64>,
    double_index: usize,
    bools: Vec<bool>,
    bool_index: usize,
}

enum Source {
    Replay(Mutex<ReplayState>),
    Seeded(Mutex<StdRng>),
}

/// A random source under test control.
pub struct ScriptedRandomSource {
    source: Source,
}

impl ScriptedRandomSource {
    /// Builds a source that replays scripted sequences. Each family's
    /// cursor advances independently and clamps to `[min, max]` when the
    /// call site requests a range; reading past the end of a sequence
    /// repeats its last entry.
    #[must_use]
    pub fn replay(ints: Vec<i64>, doubles: Vec<f64>, bools: Vec<bool>) -> Self {
        Self {
            source: Source::Replay(Mutex::new(ReplayState { ints, int_index: 0, doubles, double_index: 0, bools, bool_index: 0 })),
        }
    }

    /// Builds a source that draws from a deterministically seeded
    /// generator; the same seed always produces the same sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self { source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))) }
    }

    /// The number of `int_in_range` calls since the last `reset`, or `None`
    /// for a seeded source.
    #[must_use]
    pub fn int_calls(&self) -> Option<usize> {
        match &self.source {
            Source::Replay(state) => Some(state.lock().unwrap_or_else(std::sync::PoisonError::into_inner).int_index),
            Source::Seeded(_) => None,
        }
    }

    /// Rewinds every cursor back to the start of its scripted sequence.
    /// A no-op for a seeded source (reseed with a fresh instance instead).
    pub fn reset(&self) {
        if let Source::Replay(state) = &self.source {
            let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            state.int_index = 0;
            state.double_index = 0;
            state.bool_index = 0;
        }
    }
}

impl RandomSource for ScriptedRandomSource {
    fn int_in_range(&self, min: i64, max: i64) -> i64 {
        match &self.source {
            Source::Replay(state) => {
                let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                if state.ints.is_empty() {
                    return min;
                }
                let clamped_index = state.int_index.min(state.ints.len() - 1);
                state.int_index += 1;
                state.ints[clamped_index].clamp(min, max)
            }
            Source::Seeded(rng) => rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner).gen_range(min..=max),
        }
    }

    fn unit_double(&self) -> f64 {
        match &self.source {
            Source::Replay(state) => {
                let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                if state.doubles.is_empty() {
                    return 0.0;
                }
                let clamped_index = state.double_index.min(state.doubles.len() - 1);
                state.double_index += 1;
                state.doubles[clamped_index].clamp(0.0, 0.999_999_999)
            }
            Source::Seeded(rng) => rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner).gen_range(0.0..1.0),
        }
    }

    fn bool(&self) -> bool {
        match &self.source {
            Source::Replay(state) => {
                let mut state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                if state.bools.is_empty() {
                    return false;
                }
                let clamped_index = state.bool_index.min(state.bools.len() - 1);
                state.bool_index += 1;
                state.bools[clamped_index]
            }
            Source::Seeded(rng) => rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner).gen_bool(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_clamps_out_of_range_values_to_the_requested_max() {
        let source = ScriptedRandomSource::replay(vec![500], vec![], vec![]);
        assert_eq!(source.int_in_range(0, 10), 10);
    }

    #[test]
    fn replay_repeats_the_last_entry_past_the_end_of_the_sequence() {
        let source = ScriptedRandomSource::replay(vec![3, 7], vec![], vec![]);
        assert_eq!(source.int_in_range(0, 10), 3);
        assert_eq!(source.int_in_range(0, 10), 7);
        assert_eq!(source.int_in_range(0, 10), 7);
    }

    #[test]
    fn reset_rewinds_every_cursor() {
        let source = ScriptedRandomSource::replay(vec![1, 2], vec![], vec![]);
        source.int_in_range(0, 10);
        source.reset();
        assert_eq!(source.int_calls(), Some(0));
        assert_eq!(source.int_in_range(0, 10), 1);
    }

    #[test]
    fn seeded_source_is_deterministic_across_instances() {
        let a = ScriptedRandomSource::seeded(7);
        let b = ScriptedRandomSource::seeded(7);
        for _ in 0..5 {
            assert_eq!(a.int_in_range(0, 1000), b.int_in_range(0, 1000));
        }
    }

    #[test]
    fn random_element_returns_none_for_an_empty_slice() {
        let source = ScriptedRandomSource::replay(vec![0], vec![], vec![]);
        let items: Vec<i32> = vec![];
        assert_eq!(random_element(&source, &items), None);
    }

    #[test]
    fn shuffled_preserves_every_element() {
        let source = ScriptedRandomSource::seeded(1);
        let items = vec![1, 2, 3, 4, 5];
        let mut result = shuffled(&source, &items);
        result.sort_unstable();
        assert_eq!(result, items);
    }
}
