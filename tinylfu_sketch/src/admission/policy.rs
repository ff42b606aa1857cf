//! TinyLFU admission policy
//!
//! A size-bounded cache has to decide, on every miss, whether the new item
//! is worth the victim it would displace. TinyLFU answers with frequencies:
//! the candidate is admitted only when its estimated access frequency
//! strictly exceeds the victim's. Ties keep the victim, so a stream of
//! never-repeated items cannot churn the cache.
//!
//! Callers record the candidate's access *before* asking for admission, so a
//! first-sight item already carries frequency >= 1 when it is compared.

use crate::common::Result;
use crate::frequency::TinyLfuSketch;
use crate::membership::Doorkeeper;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::Hash;

/// Estimate below which a losing candidate is never randomly admitted.
const JITTER_WARMUP: u64 = 5;
/// One random admission per this many warm losing attempts.
const JITTER_ODDS: u32 = 128;

/// TinyLFU admission policy over an aging frequency sketch
///
/// Owns the sketch exclusively; the enclosing cache serializes access. An
/// optional [`Doorkeeper`] absorbs first sightings so one-hit wonders never
/// occupy counters, and is dropped automatically whenever the sketch ages.
///
/// # Examples
/// ```
/// use tinylfu_sketch::TinyLfu;
///
/// let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
/// policy.record(&"hot");
/// policy.record(&"hot");
/// policy.record(&"cold");
///
/// assert!(policy.admit(&"hot", &"cold"));
/// assert!(!policy.admit(&"cold", &"hot"));
/// assert!(!policy.admit(&"cold", &"cold"));
/// ```
#[derive(Clone, Debug)]
pub struct TinyLfu {
    sketch: TinyLfuSketch,
    doorkeeper: Option<Doorkeeper>,
    resets_seen: u64,
    jitter: StdRng,
}

impl TinyLfu {
    /// Creates a policy with explicit sketch dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` under the same conditions as
    /// [`TinyLfuSketch::new`].
    pub fn new(depth: usize, width: usize, seed: u64, sample_size: u64) -> Result<Self> {
        Ok(Self::from_sketch(TinyLfuSketch::new(
            depth,
            width,
            seed,
            sample_size,
        )?))
    }

    /// Creates a policy with a sketch sized for the given error bounds
    ///
    /// # Errors
    /// Returns `InvalidParameter` under the same conditions as
    /// [`TinyLfuSketch::with_error`].
    pub fn with_error(epsilon: f64, delta: f64, seed: u64, sample_size: u64) -> Result<Self> {
        Ok(Self::from_sketch(TinyLfuSketch::with_error(
            epsilon,
            delta,
            seed,
            sample_size,
        )?))
    }

    fn from_sketch(sketch: TinyLfuSketch) -> Self {
        let seed = sketch.seed();
        TinyLfu {
            sketch,
            doorkeeper: None,
            resets_seen: 0,
            jitter: StdRng::seed_from_u64(seed),
        }
    }

    /// Fronts the sketch with a doorkeeper sized for `capacity` items
    ///
    /// First sightings only set bits in the doorkeeper; repeat sightings
    /// reach the counters. Door-absorbed sightings do not advance the aging
    /// sample, and the bitset is cleared whenever the sketch resets so both
    /// structures track the same window.
    #[must_use]
    pub fn with_doorkeeper(mut self, capacity: usize) -> Self {
        self.doorkeeper = Some(Doorkeeper::new(capacity, self.sketch.seed()));
        self
    }

    /// Records one access to `item`
    pub fn record<T: Hash + ?Sized>(&mut self, item: &T) {
        let absorbed = match &mut self.doorkeeper {
            Some(door) => door.insert(item),
            None => false,
        };
        if absorbed {
            return;
        }
        self.sketch.add(item, 1);
        if self.sketch.resets() != self.resets_seen {
            self.resets_seen = self.sketch.resets();
            if let Some(door) = &mut self.doorkeeper {
                door.clear();
            }
        }
    }

    /// Estimated access frequency of `item` in the current sample
    ///
    /// The doorkeeper bit, when present, counts as the one access it
    /// absorbed.
    pub fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        let mut frequency = self.sketch.estimate(item);
        if let Some(door) = &self.doorkeeper {
            if door.contains(item) {
                frequency = frequency.saturating_add(1);
            }
        }
        frequency
    }

    /// Decides whether `candidate` should displace `victim`
    ///
    /// Admits only on a strictly higher estimate; ties keep the victim.
    pub fn admit<C, V>(&self, candidate: &C, victim: &V) -> bool
    where
        C: Hash + ?Sized,
        V: Hash + ?Sized,
    {
        self.estimate(candidate) > self.estimate(victim)
    }

    /// [`admit`](Self::admit) with a randomized escape hatch
    ///
    /// An adversary that can engineer estimate ties could otherwise pin the
    /// cache contents forever. Here a losing candidate that is already warm
    /// (estimate above a small cutoff) is admitted once in 128 attempts from
    /// a seed-derived generator, which is enough to break such a stalemate
    /// without disturbing normal admission.
    pub fn admit_with_jitter<C, V>(&mut self, candidate: &C, victim: &V) -> bool
    where
        C: Hash + ?Sized,
        V: Hash + ?Sized,
    {
        let candidate_frequency = self.estimate(candidate);
        if candidate_frequency > self.estimate(victim) {
            return true;
        }
        if candidate_frequency <= JITTER_WARMUP {
            return false;
        }
        self.jitter.random_ratio(1, JITTER_ODDS)
    }

    /// Read-only view of the underlying sketch
    pub fn sketch(&self) -> &TinyLfuSketch {
        &self.sketch
    }

    /// Read-only view of the doorkeeper, when one is configured
    pub fn doorkeeper(&self) -> Option<&Doorkeeper> {
        self.doorkeeper.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_policy_rejects_everything() {
        let policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
        assert!(!policy.admit(&"a", &"b"));
        assert!(!policy.admit(&"a", &"a"));
    }

    #[test]
    fn test_reject_on_tie() {
        let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
        policy.record(&"a");
        policy.record(&"b");
        assert_eq!(policy.estimate(&"a"), policy.estimate(&"b"));
        assert!(!policy.admit(&"a", &"b"));
        assert!(!policy.admit(&"b", &"a"));
    }

    #[test]
    fn test_first_sight_candidate_beats_unseen_victim() {
        let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
        policy.record(&"newcomer");
        assert!(policy.admit(&"newcomer", &"never-seen"));
    }

    #[test]
    fn test_doorkeeper_absorbs_first_sighting() {
        let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap().with_doorkeeper(64);

        policy.record(&"a");
        assert_eq!(policy.sketch().size(), 0);
        assert_eq!(policy.estimate(&"a"), 1);

        policy.record(&"a");
        assert_eq!(policy.sketch().size(), 1);
        assert_eq!(policy.estimate(&"a"), 2);
    }

    #[test]
    fn test_jitter_never_admits_cold_candidates() {
        let mut policy = TinyLfu::new(4, 64, 1, 100_000).unwrap();
        for _ in 0..3 {
            policy.record(&"cold");
        }
        for _ in 0..10 {
            policy.record(&"hot");
        }
        for _ in 0..1000 {
            assert!(!policy.admit_with_jitter(&"cold", &"hot"));
        }
    }

    #[test]
    fn test_jitter_is_seed_deterministic() {
        let mut build = || {
            let mut policy = TinyLfu::new(4, 64, 9, 100_000).unwrap();
            for _ in 0..10 {
                policy.record(&"warm");
            }
            for _ in 0..20 {
                policy.record(&"hot");
            }
            (0..256)
                .map(|_| policy.admit_with_jitter(&"warm", &"hot"))
                .collect::<Vec<bool>>()
        };
        assert_eq!(build(), build());
    }
}
