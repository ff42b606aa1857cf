//! TinyLFU aging layer over the conservative sketch
//!
//! An admission sketch has to answer "how often was this seen *recently*",
//! not "how often ever". TinyLFU gets recency out of a plain frequency
//! sketch by aging it: the total inserted weight since the last reset is
//! tracked in a sample accumulator, and once it passes the configured sample
//! size every counter is halved. Repeated halvings decay stale popularity
//! exponentially while preserving the relative ranking of live items.
//!
//! The halving is a logical right shift, so each odd counter loses its low
//! bit to truncation. Those lost bits are counted during the sweep and
//! subtracted from the halved sample accumulator; without that correction
//! the accumulator drifts away from the counter sum and the resets fire at
//! the wrong cadence.
//!
//! # References
//! - Einziger, Friedman & Manes, "TinyLFU: A Highly Efficient Cache
//!   Admission Policy" (ACM TOS 2017)

use crate::common::{validation, FrequencyEstimator, Result};
use crate::frequency::ConservativeCountMin;
use std::hash::Hash;

/// Conservative Count-Min sketch with TinyLFU-style aging
///
/// Construction fixes `(depth, width, seed, sample_size)`; all four must be
/// positive. The sketch is mutated in place by [`add`](Self::add) and holds
/// exactly `depth * width` counters plus a handful of scalars, with no
/// allocation after construction.
///
/// # Examples
/// ```
/// use tinylfu_sketch::TinyLfuSketch;
///
/// let mut sketch = TinyLfuSketch::new(4, 64, 1, 1000).unwrap();
/// for _ in 0..5 {
///     sketch.add(&"a", 1);
/// }
/// assert_eq!(sketch.estimate(&"a"), 5);
/// ```
#[derive(Clone, Debug)]
pub struct TinyLfuSketch {
    sketch: ConservativeCountMin,
    sample_size: u64,
    size: u64,
    resets: u64,
}

impl TinyLfuSketch {
    /// Creates a sketch with explicit dimensions and aging threshold
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `depth` or `width` is zero or exceeds
    /// the per-axis cap, or if `sample_size` is zero.
    pub fn new(depth: usize, width: usize, seed: u64, sample_size: u64) -> Result<Self> {
        validation::validate_sample_size(sample_size)?;
        Ok(TinyLfuSketch {
            sketch: ConservativeCountMin::new(depth, width, seed)?,
            sample_size,
            size: 0,
            resets: 0,
        })
    }

    /// Creates a sketch sized for the given error bounds
    ///
    /// Derives `width = ceil(e / epsilon)` and `depth = ceil(ln(1 / delta))`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `epsilon` or `delta` is outside (0, 1)
    /// or `sample_size` is zero.
    pub fn with_error(epsilon: f64, delta: f64, seed: u64, sample_size: u64) -> Result<Self> {
        let (depth, width) = validation::dimensions_for(epsilon, delta)?;
        Self::new(depth, width, seed, sample_size)
    }

    /// Records `count` occurrences of `item`, aging the table first when the
    /// sample threshold is crossed
    ///
    /// A single oversized `count` overshooting the threshold by several
    /// sample intervals still triggers exactly one halving. `count` of zero
    /// is a no-op.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        if count == 0 {
            return;
        }
        self.size = self.size.saturating_add(count);
        if self.size > self.sample_size {
            self.reset();
        }
        self.sketch.add(item, count);
    }

    /// Estimates the frequency of `item` within the current sample
    ///
    /// Never below the true count of `item` decayed by the resets it has
    /// lived through.
    pub fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        self.sketch.estimate(item)
    }

    /// Halves every counter and re-bases the sample accumulator
    ///
    /// The accumulator becomes `(size >> 1) - popcount(low bits)`, saturating
    /// at zero: each one-bit shifted out of a counter is half an event that
    /// the halved accumulator would otherwise still be carrying.
    fn reset(&mut self) {
        let odd = self.sketch.halve();
        self.size = (self.size >> 1).saturating_sub(odd);
        self.resets += 1;
    }

    /// Number of rows
    #[inline]
    pub fn depth(&self) -> usize {
        self.sketch.depth()
    }

    /// Counters per row
    #[inline]
    pub fn width(&self) -> usize {
        self.sketch.width()
    }

    /// Seed the hash family was derived from
    #[inline]
    pub fn seed(&self) -> u64 {
        self.sketch.seed()
    }

    /// Inserted weight that triggers the next aging pass
    #[inline]
    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// Inserted weight accumulated since the last aging pass
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Aging passes performed so far
    ///
    /// Lets the enclosing cache observe that a reset happened (for example
    /// to drop a doorkeeper) without scanning the table.
    #[inline]
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Saturating sum of all counters
    pub fn counter_sum(&self) -> u64 {
        self.sketch.counter_sum()
    }

    /// True when no counter has been touched since construction or `clear`
    pub fn is_empty(&self) -> bool {
        self.sketch.is_empty()
    }

    /// Zeroes every counter and both accumulators
    pub fn clear(&mut self) {
        self.sketch.clear();
        self.size = 0;
        self.resets = 0;
    }

    /// Memory footprint in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() - std::mem::size_of::<ConservativeCountMin>()
            + self.sketch.memory_usage()
    }
}

impl FrequencyEstimator for TinyLfuSketch {
    fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        TinyLfuSketch::add(self, item, count);
    }

    fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        TinyLfuSketch::estimate(self, item)
    }
}
