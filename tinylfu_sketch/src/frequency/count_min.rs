//! Classical Count-Min sketch
//!
//! Count-Min (Cormode & Muthukrishnan, 2003) estimates item frequencies in a
//! stream with fixed memory: `d` rows of `w` counters, one hash-indexed probe
//! per row, minimum over the probes as the estimate. Guarantees:
//! - Never underestimates (one-sided error)
//! - Overestimate bounded by `epsilon * N` with probability `1 - delta`,
//!   where `epsilon = e / w` and `delta = e^-d`
//!
//! The classical `add` increments the probed counter in *every* row. The
//! admission sketch uses the conservative variant instead (see
//! [`ConservativeCountMin`](crate::frequency::ConservativeCountMin)); this
//! type is the reference semantics and the accuracy baseline the tests and
//! benches compare against.
//!
//! # References
//! - Cormode, G., & Muthukrishnan, S. (2003). "An improved data stream
//!   summary: the count-min sketch and its applications"

use crate::common::hash::{column_index, derive_row_keys, hash_item};
use crate::common::{validation, FrequencyEstimator, Result};
use crate::frequency::CounterTable;
use std::hash::Hash;

/// Classical Count-Min sketch for frequency estimation
///
/// Works with any item type that implements `Hash`. Two sketches built with
/// the same `(depth, width, seed)` probe identical cells for every item.
///
/// # Examples
/// ```
/// use tinylfu_sketch::CountMinSketch;
///
/// let mut cms = CountMinSketch::new(4, 256, 1).unwrap();
/// cms.add(&"apple", 2);
/// cms.add(&"banana", 1);
///
/// assert!(cms.estimate(&"apple") >= 2);
/// assert_eq!(cms.estimate(&"cherry"), 0);
/// ```
#[derive(Clone, Debug)]
pub struct CountMinSketch {
    depth: usize,
    width: usize,
    seed: u64,
    row_keys: Vec<u64>,
    pub(crate) table: CounterTable,
}

impl CountMinSketch {
    /// Creates a sketch with explicit dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `depth` or `width` is zero or exceeds
    /// the per-axis cap.
    pub fn new(depth: usize, width: usize, seed: u64) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(CountMinSketch {
            depth,
            width,
            seed,
            row_keys: derive_row_keys(seed, depth),
            table: CounterTable::new(depth, width),
        })
    }

    /// Creates a sketch sized for the given error bounds
    ///
    /// Derives `width = ceil(e / epsilon)` and `depth = ceil(ln(1 / delta))`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `epsilon` or `delta` is outside (0, 1).
    ///
    /// # Examples
    /// ```
    /// use tinylfu_sketch::CountMinSketch;
    ///
    /// // 1% error bound, 1% failure probability
    /// let cms = CountMinSketch::with_error(0.01, 0.01, 1).unwrap();
    /// assert_eq!(cms.width(), 272);
    /// assert_eq!(cms.depth(), 5);
    /// ```
    pub fn with_error(epsilon: f64, delta: f64, seed: u64) -> Result<Self> {
        let (depth, width) = validation::dimensions_for(epsilon, delta)?;
        Self::new(depth, width, seed)
    }

    /// Adds `count` occurrences of `item` to every probed row
    ///
    /// Counters saturate at `u64::MAX`. `count` of zero is a no-op.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        if count == 0 {
            return;
        }
        let item_hash = hash_item(item, self.seed);
        for (row, &key) in self.row_keys.iter().enumerate() {
            let col = column_index(item_hash, key, self.width);
            self.table.add_to(row, col, count);
        }
    }

    /// Estimates the frequency of `item`
    ///
    /// Returns the minimum probed counter, which never falls below the true
    /// count of `item`.
    pub fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        let item_hash = hash_item(item, self.seed);
        self.row_keys
            .iter()
            .enumerate()
            .map(|(row, &key)| self.table.cell(row, column_index(item_hash, key, self.width)))
            .min()
            .unwrap_or(0)
    }

    /// Number of rows
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Counters per row
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Seed the hash family was derived from
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Theoretical error bound for this width: `epsilon = e / w`
    pub fn epsilon(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    /// Theoretical failure probability for this depth: `delta = e^-d`
    pub fn delta(&self) -> f64 {
        (-(self.depth as f64)).exp()
    }

    /// Saturating sum of all counters
    pub fn counter_sum(&self) -> u64 {
        self.table.sum()
    }

    /// True when no counter has been touched
    pub fn is_empty(&self) -> bool {
        self.table.is_zero()
    }

    /// Zeroes every counter
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Memory footprint in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.table.heap_size()
            + self.row_keys.len() * std::mem::size_of::<u64>()
    }
}

impl FrequencyEstimator for CountMinSketch {
    fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        CountMinSketch::add(self, item, count);
    }

    fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        CountMinSketch::estimate(self, item)
    }
}
