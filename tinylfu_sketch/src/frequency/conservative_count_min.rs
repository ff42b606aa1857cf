//! Conservative-update Count-Min sketch (Estan & Varghese, 2002)
//!
//! Classical Count-Min increments the probed counter in every row on every
//! insertion, which inflates the estimates of any other item colliding in
//! the non-minimum rows. The conservative update raises only the counters
//! that actually need to move: the probed minimum `m` is read first, and
//! each probed cell is lifted to `max(current, m + count)`. The minimum -
//! which is the estimator - advances exactly as it would classically, so the
//! one-sided error guarantee is unchanged, but the table accumulates far
//! fewer phantom increments.
//!
//! The trade-off is that decrements and deletions become unsupported, which
//! is irrelevant for an admission sketch.
//!
//! # References
//! - Estan & Varghese, "New Directions in Traffic Measurement and
//!   Accounting" (SIGCOMM 2002)

use crate::common::hash::{column_index, derive_row_keys, hash_item};
use crate::common::{validation, FrequencyEstimator, Result};
use crate::frequency::CounterTable;
use std::hash::Hash;

/// Count-Min sketch with conservative updates
///
/// Probes the same cells as a [`CountMinSketch`](crate::CountMinSketch)
/// built with equal `(depth, width, seed)`, so the two variants are directly
/// comparable on identical streams.
///
/// # Examples
/// ```
/// use tinylfu_sketch::ConservativeCountMin;
///
/// let mut sketch = ConservativeCountMin::new(4, 256, 1).unwrap();
/// sketch.add(&"apple", 1);
/// sketch.add(&"apple", 1);
/// assert_eq!(sketch.estimate(&"apple"), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ConservativeCountMin {
    depth: usize,
    width: usize,
    seed: u64,
    row_keys: Vec<u64>,
    pub(crate) table: CounterTable,
}

impl ConservativeCountMin {
    /// Creates a sketch with explicit dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `depth` or `width` is zero or exceeds
    /// the per-axis cap.
    pub fn new(depth: usize, width: usize, seed: u64) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(ConservativeCountMin {
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
    pub fn with_error(epsilon: f64, delta: f64, seed: u64) -> Result<Self> {
        let (depth, width) = validation::dimensions_for(epsilon, delta)?;
        Self::new(depth, width, seed)
    }

    /// Adds `count` occurrences of `item`, raising only the minimum cells
    ///
    /// Every probed cell below `min + count` is lifted to that target; cells
    /// already above it are left untouched. All cells tied at the minimum
    /// receive the increment. Saturates at `u64::MAX`; `count` of zero is a
    /// no-op.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        if count == 0 {
            return;
        }
        let item_hash = hash_item(item, self.seed);
        let cols: Vec<usize> = self
            .row_keys
            .iter()
            .map(|&key| column_index(item_hash, key, self.width))
            .collect();

        let min = cols
            .iter()
            .enumerate()
            .map(|(row, &col)| self.table.cell(row, col))
            .min()
            .unwrap_or(0);

        let target = min.saturating_add(count);
        for (row, &col) in cols.iter().enumerate() {
            self.table.raise_to(row, col, target);
        }
    }

    /// Estimates the frequency of `item`
    ///
    /// Returns the minimum probed counter, never below the true count.
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

    /// Halves every counter, returning the count of shifted-out one-bits.
    pub(crate) fn halve(&mut self) -> u64 {
        self.table.halve()
    }
}

impl FrequencyEstimator for ConservativeCountMin {
    fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64) {
        ConservativeCountMin::add(self, item, count);
    }

    fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        ConservativeCountMin::estimate(self, item)
    }
}
