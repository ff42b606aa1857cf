//! Core trait for frequency estimators

use std::hash::Hash;

/// Common surface of the frequency sketches
///
/// The admission layer and the test harnesses only need these operations, so
/// the classical, conservative, and aging sketches stay interchangeable
/// behind it. Implementations must keep the one-sided error guarantee:
/// `estimate` never reports less than the (decayed) true count.
pub trait FrequencyEstimator {
    /// Record `count` occurrences of `item`
    ///
    /// `count` of zero is a no-op.
    fn add<T: Hash + ?Sized>(&mut self, item: &T, count: u64);

    /// Estimated number of occurrences of `item`
    fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64;

    /// Record a single occurrence of `item`
    fn increment<T: Hash + ?Sized>(&mut self, item: &T) {
        self.add(item, 1);
    }
}
