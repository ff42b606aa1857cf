//! Hash family for the frequency sketches
//!
//! Derives the `d` per-row column probes that the Count-Min error bounds
//! rely on: one seeded pre-hash of the item, one avalanche mix per row, and
//! an unbiased fast-range reduction to `[0, width)`. Everything here is
//! deterministic in `(seed, row, item)` so two sketches built with the same
//! parameters probe the same cells across runs and processes.

use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

/// 64-bit golden-ratio increment, used to spread the per-row keys.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Hashes any `Hash` item to a fixed-width integer under the given seed.
///
/// Variable-length items (strings, byte slices, tuples) are folded through
/// `XxHash64` first so every downstream probe works on a single 64-bit value.
///
/// # Examples
/// ```
/// use tinylfu_sketch::hash::hash_item;
///
/// assert_eq!(hash_item(&"key", 7), hash_item(&"key", 7));
/// assert_ne!(hash_item(&"key", 7), hash_item(&"key", 8));
/// ```
#[inline]
pub fn hash_item<T: Hash + ?Sized>(item: &T, seed: u64) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish()
}

/// 64-bit avalanche mixer (the splitmix64 finalizer).
///
/// Flipping any input bit flips about half of the output bits, which keeps
/// the row probes close to pairwise independent even though they all start
/// from one pre-hash.
#[inline]
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^= x >> 31;
    x
}

/// Derives one mixing key per row from the sketch seed.
pub fn derive_row_keys(seed: u64, depth: usize) -> Vec<u64> {
    (0..depth)
        .map(|i| mix64(seed.wrapping_add((i as u64 + 1).wrapping_mul(GOLDEN_GAMMA))))
        .collect()
}

/// Lemire's multiply-shift reduction of a 64-bit hash to `[0, range)`.
///
/// Equivalent in distribution to `hash % range` but unbiased for ranges
/// that are not powers of two, and cheaper than a division.
#[inline]
pub fn fast_range(hash: u64, range: usize) -> usize {
    (((hash as u128) * (range as u128)) >> 64) as usize
}

/// Column probed in one row for a pre-hashed item.
#[inline]
pub fn column_index(item_hash: u64, row_key: u64, width: usize) -> usize {
    fast_range(mix64(item_hash ^ row_key), width)
}
