//! Drives the admission policy over a skewed synthetic stream and prints
//! what a small cache would have done with each miss.
//!
//! Run with: `cargo run --example admission_demo`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tinylfu_sketch::TinyLfu;

fn main() {
    const CACHE_SLOTS: usize = 8;

    let mut policy = TinyLfu::new(4, 1024, 1, 10_240)
        .expect("valid sketch parameters")
        .with_doorkeeper(1024);

    // A handful of hot keys in a sea of cold ones, roughly Zipf-shaped.
    let mut rng = StdRng::seed_from_u64(7);
    let mut cache: Vec<u64> = (0..CACHE_SLOTS as u64).collect();
    let mut hits = 0usize;
    let mut admissions = 0usize;
    let mut rejections = 0usize;

    for tick in 0..50_000u64 {
        let key = if rng.random_ratio(7, 10) {
            rng.random_range(0..8u64)
        } else {
            1000 + rng.random_range(0..5000u64)
        };
        policy.record(&key);

        if cache.contains(&key) {
            hits += 1;
            continue;
        }

        // Evict the coldest resident if the newcomer earned its slot.
        let (victim_slot, victim) = cache
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(_, resident)| policy.estimate(&resident))
            .expect("cache is never empty");

        if policy.admit(&key, &victim) {
            cache[victim_slot] = key;
            admissions += 1;
        } else {
            rejections += 1;
        }

        if tick % 10_000 == 0 && tick > 0 {
            println!(
                "tick {:>6}: {} hits, {} admissions, {} rejections, {} aging cycles",
                tick,
                hits,
                admissions,
                rejections,
                policy.sketch().resets()
            );
        }
    }

    println!();
    println!("final cache residents: {:?}", cache);
    println!(
        "hit rate {:.1}% over 50k accesses",
        100.0 * hits as f64 / 50_000.0
    );
}
