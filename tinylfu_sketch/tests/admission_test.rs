//! Tests for the TinyLFU admission policy
//!
//! The admission rule compares candidate and victim estimates and keeps the
//! victim on ties; the doorkeeper and the jittered variant refine that rule
//! without weakening it.

use tinylfu_sketch::TinyLfu;

#[test]
fn test_admission_rule_after_aging() {
    let mut policy = TinyLfu::new(4, 128, 1, 1000).unwrap();

    for _ in 0..400 {
        policy.record(&"hot");
    }
    for _ in 0..4 {
        policy.record(&"cold");
    }
    for i in 0..600u64 {
        policy.record(&format!("filler_{}", i));
    }
    assert_eq!(policy.sketch().resets(), 1);

    assert!(policy.admit(&"hot", &"cold"));
    assert!(!policy.admit(&"cold", &"hot"));
    // reject on tie, even against itself
    assert!(!policy.admit(&"cold", &"cold"));
}

#[test]
fn test_with_error_constructor() {
    let policy = TinyLfu::with_error(0.01, 0.01, 1, 1000).unwrap();
    assert_eq!(policy.sketch().width(), 272);
    assert_eq!(policy.sketch().depth(), 5);
    assert!(TinyLfu::with_error(0.01, 0.01, 1, 0).is_err());
}

#[test]
fn test_candidate_recorded_before_query_wins_over_unseen() {
    let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
    policy.record(&"candidate");
    assert!(policy.estimate(&"candidate") >= 1);
    assert!(policy.admit(&"candidate", &"unseen-victim"));
}

#[test]
fn test_doorkeeper_keeps_one_hit_wonders_out_of_counters() {
    let mut policy = TinyLfu::new(4, 256, 1, 10_000).unwrap().with_doorkeeper(1024);

    for i in 0..50u64 {
        policy.record(&format!("once_{}", i));
    }
    // Every sighting was a first sighting: the counters never moved.
    assert_eq!(policy.sketch().size(), 0);
    assert!(policy.sketch().is_empty());

    // Repeat visitors graduate into the sketch.
    for _ in 0..5 {
        policy.record(&"regular");
    }
    assert_eq!(policy.sketch().size(), 4);
    assert_eq!(policy.estimate(&"regular"), 5);
}

#[test]
fn test_doorkeeper_cleared_when_sketch_ages() {
    let mut policy = TinyLfu::new(4, 64, 1, 20).unwrap().with_doorkeeper(64);

    for i in 0..60u64 {
        let item = format!("key_{}", i);
        policy.record(&item);
        policy.record(&item);
        if policy.sketch().resets() == 1 {
            // The record that crossed the threshold also dropped the door.
            assert!(policy.doorkeeper().unwrap().is_empty());
            return;
        }
        assert!(!policy.doorkeeper().unwrap().is_empty());
    }
    panic!("sample threshold was never crossed");
}

#[test]
fn test_jitter_admits_warm_losers_rarely() {
    let mut policy = TinyLfu::new(4, 256, 5, 1_000_000).unwrap();
    for _ in 0..10 {
        policy.record(&"warm");
    }
    for _ in 0..20 {
        policy.record(&"hot");
    }

    let admitted = (0..2000)
        .filter(|_| policy.admit_with_jitter(&"warm", &"hot"))
        .count();

    // Expected about 2000/128 ~ 16 admissions.
    assert!(admitted >= 1, "jitter never fired in 2000 attempts");
    assert!(admitted <= 80, "jitter fired {} times in 2000 attempts", admitted);

    // The deterministic rule still refuses the same candidate outright.
    assert!(!policy.admit(&"warm", &"hot"));
}

#[test]
fn test_jitter_matches_plain_admit_for_winners() {
    let mut policy = TinyLfu::new(4, 64, 1, 1000).unwrap();
    for _ in 0..10 {
        policy.record(&"winner");
    }
    policy.record(&"loser");

    assert!(policy.admit(&"winner", &"loser"));
    assert!(policy.admit_with_jitter(&"winner", &"loser"));
}
