//! Interval Tests
//!
//! Tests for the fixed-rate trigger.

use std::time::Duration;

use spanstore::Interval;

#[test]
fn test_first_tick_fires() {
    let mut interval = Interval::new(Duration::from_secs(60));
    assert!(interval.tick());
}

#[test]
fn test_does_not_fire_within_period() {
    let mut interval = Interval::new(Duration::from_secs(60));
    assert!(interval.tick());
    for _ in 0..10 {
        assert!(!interval.tick());
    }
}

#[test]
fn test_fires_again_after_period() {
    let mut interval = Interval::new(Duration::from_millis(20));
    assert!(interval.tick());
    assert!(!interval.tick());

    std::thread::sleep(Duration::from_millis(25));
    assert!(interval.tick());
    assert!(!interval.tick());
}
