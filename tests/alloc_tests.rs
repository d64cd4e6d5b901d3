//! Allocator Tests
//!
//! Tests for free-span computation, random spot selection, and fragmented
//! allocation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use spanstore::alloc::{fragment, free_spans, pick_spot};
use spanstore::{Span, StoreError};

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

// =============================================================================
// Free Span Computation Tests
// =============================================================================

#[test]
fn test_empty_section_is_one_free_span() {
    let free = free_spans(2048, &[], 1);
    assert_eq!(free, vec![Span::new(0, 2047)]);
}

#[test]
fn test_zero_capacity_section_has_no_spans() {
    assert!(free_spans(0, &[], 1).is_empty());
}

#[test]
fn test_gap_before_and_after_occupied() {
    let free = free_spans(100, &[Span::new(40, 59)], 1);
    assert_eq!(free, vec![Span::new(0, 39), Span::new(60, 99)]);
}

#[test]
fn test_occupied_at_start() {
    // No gap before offset 0; only the trailing span remains
    let free = free_spans(100, &[Span::new(0, 49)], 1);
    assert_eq!(free, vec![Span::new(50, 99)]);
}

#[test]
fn test_fully_occupied_leaves_degenerate_trailing_span() {
    let free = free_spans(100, &[Span::new(0, 99)], 1);
    assert_eq!(free.len(), 1);
    assert!(free[0].is_empty());
    assert_eq!(free[0].start, 100);
}

#[test]
fn test_min_len_filters_gaps_but_not_trailing() {
    // Gaps: [10, 19] (10 bytes) and [50, 99] (trailing)
    let occupied = [Span::new(0, 9), Span::new(20, 49)];
    let filtered = free_spans(100, &occupied, 16);
    assert_eq!(filtered, vec![Span::new(50, 99)]);

    let all = free_spans(100, &occupied, 1);
    assert_eq!(all, vec![Span::new(10, 19), Span::new(50, 99)]);
}

#[test]
fn test_unsorted_occupied_input() {
    let occupied = [Span::new(60, 79), Span::new(10, 19), Span::new(30, 39)];
    let free = free_spans(100, &occupied, 1);
    assert_eq!(
        free,
        vec![
            Span::new(0, 9),
            Span::new(20, 29),
            Span::new(40, 59),
            Span::new(80, 99)
        ]
    );
}

#[test]
fn test_adjacent_occupied_spans_leave_no_gap() {
    let occupied = [Span::new(0, 9), Span::new(10, 19)];
    let free = free_spans(100, &occupied, 1);
    assert_eq!(free, vec![Span::new(20, 99)]);
}

#[test]
fn test_degenerate_occupied_spans_ignored() {
    let occupied = [Span::new(50, 40)];
    let free = free_spans(100, &occupied, 1);
    assert_eq!(free, vec![Span::new(0, 99)]);
}

// =============================================================================
// Spot Selection Tests
// =============================================================================

#[test]
fn test_spot_is_prefix_of_a_candidate() {
    let free = vec![Span::new(0, 9), Span::new(20, 99)];
    let mut rng = rng();
    for _ in 0..50 {
        let spot = pick_spot(&free, 8, &mut rng).unwrap();
        assert_eq!(spot.len(), 8);
        assert!(free.iter().any(|f| f.start == spot.start && spot.end <= f.end));
    }
}

#[test]
fn test_spot_skips_small_spans() {
    let free = vec![Span::new(0, 9), Span::new(20, 99)];
    let mut rng = rng();
    for _ in 0..50 {
        // Only the 80-byte span qualifies
        let spot = pick_spot(&free, 50, &mut rng).unwrap();
        assert_eq!(spot, Span::new(20, 69));
    }
}

#[test]
fn test_spot_spreads_across_candidates() {
    // Uniform choice, not first-fit: over enough draws both spans get picked
    let free = vec![Span::new(0, 49), Span::new(100, 149)];
    let mut rng = rng();
    let mut seen_first = false;
    let mut seen_second = false;
    for _ in 0..100 {
        let spot = pick_spot(&free, 10, &mut rng).unwrap();
        match spot.start {
            0 => seen_first = true,
            100 => seen_second = true,
            other => panic!("spot started at unexpected offset {other}"),
        }
    }
    assert!(seen_first && seen_second);
}

#[test]
fn test_spot_none_when_nothing_fits() {
    let free = vec![Span::new(0, 9), Span::new(20, 29)];
    assert!(pick_spot(&free, 11, &mut rng()).is_none());
}

#[test]
fn test_spot_tolerates_degenerate_trailing_span() {
    let free = vec![Span::new(100, 99)];
    assert!(pick_spot(&free, 1, &mut rng()).is_none());
}

// =============================================================================
// Fragmentation Tests
// =============================================================================

#[test]
fn test_fragment_largest_first() {
    let free = vec![Span::new(0, 9), Span::new(20, 79), Span::new(90, 119)];
    // Sizes: 10, 60, 30 — largest first means the 60 then the 30
    let spans = fragment(&free, 80).unwrap();
    assert_eq!(spans, vec![Span::new(20, 79), Span::new(90, 109)]);
    assert_eq!(spans.iter().map(Span::len).sum::<u32>(), 80);
}

#[test]
fn test_fragment_truncates_last_span() {
    let free = vec![Span::new(0, 99)];
    let spans = fragment(&free, 30).unwrap();
    assert_eq!(spans, vec![Span::new(0, 29)]);
}

#[test]
fn test_fragment_exact_fit_consumes_everything() {
    let free = vec![Span::new(0, 9), Span::new(20, 29)];
    let spans = fragment(&free, 20).unwrap();
    assert_eq!(spans.iter().map(Span::len).sum::<u32>(), 20);
    assert_eq!(spans.len(), 2);
}

#[test]
fn test_fragment_exhaustion() {
    let free = vec![Span::new(0, 9), Span::new(20, 29)];
    match fragment(&free, 21) {
        Err(StoreError::Exhausted {
            requested,
            available,
        }) => {
            assert_eq!(requested, 21);
            assert_eq!(available, 20);
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[test]
fn test_fragment_ignores_degenerate_spans() {
    let free = vec![Span::new(0, 29), Span::new(100, 99)];
    let spans = fragment(&free, 30).unwrap();
    assert_eq!(spans, vec![Span::new(0, 29)]);
}
