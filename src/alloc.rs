//! Free-space allocation
//!
//! Computes the gaps left in the main section once everything occupying it
//! (payload spans, directory entry storage spans, and any spans reserved for
//! an allocation in progress) is accounted for, and hands out spots.
//!
//! ## Placement Policy
//!
//! - A spot is chosen **uniformly at random** among the free spans that fit,
//!   not first-fit or best-fit. Writes spread across the section instead of
//!   packing tightly.
//! - When no single span fits a payload, it is split greedily across the
//!   **largest spans first**. That keeps the fragment count low without
//!   being optimal, and fails only when the free spans sum to less than the
//!   request.

use rand::Rng;
use tracing::trace;

use crate::error::{Result, StoreError};
use crate::span::Span;

/// Ordered list of free spans in a section of `capacity` bytes
///
/// Only gaps of at least `min_len` bytes are reported, with one exception:
/// the trailing span after the last occupied byte is always present, and is
/// degenerate (zero length) when the section is fully occupied. Callers must
/// tolerate that trailing span.
///
/// A zero-capacity section has no byte offsets at all, so it yields no spans,
/// not even a trailing one.
pub fn free_spans(capacity: u32, occupied: &[Span], min_len: u32) -> Vec<Span> {
    if capacity == 0 {
        return Vec::new();
    }
    let mut used: Vec<Span> = occupied.iter().copied().filter(|s| !s.is_empty()).collect();
    used.sort_by_key(|s| s.start);

    let mut free = Vec::new();
    // One byte before the section, so a gap can start at offset 0.
    let mut last: i64 = -1;
    for span in used {
        let gap = i64::from(span.start) - last - 1;
        if gap >= i64::from(min_len) && gap > 0 {
            free.push(Span::new((last + 1) as u32, span.start - 1));
        }
        last = last.max(i64::from(span.end));
    }
    // Trailing span, degenerate when occupancy reaches the end.
    free.push(Span {
        start: (last + 1) as u32,
        end: capacity - 1,
    });
    free
}

/// Pick a random spot of exactly `size` bytes among the free spans
///
/// Returns the first `size` bytes of a uniformly chosen candidate, or `None`
/// when no single free span is large enough.
pub fn pick_spot(free: &[Span], size: u32, rng: &mut impl Rng) -> Option<Span> {
    debug_assert!(size > 0);
    let candidates: Vec<Span> = free.iter().copied().filter(|s| s.len() >= size).collect();
    if candidates.is_empty() {
        return None;
    }
    let choice = candidates[rng.gen_range(0..candidates.len())];
    trace!(
        start = choice.start,
        size,
        candidates = candidates.len(),
        "picked spot"
    );
    Some(choice.prefix(size))
}

/// Split `size` bytes across free spans, largest first
///
/// The returned spans cover exactly `size` bytes in order; the last one is
/// truncated to the remaining byte count. Fails with
/// [`StoreError::Exhausted`] when the free spans sum to less than `size`.
pub fn fragment(free: &[Span], size: u32) -> Result<Vec<Span>> {
    let available: u32 = free.iter().map(Span::len).sum();
    if available < size {
        return Err(StoreError::Exhausted {
            requested: size,
            available,
        });
    }

    let mut by_size: Vec<Span> = free.iter().copied().filter(|s| !s.is_empty()).collect();
    by_size.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut chosen = Vec::new();
    let mut remaining = size;
    for span in by_size {
        let take = remaining.min(span.len());
        chosen.push(span.prefix(take));
        remaining -= take;
        if remaining == 0 {
            break;
        }
    }
    trace!(size, fragments = chosen.len(), "fragmented allocation");
    Ok(chosen)
}
