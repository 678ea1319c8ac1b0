//! # Interval Overlay
//!
//! Merges two linearly-referenced interval sets on the same route axis into
//! the finest partition of the axis, where each atomic interval carries the
//! union of the attributes of whichever source intervals cover it.
//!
//! ## Algorithm
//! 1. Collect every `from_pos` / `to_pos` of both inputs
//! 2. Sort ascending and deduplicate
//! 3. Walk consecutive boundary pairs; each pair is one candidate atom
//! 4. Advance one cursor per input to find the (at most one) covering interval
//! 5. Emit the atom with merged attributes, or drop it per [`OverlayMode`]
//!    when neither input covers it
//!
//! Inputs must be sorted ascending by `from_pos` and internally
//! non-overlapping. Violations are a caller bug; the pipeline driver checks
//! them with [`crate::validate_intervals`] before calling in here.

use crate::{AtomicInterval, AttributeSet, Interval};
use log::debug;
use serde::{Deserialize, Serialize};

/// What to do with a sub-range covered by neither input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayMode {
    /// Keep uncovered sub-ranges, with every domain absent
    Zero,
    /// Drop uncovered sub-ranges
    NoZero,
}

impl OverlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayMode::Zero => "ZERO",
            OverlayMode::NoZero => "NO_ZERO",
        }
    }
}

impl std::fmt::Display for OverlayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay two ordered, internally non-overlapping interval sets.
///
/// Output atoms are ordered by position and never zero length.
///
/// # Example
/// ```
/// use routeconflate::{AttributeValue, Interval};
/// use routeconflate::overlay::{overlay, OverlayMode};
///
/// let limits = vec![Interval::new(0.0, 4.0, AttributeValue::SpeedLimit(30))];
/// let lanes = vec![Interval::new(6.0, 8.0, AttributeValue::LaneCount(2))];
///
/// assert_eq!(overlay(&limits, &lanes, OverlayMode::NoZero).len(), 2);
/// // The gap [4, 6) survives only in ZERO mode
/// assert_eq!(overlay(&limits, &lanes, OverlayMode::Zero).len(), 3);
/// ```
pub fn overlay(set_a: &[Interval], set_b: &[Interval], mode: OverlayMode) -> Vec<AtomicInterval> {
    debug_assert!(is_well_formed(set_a), "left overlay input is unordered or overlapping");
    debug_assert!(is_well_formed(set_b), "right overlay input is unordered or overlapping");

    let mut bounds: Vec<f64> = set_a
        .iter()
        .chain(set_b)
        .flat_map(|iv| [iv.from_pos, iv.to_pos])
        .collect();
    bounds.sort_by(f64::total_cmp);
    bounds.dedup();

    let mut cursor_a = Cursor::new(set_a);
    let mut cursor_b = Cursor::new(set_b);
    let mut atoms = Vec::with_capacity(bounds.len().saturating_sub(1));
    let mut dropped = 0usize;

    for pair in bounds.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo >= hi {
            continue;
        }

        let attributes = match (cursor_a.covering(lo, hi), cursor_b.covering(lo, hi)) {
            (Some(a), Some(b)) => a.attributes.merge(&b.attributes),
            (Some(a), None) => a.attributes.clone(),
            (None, Some(b)) => b.attributes.clone(),
            (None, None) => match mode {
                OverlayMode::Zero => AttributeSet::default(),
                OverlayMode::NoZero => {
                    dropped += 1;
                    continue;
                }
            },
        };

        atoms.push(Interval::with_attributes(lo, hi, attributes));
    }

    debug!(
        "[Overlay] {} + {} intervals -> {} atoms ({}, {} uncovered dropped)",
        set_a.len(),
        set_b.len(),
        atoms.len(),
        mode,
        dropped
    );

    atoms
}

/// Forward-only scan over one ordered input.
struct Cursor<'a> {
    intervals: &'a [Interval],
    next: usize,
}

impl<'a> Cursor<'a> {
    fn new(intervals: &'a [Interval]) -> Self {
        Self { intervals, next: 0 }
    }

    /// Interval covering `[lo, hi)`, if any. Calls must use increasing `lo`.
    fn covering(&mut self, lo: f64, hi: f64) -> Option<&'a Interval> {
        while let Some(iv) = self.intervals.get(self.next)
            && iv.to_pos <= lo
        {
            self.next += 1;
        }
        // Every boundary of every input is a sweep boundary, so an interval
        // either spans [lo, hi) entirely or does not touch it.
        self.intervals
            .get(self.next)
            .filter(|iv| iv.from_pos <= lo && iv.to_pos >= hi)
    }
}

fn is_well_formed(intervals: &[Interval]) -> bool {
    intervals.iter().all(|iv| iv.from_pos < iv.to_pos)
        && intervals.windows(2).all(|w| w[0].to_pos <= w[1].from_pos)
}
