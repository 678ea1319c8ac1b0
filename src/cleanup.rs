//! Removal of invalid atomic intervals after the final overlay.

use crate::{AtomicInterval, NO_TOWN};
use log::info;

/// Counts of intervals touched by each cleanup rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    /// Removed: town absent or the "no boundary" town id
    pub no_town: usize,
    /// Removed: no segment identifier while a segment filter is in force
    pub no_segment: usize,
    /// Start positions forced from negative to 0
    pub clamped: usize,
    /// Removed: zero or negative length
    pub degenerate: usize,
}

/// Apply the cleanup rules and sort by `(from_pos, segment_id)`.
///
/// Rules, in order:
/// 1. drop intervals whose town is absent or [`NO_TOWN`]
/// 2. if a segment filter was supplied, drop intervals without a segment id
/// 3. force negative `from_pos` to 0
/// 4. drop intervals with `from_pos >= to_pos`
pub fn cleanup(atoms: Vec<AtomicInterval>, segment_filter_supplied: bool) -> Vec<AtomicInterval> {
    cleanup_with_stats(atoms, segment_filter_supplied).0
}

/// [`cleanup`], also returning per-rule counts.
pub fn cleanup_with_stats(
    atoms: Vec<AtomicInterval>,
    segment_filter_supplied: bool,
) -> (Vec<AtomicInterval>, CleanupStats) {
    let mut stats = CleanupStats::default();
    let input_len = atoms.len();

    let mut kept: Vec<AtomicInterval> = atoms
        .into_iter()
        .filter(|atom| {
            let keep = atom.attributes.town_id.is_some_and(|id| id != NO_TOWN);
            if !keep {
                stats.no_town += 1;
            }
            keep
        })
        .filter(|atom| {
            let keep = !segment_filter_supplied || !atom.attributes.segment_id().is_empty();
            if !keep {
                stats.no_segment += 1;
            }
            keep
        })
        .map(|mut atom| {
            if atom.from_pos < 0.0 {
                atom.from_pos = 0.0;
                stats.clamped += 1;
            }
            atom
        })
        .filter(|atom| {
            let keep = atom.from_pos < atom.to_pos;
            if !keep {
                stats.degenerate += 1;
            }
            keep
        })
        .collect();

    kept.sort_by(|a, b| {
        a.from_pos
            .total_cmp(&b.from_pos)
            .then_with(|| a.attributes.segment_id().cmp(b.attributes.segment_id()))
    });

    info!(
        "[Cleanup] {} -> {} atoms (no town: {}, no segment: {}, clamped: {}, degenerate: {})",
        input_len,
        kept.len(),
        stats.no_town,
        stats.no_segment,
        stats.clamped,
        stats.degenerate
    );

    (kept, stats)
}
