//! # Segment Rollup
//!
//! Collapses the cleaned atomic intervals of a route into one
//! [`SummaryRecord`] per segment identifier.
//!
//! ## Statistics
//! - Extent: first member's start and last member's end, after sorting by start.
//!   Members need not be contiguous; gaps are neither reported nor counted.
//! - Total length: sum of member lengths
//! - Speed limit: length-weighted mean over members whose limit is not
//!   [`SPEED_LIMIT_NONE`] or [`SPEED_LIMIT_PLACEHOLDER`], rounded to the
//!   nearest multiple of 5
//! - Lane count: length-weighted mean over members whose count is not
//!   [`LANE_COUNT_NONE`], rounded up
//! - Towns: distinct ids ascending, mapped to names and joined
//!
//! A segment with no usable speed limit or lane count gets [`UNKNOWN`] for
//! that value and its id is appended to the problem list, once per attribute.

use crate::towns::{TownNames, join_town_names};
use crate::{
    AtomicInterval, LANE_COUNT_NONE, SPEED_LIMIT_NONE, SPEED_LIMIT_PLACEHOLDER, SummaryRecord,
    TownId, UNKNOWN,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Summary records of one route plus the segments that lacked usable data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    /// One record per segment identifier, ascending by `from_pos`
    pub records: Vec<SummaryRecord>,
    /// Segment ids with no usable speed limit and/or lane count.
    /// An id appears twice when both attributes were unusable.
    pub problem_segments: Vec<String>,
}

impl Rollup {
    /// Record for a segment identifier, if present.
    pub fn record(&self, segment_id: &str) -> Option<&SummaryRecord> {
        self.records.iter().find(|r| r.segment_id == segment_id)
    }

    /// Append another route's records and problem entries, keeping order.
    pub fn absorb(&mut self, other: Rollup) {
        self.records.extend(other.records);
        self.problem_segments.extend(other.problem_segments);
    }

    pub fn has_problems(&self) -> bool {
        !self.problem_segments.is_empty()
    }

    /// Log the problem list for the operator.
    pub fn report_problems(&self) {
        if self.problem_segments.is_empty() {
            return;
        }
        warn!("*** No usable attribute value(s) were found for the following segments:");
        for segment_id in &self.problem_segments {
            warn!("    {}", segment_id);
        }
    }
}

/// Roll up atomic intervals into one summary record per segment identifier.
pub fn rollup<N: TownNames + ?Sized>(
    atoms: &[AtomicInterval],
    names: &N,
    town_delimiter: &str,
) -> Rollup {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&AtomicInterval>> = HashMap::new();
    for atom in atoms {
        let segment_id = atom.attributes.segment_id();
        groups
            .entry(segment_id)
            .or_insert_with(|| {
                order.push(segment_id);
                Vec::new()
            })
            .push(atom);
    }

    let mut problem_segments = Vec::new();
    let mut records: Vec<SummaryRecord> = order
        .into_iter()
        .filter_map(|segment_id| groups.remove(segment_id))
        .map(|members| summarize_segment(members, names, town_delimiter, &mut problem_segments))
        .collect();

    records.sort_by(|a, b| a.from_pos.total_cmp(&b.from_pos));

    info!(
        "[Rollup] {} atoms -> {} segment records ({} problem entries)",
        atoms.len(),
        records.len(),
        problem_segments.len()
    );

    Rollup {
        records,
        problem_segments,
    }
}

/// Summarize the members of one segment group. `members` must be non-empty.
fn summarize_segment<N: TownNames + ?Sized>(
    mut members: Vec<&AtomicInterval>,
    names: &N,
    town_delimiter: &str,
    problem_segments: &mut Vec<String>,
) -> SummaryRecord {
    members.sort_by(|a, b| a.from_pos.total_cmp(&b.from_pos));
    let first = members[0];
    let last = members[members.len() - 1];
    let segment_id = first.attributes.segment_id().to_string();

    debug!("[Rollup] Segment {}: {} intervals", segment_id, members.len());

    let total_length: f64 = members.iter().map(|m| m.length()).sum();

    let speed_limit = weighted_mean(members.iter().filter_map(|m| {
        m.attributes
            .speed_limit
            .filter(|v| *v != SPEED_LIMIT_NONE && *v != SPEED_LIMIT_PLACEHOLDER)
            .map(|v| (f64::from(v), m.length()))
    }))
    .map(round_speed_limit)
    .unwrap_or_else(|| {
        warn!("[Rollup] No usable speed limit records for segment {}", segment_id);
        problem_segments.push(segment_id.clone());
        UNKNOWN
    });

    let lane_count = weighted_mean(members.iter().filter_map(|m| {
        m.attributes
            .lane_count
            .filter(|v| *v != LANE_COUNT_NONE)
            .map(|v| (f64::from(v), m.length()))
    }))
    .map(round_lane_count)
    .unwrap_or_else(|| {
        warn!("[Rollup] No usable lane count records for segment {}", segment_id);
        problem_segments.push(segment_id.clone());
        UNKNOWN
    });

    let town_ids: Vec<TownId> = members
        .iter()
        .filter_map(|m| m.attributes.town_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let towns = join_town_names(&town_ids, names, town_delimiter);

    // Descriptive fields come from the first member; they are not checked
    // for agreement across members.
    let info = first.attributes.segment.as_deref().cloned().unwrap_or_default();

    SummaryRecord {
        segment_id,
        segment_type: info.segment_type,
        route_id: info.route_id,
        road_number: info.road_number,
        direction: info.direction,
        road_name: info.road_name,
        from_pos: first.from_pos,
        to_pos: last.to_pos,
        total_length,
        speed_limit,
        lane_count,
        town_ids,
        towns,
    }
}

/// Length-weighted mean of `(value, length)` pairs.
///
/// Returns `None` for an empty input or when any value or length is not
/// finite. The result is clamped to the range of the input values so float
/// error cannot push an exact mean past an integer. If every length is zero
/// the plain mean is used.
pub fn weighted_mean(values: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_length = 0.0;
    let mut plain_sum = 0.0;
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (value, length) in values {
        if !value.is_finite() || !length.is_finite() {
            return None;
        }
        weighted_sum += value * length;
        total_length += length;
        plain_sum += value;
        count += 1;
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return None;
    }

    let mean = if total_length > 0.0 {
        weighted_sum / total_length
    } else {
        plain_sum / count as f64
    };
    Some(mean.clamp(min, max))
}

/// Round a speed limit to the nearest multiple of 5 (`5 * round(x / 5)`).
///
/// Halfway quotients round away from zero.
pub fn round_speed_limit(mean: f64) -> i32 {
    ((mean / 5.0).round() * 5.0) as i32
}

/// Round a lane count up to the next integer.
pub fn round_lane_count(mean: f64) -> i32 {
    mean.ceil() as i32
}
