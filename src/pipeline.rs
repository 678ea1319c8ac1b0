//! Per-route conflation pipeline.
//!
//! segments ⊕ towns ⊕ speed limits ⊕ lane counts → cleanup → rollup
//!
//! Each route is independent, so [`conflate_routes`] can process many
//! routes in parallel. Within a route the stages run strictly in sequence.

use crate::cleanup::cleanup;
use crate::overlay::overlay;
use crate::progress::ConflateProgress;
use crate::rollup::{Rollup, rollup};
use crate::towns::TownNames;
use crate::{AtomicInterval, ConflateConfig, ConflateError, Domain, Interval, Result};
use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The externally produced interval sets for one route, each sorted by
/// `from_pos` and internally non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteInputs {
    pub route_id: String,
    #[serde(default)]
    pub segments: Vec<Interval>,
    #[serde(default)]
    pub towns: Vec<Interval>,
    #[serde(default)]
    pub speed_limits: Vec<Interval>,
    #[serde(default)]
    pub lane_counts: Vec<Interval>,
}

impl RouteInputs {
    pub fn new(route_id: &str) -> Self {
        Self {
            route_id: route_id.to_string(),
            ..Default::default()
        }
    }

    fn domain_sets(&self) -> [(Domain, &[Interval]); 4] {
        [
            (Domain::Segment, self.segments.as_slice()),
            (Domain::Town, self.towns.as_slice()),
            (Domain::SpeedLimit, self.speed_limits.as_slice()),
            (Domain::LaneCount, self.lane_counts.as_slice()),
        ]
    }
}

/// Result of conflating one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub route_id: String,
    /// Atomic intervals after cleanup, ordered by `(from_pos, segment_id)`
    pub atomic_intervals: Vec<AtomicInterval>,
    pub rollup: Rollup,
}

/// Check that an interval set meets the overlay preconditions: finite,
/// strictly increasing bounds, sorted by start, no self-overlap.
pub fn validate_intervals(domain: Domain, intervals: &[Interval]) -> Result<()> {
    for (index, iv) in intervals.iter().enumerate() {
        if !iv.from_pos.is_finite() || !iv.to_pos.is_finite() || iv.from_pos >= iv.to_pos {
            return Err(ConflateError::InvalidInterval {
                domain,
                index,
                from: iv.from_pos,
                to: iv.to_pos,
            });
        }
    }
    for (i, pair) in intervals.windows(2).enumerate() {
        if pair[1].from_pos < pair[0].from_pos {
            return Err(ConflateError::UnorderedInput {
                domain,
                index: i + 1,
            });
        }
        if pair[1].from_pos < pair[0].to_pos {
            return Err(ConflateError::OverlappingInput {
                domain,
                index: i + 1,
            });
        }
    }
    Ok(())
}

/// Overlay one route's four attribute sets and clean up the result.
///
/// Returns the atomic intervals ordered by `(from_pos, segment_id)`.
pub fn atomize(inputs: &RouteInputs, config: &ConflateConfig) -> Result<Vec<AtomicInterval>> {
    for (domain, intervals) in inputs.domain_sets() {
        validate_intervals(domain, intervals)?;
    }

    let segments: Cow<'_, [Interval]> = match &config.segment_filter {
        Some(allowed) => Cow::Owned(
            inputs
                .segments
                .iter()
                .filter(|iv| allowed.contains(iv.attributes.segment_id()))
                .cloned()
                .collect(),
        ),
        None => Cow::Borrowed(inputs.segments.as_slice()),
    };
    if segments.len() != inputs.segments.len() {
        info!(
            "[Conflate] Segment filter kept {} of {} segment intervals",
            segments.len(),
            inputs.segments.len()
        );
    }

    let modes = &config.overlay_modes;
    let with_towns = overlay(&segments, &inputs.towns, modes.towns);
    let with_limits = overlay(&with_towns, &inputs.speed_limits, modes.speed_limits);
    let with_lanes = overlay(&with_limits, &inputs.lane_counts, modes.lane_counts);

    Ok(cleanup(with_lanes, config.segment_filter.is_some()))
}

/// Conflate one route's attribute sets into summary records.
pub fn conflate_route<N: TownNames + ?Sized>(
    inputs: &RouteInputs,
    names: &N,
    config: &ConflateConfig,
) -> Result<RouteSummary> {
    info!(
        "[Conflate] Route {}: {} segments, {} towns, {} speed limits, {} lane counts",
        inputs.route_id,
        inputs.segments.len(),
        inputs.towns.len(),
        inputs.speed_limits.len(),
        inputs.lane_counts.len()
    );

    let atomic_intervals = atomize(inputs, config)?;
    let rollup = rollup(&atomic_intervals, names, &config.town_delimiter);

    info!(
        "[Conflate] Route {}: {} summary records",
        inputs.route_id,
        rollup.records.len()
    );

    Ok(RouteSummary {
        route_id: inputs.route_id.clone(),
        atomic_intervals,
        rollup,
    })
}

/// Conflate many independent routes. Results keep the input order.
///
/// Uses rayon when the `parallel` feature is enabled.
pub fn conflate_routes<N: TownNames + Sync + ?Sized>(
    routes: &[RouteInputs],
    names: &N,
    config: &ConflateConfig,
    progress: &dyn ConflateProgress,
) -> Vec<Result<RouteSummary>> {
    progress.on_start(routes.len() as u32);

    let run = |inputs: &RouteInputs| {
        let result = conflate_route(inputs, names, config);
        progress.on_route_done(&inputs.route_id);
        result
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<RouteSummary>> = routes.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<RouteSummary>> = routes.iter().map(run).collect();

    results
}
