//! Location of road segment features along a route.
//!
//! Geometry lives outside this crate: a [`RouteProjector`] turns a point
//! into a raw route measure. This module clamps those measures onto the
//! route, drops events that collapse to nothing, and orders the rest.

use crate::measure::{clamp_position, sort_by_position};
use crate::{AttributeValue, Interval, SegmentInfo};
use log::debug;

/// Projects points onto one route's geometry.
pub trait RouteProjector {
    type Point;

    /// Raw measure of the nearest route position. May be negative or exceed
    /// the route length.
    fn project(&self, point: &Self::Point) -> f64;

    /// Measure of the route's last vertex.
    fn route_length(&self) -> f64;
}

/// A road segment feature: its identity plus its first and last points.
#[derive(Debug, Clone)]
pub struct SegmentFeature<P> {
    pub info: SegmentInfo,
    pub start: P,
    pub end: P,
}

/// Locate segment features along a route as segment intervals.
///
/// Both end points are projected and clamped to `[0, route_length]`.
/// A feature whose clamped end point is 0, or whose clamped end points
/// coincide, is discarded. A feature
/// digitized against the route's measure direction is kept with its end
/// points swapped. The result is sorted by `from_pos`.
pub fn locate_segments<R: RouteProjector + ?Sized>(
    route: &R,
    features: &[SegmentFeature<R::Point>],
) -> Vec<Interval> {
    let route_length = route.route_length();

    let mut events: Vec<Interval> = features
        .iter()
        .filter_map(|feature| {
            let from = clamp_position(route.project(&feature.start), route_length);
            let to = clamp_position(route.project(&feature.end), route_length);

            // Ends at or before the route start, whatever the start measure
            if to == 0.0 {
                debug!(
                    "[Locate] Discarded zero-length event: {}, {}, {}",
                    feature.info.segment_id, from, to
                );
                return None;
            }

            let (from, to) = if from <= to { (from, to) } else { (to, from) };

            if from == to {
                debug!(
                    "[Locate] Discarded zero-length event: {}, {}, {}",
                    feature.info.segment_id, from, to
                );
                return None;
            }

            debug!(
                "[Locate] Located event: {}, {}, {}",
                feature.info.segment_id, from, to
            );
            Some(Interval::new(
                from,
                to,
                AttributeValue::segment(feature.info.clone()),
            ))
        })
        .collect();

    sort_by_position(&mut events, |iv| iv.from_pos);
    events
}
