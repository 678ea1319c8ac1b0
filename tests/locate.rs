//! Tests for locate and measure modules

use routeconflate::{RouteProjector, SegmentFeature, SegmentInfo, clamp_position, locate_segments};

/// Straight route along the x axis; a point's measure is its x coordinate.
struct StraightRoute {
    length: f64,
}

impl RouteProjector for StraightRoute {
    type Point = (f64, f64);

    fn project(&self, point: &Self::Point) -> f64 {
        point.0
    }

    fn route_length(&self) -> f64 {
        self.length
    }
}

fn feature(id: &str, start_x: f64, end_x: f64) -> SegmentFeature<(f64, f64)> {
    SegmentFeature {
        info: SegmentInfo::new(id),
        start: (start_x, 1.0),
        end: (end_x, -1.0),
    }
}

#[test]
fn test_clamp_position() {
    assert_eq!(clamp_position(-0.001, 10.0), 0.0);
    assert_eq!(clamp_position(0.0, 10.0), 0.0);
    assert_eq!(clamp_position(7.25, 10.0), 7.25);
    assert_eq!(clamp_position(10.0, 10.0), 10.0);
    assert_eq!(clamp_position(10.5, 10.0), 10.0);
}

#[test]
fn test_locate_clamps_and_sorts() {
    let route = StraightRoute { length: 10.0 };
    let features = vec![
        feature("T3", 6.0, 12.0),
        feature("T1", -2.0, 3.0),
        feature("T2", 3.0, 6.0),
    ];

    let located = locate_segments(&route, &features);

    let summary: Vec<(&str, f64, f64)> = located
        .iter()
        .map(|iv| (iv.attributes.segment_id(), iv.from_pos, iv.to_pos))
        .collect();
    assert_eq!(
        summary,
        vec![("T1", 0.0, 3.0), ("T2", 3.0, 6.0), ("T3", 6.0, 10.0)]
    );
}

#[test]
fn test_locate_discards_collapsed_events() {
    let route = StraightRoute { length: 10.0 };
    let features = vec![
        feature("BEYOND", 11.0, 14.0), // both ends clamp to 10
        feature("BEFORE", -5.0, -1.0), // both ends clamp to 0
        feature("POINT", 4.0, 4.0),
        feature("KEPT", 4.0, 5.0),
    ];

    let located = locate_segments(&route, &features);

    assert_eq!(located.len(), 1);
    assert_eq!(located[0].attributes.segment_id(), "KEPT");
}

#[test]
fn test_locate_swaps_reversed_features() {
    let route = StraightRoute { length: 10.0 };
    let features = vec![feature("T1", 8.0, 5.0)];

    let located = locate_segments(&route, &features);

    assert_eq!(located.len(), 1);
    assert_eq!((located[0].from_pos, located[0].to_pos), (5.0, 8.0));
}

#[test]
fn test_locate_carries_segment_info() {
    let route = StraightRoute { length: 10.0 };
    let info = SegmentInfo {
        segment_id: "129+04567".to_string(),
        road_name: "Boylston St".to_string(),
        direction: "EASTBOUND".to_string(),
        ..SegmentInfo::default()
    };
    let features = vec![SegmentFeature {
        info: info.clone(),
        start: (1.0, 0.0),
        end: (2.0, 0.0),
    }];

    let located = locate_segments(&route, &features);
    assert_eq!(located[0].attributes.segment.as_deref(), Some(&info));
}

#[test]
fn test_locate_discards_end_before_route_start() {
    let route = StraightRoute { length: 10.0 };
    let features = vec![
        feature("LEAVING", 5.0, -2.0),
        feature("AT_START", 3.0, 0.0),
        feature("ENTERING", -2.0, 5.0),
    ];

    let located = locate_segments(&route, &features);

    assert_eq!(located.len(), 1);
    assert_eq!(located[0].attributes.segment_id(), "ENTERING");
    assert_eq!((located[0].from_pos, located[0].to_pos), (0.0, 5.0));
}
