//! Tests for cleanup module

use routeconflate::cleanup::{CleanupStats, cleanup, cleanup_with_stats};
use routeconflate::{AtomicInterval, AttributeSet, AttributeValue, NO_TOWN, SegmentInfo};

fn atom(from: f64, to: f64, segment_id: Option<&str>, town_id: Option<u32>) -> AtomicInterval {
    let mut attributes = AttributeSet::from_value(AttributeValue::SpeedLimit(40));
    if let Some(id) = segment_id {
        attributes = attributes.with(AttributeValue::segment(SegmentInfo::new(id)));
    }
    if let Some(id) = town_id {
        attributes = attributes.with(AttributeValue::Town(id));
    }
    AtomicInterval::with_attributes(from, to, attributes)
}

#[test]
fn test_no_boundary_town_removed() {
    let atoms = vec![
        atom(0.0, 2.0, Some("T1"), Some(NO_TOWN)),
        atom(2.0, 4.0, Some("T1"), Some(35)),
    ];

    let (kept, stats) = cleanup_with_stats(atoms, false);

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].attributes.town_id, Some(35));
    assert_eq!(stats.no_town, 1);
}

#[test]
fn test_absent_town_removed() {
    let atoms = vec![
        atom(0.0, 2.0, Some("T1"), None),
        atom(2.0, 4.0, Some("T1"), Some(7)),
    ];

    let kept = cleanup(atoms, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].from_pos, 2.0);
}

#[test]
fn test_missing_segment_kept_without_filter() {
    let atoms = vec![atom(0.0, 3.0, None, Some(35))];

    let kept = cleanup(atoms, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].attributes.segment_id(), "");
}

#[test]
fn test_missing_segment_removed_with_filter() {
    let atoms = vec![
        atom(0.0, 3.0, None, Some(35)),
        atom(3.0, 5.0, Some(""), Some(35)),
        atom(5.0, 6.0, Some("T2"), Some(35)),
    ];

    let (kept, stats) = cleanup_with_stats(atoms, true);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].attributes.segment_id(), "T2");
    assert_eq!(stats.no_segment, 2);
}

#[test]
fn test_negative_start_clamped() {
    let atoms = vec![atom(-0.5, 1.5, Some("T1"), Some(35))];

    let (kept, stats) = cleanup_with_stats(atoms, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].from_pos, 0.0);
    assert_eq!(kept[0].to_pos, 1.5);
    assert_eq!(stats.clamped, 1);
}

#[test]
fn test_degenerate_intervals_removed() {
    let atoms = vec![
        atom(-2.0, 0.0, Some("T1"), Some(35)), // clamps to [0, 0)
        atom(-3.0, -1.0, Some("T1"), Some(35)), // clamps to [0, -1)
        atom(1.0, 1.0, Some("T1"), Some(35)),
        atom(1.0, 2.0, Some("T1"), Some(35)),
    ];

    let (kept, stats) = cleanup_with_stats(atoms, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(stats.clamped, 2);
    assert_eq!(stats.degenerate, 3);
}

#[test]
fn test_sorted_by_position_then_segment() {
    let atoms = vec![
        atom(4.0, 6.0, Some("T1"), Some(35)),
        atom(0.0, 2.0, Some("T9"), Some(35)),
        atom(0.0, 2.0, Some("T3"), Some(35)),
        atom(2.0, 4.0, Some("T1"), Some(35)),
    ];

    let kept = cleanup(atoms, false);
    let order: Vec<(f64, &str)> = kept
        .iter()
        .map(|a| (a.from_pos, a.attributes.segment_id()))
        .collect();
    assert_eq!(
        order,
        vec![(0.0, "T3"), (0.0, "T9"), (2.0, "T1"), (4.0, "T1")]
    );
}

#[test]
fn test_clean_input_untouched() {
    let atoms = vec![
        atom(0.0, 2.0, Some("T1"), Some(35)),
        atom(2.0, 4.0, Some("T2"), Some(7)),
    ];

    let (kept, stats) = cleanup_with_stats(atoms.clone(), true);
    assert_eq!(kept, atoms);
    assert_eq!(stats, CleanupStats::default());
}
