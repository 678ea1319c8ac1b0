//! Tests for overlay module

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use routeconflate::overlay::{OverlayMode, overlay};
use routeconflate::synthetic::SyntheticRoute;
use routeconflate::{AttributeValue, Interval, SegmentInfo};

fn segment(from: f64, to: f64, id: &str) -> Interval {
    Interval::new(from, to, AttributeValue::segment(SegmentInfo::new(id)))
}

fn town(from: f64, to: f64, id: u32) -> Interval {
    Interval::new(from, to, AttributeValue::Town(id))
}

fn speed(from: f64, to: f64, limit: u16) -> Interval {
    Interval::new(from, to, AttributeValue::SpeedLimit(limit))
}

/// Random ordered, non-overlapping intervals with gaps between some of them
fn random_intervals(rng: &mut StdRng, length: f64, count: usize) -> Vec<Interval> {
    let mut cuts: Vec<f64> = (0..count * 2).map(|_| rng.gen_range(0.0..length)).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();
    cuts.chunks_exact(2)
        .filter(|c| c[0] < c[1])
        .map(|c| speed(c[0], c[1], rng.gen_range(1..=13) * 5))
        .collect()
}

fn covering(set: &[Interval], pos: f64) -> Option<&Interval> {
    set.iter().find(|iv| iv.contains(pos))
}

#[test]
fn test_partially_overlapping_pair() {
    let segments = vec![segment(0.0, 10.0, "T1")];
    let towns = vec![town(5.0, 15.0, 35)];

    let atoms = overlay(&segments, &towns, OverlayMode::NoZero);

    // [0,5) segment only, [5,10) both, [10,15) town only
    assert_eq!(atoms.len(), 3);
    assert_eq!((atoms[0].from_pos, atoms[0].to_pos), (0.0, 5.0));
    assert_eq!(atoms[0].attributes.segment_id(), "T1");
    assert_eq!(atoms[0].attributes.town_id, None);

    assert_eq!((atoms[1].from_pos, atoms[1].to_pos), (5.0, 10.0));
    assert_eq!(atoms[1].attributes.segment_id(), "T1");
    assert_eq!(atoms[1].attributes.town_id, Some(35));

    assert_eq!((atoms[2].from_pos, atoms[2].to_pos), (10.0, 15.0));
    assert!(atoms[2].attributes.segment.is_none());
    assert_eq!(atoms[2].attributes.town_id, Some(35));
}

#[test]
fn test_gap_kept_only_in_zero_mode() {
    let segments = vec![segment(0.0, 4.0, "T1"), segment(6.0, 9.0, "T2")];
    let towns = vec![town(0.0, 2.0, 35)];

    let no_zero = overlay(&segments, &towns, OverlayMode::NoZero);
    assert_eq!(no_zero.len(), 3);
    assert!(no_zero.iter().all(|a| !a.attributes.is_empty()));

    let zero = overlay(&segments, &towns, OverlayMode::Zero);
    assert_eq!(zero.len(), 4);
    let gap = &zero[2];
    assert_eq!((gap.from_pos, gap.to_pos), (4.0, 6.0));
    assert!(gap.attributes.is_empty());
}

#[test]
fn test_adjacent_intervals_do_not_merge() {
    let limits = vec![speed(0.0, 3.0, 40), speed(3.0, 7.0, 40)];
    let atoms = overlay(&limits, &[], OverlayMode::NoZero);

    assert_eq!(atoms.len(), 2);
    assert_eq!(atoms[0].to_pos, 3.0);
    assert_eq!(atoms[1].from_pos, 3.0);
}

#[test]
fn test_empty_inputs() {
    assert!(overlay(&[], &[], OverlayMode::Zero).is_empty());
    assert!(overlay(&[], &[], OverlayMode::NoZero).is_empty());

    let towns = vec![town(1.0, 2.0, 7)];
    let atoms = overlay(&[], &towns, OverlayMode::Zero);
    assert_eq!(atoms, towns);
}

#[test]
fn test_shared_boundaries_produce_no_zero_length_atoms() {
    let segments = vec![segment(0.0, 5.0, "T1"), segment(5.0, 10.0, "T2")];
    let towns = vec![town(0.0, 5.0, 35), town(5.0, 10.0, 7)];

    let atoms = overlay(&segments, &towns, OverlayMode::Zero);
    assert_eq!(atoms.len(), 2);
    assert!(atoms.iter().all(|a| a.from_pos < a.to_pos));
    assert_eq!(atoms[1].attributes.segment_id(), "T2");
    assert_eq!(atoms[1].attributes.town_id, Some(7));
}

#[test]
fn test_zero_mode_partitions_the_covered_extent() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let set_a = random_intervals(&mut rng, 100.0, 12);
        let set_b: Vec<Interval> = random_intervals(&mut rng, 100.0, 8)
            .into_iter()
            .map(|iv| town(iv.from_pos, iv.to_pos, rng.gen_range(1..=351)))
            .collect();

        let atoms = overlay(&set_a, &set_b, OverlayMode::Zero);
        if atoms.is_empty() {
            continue;
        }

        // Contiguous and ordered
        for pair in atoms.windows(2) {
            assert_eq!(pair[0].to_pos, pair[1].from_pos);
        }

        // Every source boundary is an atom boundary
        let mut atom_bounds: Vec<f64> = atoms.iter().map(|a| a.from_pos).collect();
        atom_bounds.push(atoms[atoms.len() - 1].to_pos);
        for iv in set_a.iter().chain(&set_b) {
            assert!(atom_bounds.contains(&iv.from_pos));
            assert!(atom_bounds.contains(&iv.to_pos));
        }

        // Coverage: each atom carries exactly the attributes of its covering sources
        for atom in &atoms {
            let mid = (atom.from_pos + atom.to_pos) / 2.0;
            let expected_speed = covering(&set_a, mid).and_then(|iv| iv.attributes.speed_limit);
            let expected_town = covering(&set_b, mid).and_then(|iv| iv.attributes.town_id);
            assert_eq!(atom.attributes.speed_limit, expected_speed);
            assert_eq!(atom.attributes.town_id, expected_town);
        }
    }
}

#[test]
fn test_no_zero_mode_only_drops_uncovered_atoms() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..50 {
        let set_a = random_intervals(&mut rng, 50.0, 10);
        let set_b: Vec<Interval> = random_intervals(&mut rng, 50.0, 10)
            .into_iter()
            .map(|iv| town(iv.from_pos, iv.to_pos, 35))
            .collect();

        let zero = overlay(&set_a, &set_b, OverlayMode::Zero);
        let no_zero = overlay(&set_a, &set_b, OverlayMode::NoZero);

        let expected: Vec<&Interval> = zero.iter().filter(|a| !a.attributes.is_empty()).collect();
        assert_eq!(no_zero.len(), expected.len());
        for (kept, want) in no_zero.iter().zip(expected) {
            assert_eq!(kept, want);
        }
    }
}

#[test]
fn test_chained_overlay_on_synthetic_route() {
    let inputs = SyntheticRoute::default().generate();

    let with_towns = overlay(&inputs.segments, &inputs.towns, OverlayMode::NoZero);
    let with_limits = overlay(&with_towns, &inputs.speed_limits, OverlayMode::NoZero);
    let with_lanes = overlay(&with_limits, &inputs.lane_counts, OverlayMode::Zero);

    // The synthetic town, speed and lane sets each span the whole route
    let total: f64 = with_lanes.iter().map(|a| a.length()).sum();
    assert!((total - 25.0).abs() < 1e-9);
    assert!(with_lanes.iter().all(|a| {
        a.attributes.town_id.is_some()
            && a.attributes.speed_limit.is_some()
            && a.attributes.lane_count.is_some()
    }));
}

#[test]
fn test_overlay_mode_names() {
    assert_eq!(OverlayMode::Zero.to_string(), "ZERO");
    assert_eq!(OverlayMode::NoZero.as_str(), "NO_ZERO");
    assert_eq!(serde_json::to_string(&OverlayMode::NoZero).unwrap(), "\"NO_ZERO\"");
    let mode: OverlayMode = serde_json::from_str("\"ZERO\"").unwrap();
    assert_eq!(mode, OverlayMode::Zero);
}
