//! Synthetic route data generator for benchmarking and property tests.
//!
//! Generates the four attribute interval sets of a route with known
//! structure: segments with gaps between them, a contiguous town
//! partition, and speed limit / lane count zones with a configurable share
//! of sentinel values.
//!
//! # Example
//!
//! ```rust
//! use routeconflate::synthetic::SyntheticRoute;
//!
//! let route = SyntheticRoute {
//!     segment_count: 20,
//!     seed: 7,
//!     ..SyntheticRoute::default()
//! };
//!
//! let inputs = route.generate();
//! assert!(inputs.segments.len() <= 20);
//! assert!(!inputs.towns.is_empty());
//! ```

use crate::pipeline::RouteInputs;
use crate::towns::TownTable;
use crate::{AttributeValue, Interval, NO_TOWN, SegmentInfo, TownId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SPEED_LIMITS: [u16; 8] = [25, 30, 35, 40, 45, 50, 55, 65];
const SPEED_SENTINELS: [u16; 2] = [0, 99];
const MAX_TOWN_ID: TownId = 351;

/// Configuration for one synthetic route.
#[derive(Debug, Clone)]
pub struct SyntheticRoute {
    pub route_id: String,
    /// Route length in measure units.
    pub route_length: f64,
    /// Number of candidate segment pieces before gaps are removed.
    pub segment_count: usize,
    /// Fraction of segment pieces dropped to leave uncovered stretches (0.0-1.0).
    pub segment_gap_fraction: f64,
    pub town_count: usize,
    pub speed_zone_count: usize,
    pub lane_zone_count: usize,
    /// Fraction of town, speed limit and lane count values replaced by a sentinel (0.0-1.0).
    pub sentinel_fraction: f64,
    pub seed: u64,
}

impl Default for SyntheticRoute {
    fn default() -> Self {
        Self {
            route_id: "SR9 EB".to_string(),
            route_length: 25.0,
            segment_count: 40,
            segment_gap_fraction: 0.1,
            town_count: 6,
            speed_zone_count: 30,
            lane_zone_count: 20,
            sentinel_fraction: 0.05,
            seed: 42,
        }
    }
}

impl SyntheticRoute {
    /// Generate the four interval sets of the route.
    pub fn generate(&self) -> RouteInputs {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let gap_p = self.segment_gap_fraction.clamp(0.0, 1.0);
        let sentinel_p = self.sentinel_fraction.clamp(0.0, 1.0);

        let segments = random_partition(&mut rng, self.route_length, self.segment_count)
            .into_iter()
            .enumerate()
            .filter(|_| !rng.gen_bool(gap_p))
            .map(|(i, (from, to))| {
                let info = SegmentInfo {
                    segment_id: format!("129+{:05}", i),
                    segment_type: "P1.11".to_string(),
                    route_id: self.route_id.clone(),
                    road_number: self.route_id.split(' ').next().unwrap_or("").to_string(),
                    direction: "EASTBOUND".to_string(),
                    road_name: format!("Main St {}", i / 4),
                };
                Interval::new(from, to, AttributeValue::segment(info))
            })
            .collect();

        let towns = random_partition(&mut rng, self.route_length, self.town_count)
            .into_iter()
            .map(|(from, to)| {
                let id = if rng.gen_bool(sentinel_p) {
                    NO_TOWN
                } else {
                    rng.gen_range(1..=MAX_TOWN_ID)
                };
                Interval::new(from, to, AttributeValue::Town(id))
            })
            .collect();

        let speed_limits = random_partition(&mut rng, self.route_length, self.speed_zone_count)
            .into_iter()
            .map(|(from, to)| {
                let table: &[u16] = if rng.gen_bool(sentinel_p) {
                    &SPEED_SENTINELS
                } else {
                    &SPEED_LIMITS
                };
                let value = *table.choose(&mut rng).unwrap_or(&0);
                Interval::new(from, to, AttributeValue::SpeedLimit(value))
            })
            .collect();

        let lane_counts = random_partition(&mut rng, self.route_length, self.lane_zone_count)
            .into_iter()
            .map(|(from, to)| {
                let value = if rng.gen_bool(sentinel_p) {
                    0
                } else {
                    rng.gen_range(1..=4)
                };
                Interval::new(from, to, AttributeValue::LaneCount(value))
            })
            .collect();

        RouteInputs {
            route_id: self.route_id.clone(),
            segments,
            towns,
            speed_limits,
            lane_counts,
        }
    }

    /// Town names for every id the generator can emit.
    pub fn town_table() -> TownTable {
        (1..=MAX_TOWN_ID).map(|id| (id, format!("TOWN {id}"))).collect()
    }
}

/// Split `[0, length)` into `pieces` contiguous intervals at random cut points.
fn random_partition(rng: &mut StdRng, length: f64, pieces: usize) -> Vec<(f64, f64)> {
    if pieces == 0 || length <= 0.0 {
        return Vec::new();
    }

    let mut cuts: Vec<f64> = (1..pieces).map(|_| rng.gen_range(0.0..length)).collect();
    cuts.push(0.0);
    cuts.push(length);
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    cuts.windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| (w[0], w[1]))
        .collect()
}
