//! # Route Conflate
//!
//! Linear-referencing conflation of road attribute datasets onto route segments.
//!
//! This library provides:
//! - Projection clamping of raw route measures
//! - Location of road segment features along a route axis
//! - Plane-sweep overlay of linearly-referenced interval sets
//! - Cleanup of overlay artifacts
//! - Length-weighted rollup into one summary record per segment identifier
//! - A per-route pipeline driver, with parallel processing across routes
//!
//! ## Features
//!
//! - **`parallel`** - Run independent routes in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use routeconflate::{AttributeValue, Interval, SegmentInfo};
//! use routeconflate::overlay::{overlay, OverlayMode};
//!
//! let segment = SegmentInfo::new("T1");
//! let segments = vec![Interval::new(0.0, 10.0, AttributeValue::segment(segment))];
//! let towns = vec![Interval::new(5.0, 15.0, AttributeValue::Town(35))];
//!
//! let atoms = overlay(&segments, &towns, OverlayMode::NoZero);
//! assert_eq!(atoms.len(), 3);
//! assert_eq!(atoms[1].attributes.town_id, Some(35));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

// Unified error handling
pub mod error;
pub use error::{ConflateError, OptionExt, Result};

// Position clamping along a route axis
pub mod measure;
pub use measure::clamp_position;

// Segment event location (projection collaborator seam)
pub mod locate;
pub use locate::{RouteProjector, SegmentFeature, locate_segments};

// Interval overlay engine
pub mod overlay;
pub use overlay::{OverlayMode, overlay};

// Removal of overlay artifacts
pub mod cleanup;
pub use cleanup::cleanup;

// Length-weighted rollup per segment identifier
pub mod rollup;
pub use rollup::{Rollup, rollup};

// Town name lookup
pub mod towns;
pub use towns::{TownNames, TownTable};

// Route identifiers and direction pairing
pub mod route;
pub use route::{RouteDirection, RouteKey};

// Per-route pipeline driver
pub mod pipeline;
pub use pipeline::{
    RouteInputs, RouteSummary, atomize, conflate_route, conflate_routes, validate_intervals,
};

// Progress reporting for multi-route runs
pub mod progress;
pub use progress::{AtomicProgressTracker, ConflateProgress, NoopProgress};

// Synthetic route data for benchmarks and property tests
pub mod synthetic;

// ============================================================================
// Sentinels
// ============================================================================

/// Town identifier meaning "no boundary" (an overlay gap between boundary datasets).
pub const NO_TOWN: TownId = 0;

/// Speed limit meaning "no posted limit event exists here".
pub const SPEED_LIMIT_NONE: u16 = 0;

/// Speed limit placeholder used by the source data for "no value".
pub const SPEED_LIMIT_PLACEHOLDER: u16 = 99;

/// Lane count meaning "no lane count event exists here".
pub const LANE_COUNT_NONE: u16 = 0;

/// Summary value reported when a segment has no usable attribute data.
pub const UNKNOWN: i32 = -1;

// ============================================================================
// Core Types
// ============================================================================

/// Administrative area (town) identifier.
pub type TownId = u32;

/// The attribute domains carried along a route axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Physical road segment identity (e.g. a TMC code and its descriptive fields)
    Segment,
    /// Administrative boundary
    Town,
    SpeedLimit,
    LaneCount,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Segment => "segment",
            Domain::Town => "town",
            Domain::SpeedLimit => "speed_limit",
            Domain::LaneCount => "lane_count",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attributes of one physical road segment.
///
/// These fields are carried forward verbatim into the summary record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentInfo {
    /// Primary segment identifier used for grouping
    pub segment_id: String,
    pub segment_type: String,
    pub route_id: String,
    pub road_number: String,
    pub direction: String,
    pub road_name: String,
}

impl SegmentInfo {
    /// Create segment info with only an identifier set.
    pub fn new(segment_id: &str) -> Self {
        Self {
            segment_id: segment_id.to_string(),
            ..Default::default()
        }
    }
}

/// A single attribute value, tagged by its domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Segment(Arc<SegmentInfo>),
    Town(TownId),
    SpeedLimit(u16),
    LaneCount(u16),
}

impl AttributeValue {
    /// Wrap segment info in a shareable attribute value.
    pub fn segment(info: SegmentInfo) -> Self {
        AttributeValue::Segment(Arc::new(info))
    }

    pub fn domain(&self) -> Domain {
        match self {
            AttributeValue::Segment(_) => Domain::Segment,
            AttributeValue::Town(_) => Domain::Town,
            AttributeValue::SpeedLimit(_) => Domain::SpeedLimit,
            AttributeValue::LaneCount(_) => Domain::LaneCount,
        }
    }
}

/// The full combination of attribute domains active over an interval.
///
/// `None` marks a domain as absent (no covering source interval).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSet {
    pub segment: Option<Arc<SegmentInfo>>,
    pub town_id: Option<TownId>,
    pub speed_limit: Option<u16>,
    pub lane_count: Option<u16>,
}

impl AttributeSet {
    /// Attribute set with a single domain present.
    pub fn from_value(value: AttributeValue) -> Self {
        Self::default().with(value)
    }

    /// Set one domain, replacing any previous value for it.
    pub fn with(mut self, value: AttributeValue) -> Self {
        match value {
            AttributeValue::Segment(info) => self.segment = Some(info),
            AttributeValue::Town(id) => self.town_id = Some(id),
            AttributeValue::SpeedLimit(v) => self.speed_limit = Some(v),
            AttributeValue::LaneCount(v) => self.lane_count = Some(v),
        }
        self
    }

    /// Disjoint union of two attribute sets.
    ///
    /// Sharing a domain is a caller bug and is debug-asserted. Release
    /// builds keep the left-hand value.
    pub fn merge(&self, other: &AttributeSet) -> AttributeSet {
        debug_assert!(
            self.domains().iter().all(|d| !other.has(*d)),
            "merging attribute sets with a shared domain"
        );
        AttributeSet {
            segment: self.segment.clone().or_else(|| other.segment.clone()),
            town_id: self.town_id.or(other.town_id),
            speed_limit: self.speed_limit.or(other.speed_limit),
            lane_count: self.lane_count.or(other.lane_count),
        }
    }

    /// Whether the given domain is present.
    pub fn has(&self, domain: Domain) -> bool {
        match domain {
            Domain::Segment => self.segment.is_some(),
            Domain::Town => self.town_id.is_some(),
            Domain::SpeedLimit => self.speed_limit.is_some(),
            Domain::LaneCount => self.lane_count.is_some(),
        }
    }

    /// Domains present in this set.
    pub fn domains(&self) -> Vec<Domain> {
        [Domain::Segment, Domain::Town, Domain::SpeedLimit, Domain::LaneCount]
            .into_iter()
            .filter(|d| self.has(*d))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.domains().is_empty()
    }

    /// Primary segment identifier, empty when the segment domain is absent.
    pub fn segment_id(&self) -> &str {
        self.segment
            .as_deref()
            .map(|s| s.segment_id.as_str())
            .unwrap_or("")
    }
}

/// A sub-range `[from_pos, to_pos)` of a route axis with its attributes.
///
/// Valid intervals satisfy `from_pos < to_pos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub from_pos: f64,
    pub to_pos: f64,
    #[serde(default)]
    pub attributes: AttributeSet,
}

/// An interval produced by the overlay engine: attributes are constant
/// across it and every domain is either present or explicitly absent.
pub type AtomicInterval = Interval;

impl Interval {
    /// Create an interval carrying a single attribute domain.
    pub fn new(from_pos: f64, to_pos: f64, value: AttributeValue) -> Self {
        Self {
            from_pos,
            to_pos,
            attributes: AttributeSet::from_value(value),
        }
    }

    /// Create an interval with a complete attribute set.
    pub fn with_attributes(from_pos: f64, to_pos: f64, attributes: AttributeSet) -> Self {
        Self {
            from_pos,
            to_pos,
            attributes,
        }
    }

    /// Length of the interval along the route axis.
    pub fn length(&self) -> f64 {
        self.to_pos - self.from_pos
    }

    /// Whether `pos` lies inside `[from_pos, to_pos)`.
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.from_pos && pos < self.to_pos
    }
}

/// One summary record per segment identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub segment_id: String,
    pub segment_type: String,
    pub route_id: String,
    pub road_number: String,
    pub direction: String,
    pub road_name: String,
    /// Smallest start position across the segment's intervals
    pub from_pos: f64,
    /// End position of the last interval (by start position)
    pub to_pos: f64,
    /// Sum of member interval lengths; gaps between members are not counted
    pub total_length: f64,
    /// Length-weighted speed limit rounded to a multiple of 5, or [`UNKNOWN`]
    pub speed_limit: i32,
    /// Length-weighted lane count rounded up, or [`UNKNOWN`]
    pub lane_count: i32,
    /// Distinct town identifiers, ascending
    pub town_ids: Vec<TownId>,
    /// Town names joined with the configured delimiter
    pub towns: String,
}

// ============================================================================
// Configuration
// ============================================================================

/// Overlay modes for the three chained overlay stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayModes {
    /// Segments overlaid with towns
    pub towns: OverlayMode,
    /// Previous result overlaid with speed limits
    pub speed_limits: OverlayMode,
    /// Previous result overlaid with lane counts
    pub lane_counts: OverlayMode,
}

impl Default for OverlayModes {
    fn default() -> Self {
        Self {
            towns: OverlayMode::NoZero,
            speed_limits: OverlayMode::NoZero,
            lane_counts: OverlayMode::Zero,
        }
    }
}

/// Configuration for a conflation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflateConfig {
    /// Delimiter between town names in a summary record.
    /// Must differ from the delimiter used when records are serialized as text.
    /// Default: "+ "
    pub town_delimiter: String,

    /// Allowed segment identifiers. When set, segment intervals outside the
    /// list are ignored and atomic intervals without a segment are removed.
    /// Default: None (all segments, keep uncovered stretches)
    pub segment_filter: Option<BTreeSet<String>>,

    /// Overlay mode per stage.
    /// Default: NO_ZERO, NO_ZERO, ZERO
    pub overlay_modes: OverlayModes,
}

impl Default for ConflateConfig {
    fn default() -> Self {
        Self {
            town_delimiter: "+ ".to_string(),
            segment_filter: None,
            overlay_modes: OverlayModes::default(),
        }
    }
}

impl ConflateConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConflateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConflateError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Restrict the run to the given segment identifiers.
    pub fn with_segment_filter<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segment_filter = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict the run to the segment identifiers listed in a file.
    /// See [`parse_segment_list`] for the format.
    pub fn with_segment_list_file(self, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConflateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.with_segment_filter(parse_segment_list(&contents)))
    }
}

/// Parse an allowed segment list: identifiers separated by commas or
/// newlines, optionally wrapped in single or double quotes.
///
/// # Example
/// ```
/// let ids = routeconflate::parse_segment_list("'129+04567',\n'129-04568'\n");
/// assert_eq!(ids.len(), 2);
/// assert!(ids.contains("129+04567"));
/// ```
pub fn parse_segment_list(text: &str) -> BTreeSet<String> {
    text.split([',', '\n'])
        .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
