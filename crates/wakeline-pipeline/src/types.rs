//! Shared types for the wakeline track simplification pipeline.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::table::RecordTable;

/// A recorded position sample (waypoint).
///
/// Coordinates are treated as planar: `lat` is the first axis and `lon`
/// the second. No geodesic correction is applied anywhere in the
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared planar distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat.mul_add(dlat, dlon * dlon)
    }

    /// Planar distance to another point, in degrees.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An ordered ship track.
///
/// Order encodes the travel path and is never changed; transformations
/// only ever filter points out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<Point>);

impl Route {
    /// Create a new route from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the route has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the route and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl FromIterator<Point> for Route {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The output of the simplifier: a subsequence of a source [`Route`].
///
/// Alongside the retained points it records the index each point had in
/// the source route, so per-row attributes can be carried over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedRoute {
    route: Route,
    source_indices: Vec<usize>,
}

impl SimplifiedRoute {
    /// Build a simplified route by selecting `indices` from `source`.
    ///
    /// `indices` must be strictly ascending and in bounds; the simplifier
    /// is the only producer.
    pub(crate) fn from_indices(source: &Route, indices: Vec<usize>) -> Self {
        let points = source.points();
        let route = indices.iter().map(|&i| points[i]).collect();
        Self {
            route,
            source_indices: indices,
        }
    }

    /// The retained points.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Index in the source route of each retained point, ascending.
    #[must_use]
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// Number of retained points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.route.len()
    }

    /// Returns `true` if nothing was retained (only for empty input).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// Consumes the result and returns the retained points as a [`Route`].
    #[must_use]
    pub fn into_route(self) -> Route {
        self.route
    }
}

/// A route extracted from a table, with the row each point came from.
///
/// Rows that lack a latitude or longitude are gaps: they contribute no
/// point but are remembered in [`gap_rows`](Self::gap_rows). A gap splits
/// the route into [`segments`](Self::segments) that are simplified
/// independently, so no line is ever drawn across missing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    route: Route,
    rows: Vec<usize>,
    gap_rows: Vec<usize>,
}

impl Track {
    /// `rows` must hold one ascending table row per point of `route`.
    pub(crate) const fn new(route: Route, rows: Vec<usize>, gap_rows: Vec<usize>) -> Self {
        Self {
            route,
            rows,
            gap_rows,
        }
    }

    /// Every point with both coordinates, in row order.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Table row of each point.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Table rows with a missing coordinate, ascending.
    #[must_use]
    pub fn gap_rows(&self) -> &[usize] {
        &self.gap_rows
    }

    /// Point-index ranges of the runs of consecutive rows between gaps.
    ///
    /// Gaps before the first or after the last point split nothing. An
    /// empty track has no segments.
    #[must_use]
    pub fn segments(&self) -> Vec<Range<usize>> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (i, pair) in self.rows.windows(2).enumerate() {
            if pair[1] != pair[0] + 1 {
                segments.push(start..i + 1);
                start = i + 1;
            }
        }
        if !self.rows.is_empty() {
            segments.push(start..self.rows.len());
        }
        segments
    }

    /// Consumes the track and returns its points.
    #[must_use]
    pub fn into_route(self) -> Route {
        self.route
    }
}

/// Maximum perpendicular deviation allowed for a discarded waypoint.
///
/// Expressed in the same planar degrees as [`Point`]. Always
/// non-negative and never NaN.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Zero tolerance: only exactly-collinear points are removed.
    pub const ZERO: Self = Self(0.0);

    /// Validate and wrap an epsilon value.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTolerance`] if `epsilon` is
    /// negative or NaN.
    pub fn new(epsilon: f64) -> Result<Self, PipelineError> {
        if epsilon >= 0.0 {
            Ok(Self(epsilon))
        } else {
            Err(PipelineError::InvalidTolerance(epsilon))
        }
    }

    /// The raw epsilon value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Configuration for the track simplification pipeline.
///
/// Tolerance is validated when the pipeline reaches the simplification
/// stage, so a config deserialized from user input may still carry a
/// negative `epsilon` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ramer-Douglas-Peucker tolerance in planar degrees.
    /// Higher values remove more waypoints.
    pub epsilon: f64,

    /// Whether to drop columns whose every value is missing before
    /// coordinate extraction.
    pub drop_empty_columns: bool,

    /// Name of the latitude column.
    pub lat_column: String,

    /// Name of the longitude column.
    pub lon_column: String,
}

impl PipelineConfig {
    /// Default simplification tolerance, in degrees.
    pub const DEFAULT_EPSILON: f64 = 0.06;

    /// Default for [`drop_empty_columns`](Self::drop_empty_columns).
    pub const DEFAULT_DROP_EMPTY_COLUMNS: bool = true;

    /// Default latitude column name.
    pub const DEFAULT_LAT_COLUMN: &str = "lat";

    /// Default longitude column name.
    pub const DEFAULT_LON_COLUMN: &str = "lon";
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
            drop_empty_columns: Self::DEFAULT_DROP_EMPTY_COLUMNS,
            lat_column: Self::DEFAULT_LAT_COLUMN.to_owned(),
            lon_column: Self::DEFAULT_LON_COLUMN.to_owned(),
        }
    }
}

/// Result of running the full pipeline.
///
/// Carries both the original and the simplified route, since overlaying
/// the two is the main thing callers do with the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Every waypoint extracted from the input, in order.
    pub original: Route,

    /// The waypoints retained by simplification.
    pub simplified: SimplifiedRoute,

    /// Index ranges of `original` that are continuous (not broken by a
    /// gap row). A track without gaps has a single segment.
    pub segments: Vec<Range<usize>>,

    /// Table rows that had no usable coordinate.
    pub gap_rows: Vec<usize>,
}

impl ProcessResult {
    /// The original route split at gaps.
    #[must_use]
    pub fn original_segments(&self) -> Vec<&[Point]> {
        let points = self.original.points();
        self.segments
            .iter()
            .filter_map(|range| points.get(range.clone()))
            .collect()
    }

    /// The simplified route split at the same gaps as the original.
    #[must_use]
    pub fn simplified_segments(&self) -> Vec<&[Point]> {
        let indices = self.simplified.source_indices();
        let points = self.simplified.route().points();
        self.segments
            .iter()
            .filter_map(|range| {
                let start = indices.partition_point(|&i| i < range.start);
                let end = indices.partition_point(|&i| i < range.end);
                points.get(start..end)
            })
            .collect()
    }
}

/// Result of running the pipeline with all intermediate stage outputs
/// preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedResult {
    /// Stage 0: the table as imported.
    pub source: RecordTable,
    /// Stage 1: the table after dropping fully-empty columns (identical to
    /// `source` when cleaning is disabled).
    pub cleaned: RecordTable,
    /// Stage 2: the extracted route.
    pub original: Route,
    /// Stage 2: continuous index ranges of `original`.
    pub segments: Vec<Range<usize>>,
    /// Stage 2: table rows without a usable coordinate.
    pub gap_rows: Vec<usize>,
    /// Stage 3: the simplified route.
    pub simplified: SimplifiedRoute,
    /// Cleaned rows of the retained waypoints and of every gap row, in
    /// table order, so pass-through columns travel with the simplified
    /// route and gaps stay visible.
    pub simplified_rows: RecordTable,
}

impl StagedResult {
    /// Drop the tables and keep only the two routes.
    #[must_use]
    pub fn into_process_result(self) -> ProcessResult {
        ProcessResult {
            original: self.original,
            simplified: self.simplified,
            segments: self.segments,
            gap_rows: self.gap_rows,
        }
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required coordinate column is absent from the whole table.
    #[error("required column `{column}` is missing from the input")]
    StructuralInput {
        /// Name of the missing column.
        column: String,
    },

    /// The simplification tolerance is negative (or NaN).
    #[error("tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),

    /// A coordinate cell holds something other than a number.
    #[error("row {row} has a non-numeric value for `{column}`")]
    NonNumericCoordinate {
        /// Zero-based row index.
        row: usize,
        /// Name of the coordinate column.
        column: String,
    },

    /// The tabular input could not be parsed.
    #[error("failed to parse route records: {0}")]
    Parse(#[from] serde_json::Error),
}
