//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::process_staged`] which runs the entire pipeline in one
//! call, [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use wakeline_pipeline::{Pipeline, PipelineConfig, PipelineError, RecordTable};
//! # fn run(json: &str) -> Result<(), PipelineError> {
//! let table = RecordTable::from_json(json)?;
//! let pipeline = Pipeline::new(table, PipelineConfig::default())
//!     .clean()
//!     .extract()?
//!     .simplify()?;
//!
//! let staged = pipeline.into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state
//! (or `Result` for fallible stages), carrying all previously computed
//! intermediates.

use crate::table::RecordTable;
use crate::types::{PipelineConfig, PipelineError, Route, SimplifiedRoute, StagedResult, Track};

/// Entry point for the staged pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Start a pipeline over an imported table.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(table: RecordTable, config: PipelineConfig) -> Pending {
        Pending { config, table }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// Call [`clean`](Self::clean) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .clean() to continue"]
pub struct Pending {
    config: PipelineConfig,
    table: RecordTable,
}

impl Pending {
    /// The imported table.
    #[must_use]
    pub const fn table(&self) -> &RecordTable {
        &self.table
    }

    /// Drop columns that are missing in every row.
    ///
    /// When `config.drop_empty_columns` is `false` this is a pass-through.
    pub fn clean(self) -> Cleaned {
        let cleaned = if self.config.drop_empty_columns {
            self.table.drop_empty_columns()
        } else {
            self.table.clone()
        };
        tracing::debug!(
            before = self.table.columns().len(),
            after = cleaned.columns().len(),
            "cleaned columns"
        );
        Cleaned {
            config: self.config,
            source: self.table,
            cleaned,
        }
    }
}

// ───────────────────────── Stage 1: Cleaned ──────────────────────────

/// Pipeline state after column cleaning.
///
/// Call [`extract`](Self::extract) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .extract() to continue"]
pub struct Cleaned {
    config: PipelineConfig,
    source: RecordTable,
    cleaned: RecordTable,
}

impl Cleaned {
    /// The cleaned table.
    #[must_use]
    pub const fn cleaned(&self) -> &RecordTable {
        &self.cleaned
    }

    /// Names of the columns removed by cleaning, in source order.
    #[must_use]
    pub fn dropped_columns(&self) -> Vec<String> {
        self.source
            .columns()
            .iter()
            .filter(|c| self.cleaned.column_index(c).is_none())
            .cloned()
            .collect()
    }

    /// Extract the route from the configured coordinate columns.
    ///
    /// Rows missing a coordinate are kept as gaps in the [`Track`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StructuralInput`] if a coordinate column
    /// is absent, or [`PipelineError::NonNumericCoordinate`] if a
    /// coordinate is not a number.
    pub fn extract(self) -> Result<Extracted, PipelineError> {
        let track = self
            .cleaned
            .extract_track(&self.config.lat_column, &self.config.lon_column)?;
        tracing::debug!(
            points = track.route().len(),
            gaps = track.gap_rows().len(),
            "extracted route"
        );
        Ok(Extracted {
            config: self.config,
            source: self.source,
            cleaned: self.cleaned,
            track,
        })
    }
}

// ───────────────────────── Stage 2: Extracted ────────────────────────

/// Pipeline state after coordinate extraction.
///
/// Call [`simplify`](Self::simplify) to advance to the final stage.
#[must_use = "pipeline stages are consumed by advancing; call .simplify() to continue"]
pub struct Extracted {
    config: PipelineConfig,
    source: RecordTable,
    cleaned: RecordTable,
    track: Track,
}

impl Extracted {
    /// The extracted route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        self.track.route()
    }

    /// The extracted route with its row mapping and gaps.
    #[must_use]
    pub const fn track(&self) -> &Track {
        &self.track
    }

    /// Simplify each continuous segment of the route with
    /// `config.epsilon`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTolerance`] if the configured
    /// epsilon is negative.
    pub fn simplify(self) -> Result<Simplified, PipelineError> {
        let segments = self.track.segments();
        let simplified = crate::simplify::simplify_segments(
            self.track.route(),
            &segments,
            self.config.epsilon,
        )?;
        tracing::debug!(
            before = self.track.route().len(),
            after = simplified.len(),
            segments = segments.len(),
            epsilon = self.config.epsilon,
            "simplified route"
        );
        Ok(Simplified {
            source: self.source,
            cleaned: self.cleaned,
            track: self.track,
            segments,
            simplified,
        })
    }
}

// ───────────────────────── Stage 3: Simplified ───────────────────────

/// Pipeline state after simplification, the final stage.
///
/// Call [`into_result`](Self::into_result) to extract the
/// [`StagedResult`] containing all intermediates.
#[must_use = "call .into_result() to extract the StagedResult"]
pub struct Simplified {
    source: RecordTable,
    cleaned: RecordTable,
    track: Track,
    segments: Vec<std::ops::Range<usize>>,
    simplified: SimplifiedRoute,
}

impl Simplified {
    /// The route before simplification.
    #[must_use]
    pub const fn original(&self) -> &Route {
        self.track.route()
    }

    /// Table rows that had no usable coordinate.
    #[must_use]
    pub fn gap_rows(&self) -> &[usize] {
        self.track.gap_rows()
    }

    /// The route after simplification.
    #[must_use]
    pub const fn simplified(&self) -> &SimplifiedRoute {
        &self.simplified
    }

    /// Consume the pipeline and return the full [`StagedResult`].
    ///
    /// The cleaned rows of retained waypoints, plus every gap row, are
    /// selected here in table order so pass-through columns follow the
    /// simplified route and gaps remain visible.
    #[must_use]
    pub fn into_result(self) -> StagedResult {
        let point_rows = self.track.rows();
        let mut rows: Vec<usize> = self
            .simplified
            .source_indices()
            .iter()
            .filter_map(|&i| point_rows.get(i).copied())
            .chain(self.track.gap_rows().iter().copied())
            .collect();
        rows.sort_unstable();
        let simplified_rows = self.cleaned.select_rows(&rows);

        let gap_rows = self.track.gap_rows().to_vec();
        StagedResult {
            source: self.source,
            cleaned: self.cleaned,
            original: self.track.into_route(),
            segments: self.segments,
            gap_rows,
            simplified: self.simplified,
            simplified_rows,
        }
    }
}
