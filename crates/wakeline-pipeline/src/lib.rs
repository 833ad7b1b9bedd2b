//! wakeline-pipeline: Pure ship-track simplification pipeline (sans-IO).
//!
//! Reduces a recorded track to the waypoints that carry its shape:
//! import -> clean -> extract coordinates -> simplify (Ramer-Douglas-Peucker).
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! tables and strings and returns structured data. Reading files, writing
//! exports and rendering live in `wakeline-export` and the `wakeline` CLI.

pub mod diagnostics;
pub mod distance;
pub mod pipeline;
pub mod simplify;
pub mod table;
pub mod types;

pub use pipeline::Pipeline;
pub use table::{Cell, RecordTable, Row};
pub use types::{
    PipelineConfig, PipelineError, Point, ProcessResult, Route, SimplifiedRoute, StagedResult,
    Tolerance, Track,
};

/// Run the full pipeline on an imported table.
///
/// Produces a [`ProcessResult`] holding both the original and the
/// simplified route, for side-by-side display.
///
/// # Pipeline steps
///
/// 1. Validate the tolerance
/// 2. Drop fully-empty columns (unless disabled)
/// 3. Extract the route from the coordinate columns, keeping gap rows
/// 4. Simplify each continuous segment (Ramer-Douglas-Peucker)
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTolerance`] if `config.epsilon` is
/// negative, before any other work. Returns
/// [`PipelineError::StructuralInput`] if a coordinate column is absent, or
/// [`PipelineError::NonNumericCoordinate`] if a coordinate is not a number.
/// Rows missing a coordinate are not errors: they become gaps that split
/// the route (see [`Track`]).
pub fn process(table: RecordTable, config: &PipelineConfig) -> Result<ProcessResult, PipelineError> {
    process_staged(table, config).map(StagedResult::into_process_result)
}

/// Run the full pipeline, preserving every intermediate.
///
/// # Errors
///
/// Same as [`process`].
pub fn process_staged(
    table: RecordTable,
    config: &PipelineConfig,
) -> Result<StagedResult, PipelineError> {
    Tolerance::new(config.epsilon)?;
    Ok(Pipeline::new(table, config.clone())
        .clean()
        .extract()?
        .simplify()?
        .into_result())
}

/// Parse JSON records and run the full pipeline.
///
/// # Examples
///
/// ```
/// use wakeline_pipeline::{PipelineConfig, Point, process_json};
///
/// let json = r#"[
///     {"lat": 0.0, "lon": 0.0},
///     {"lat": 0.0, "lon": 1.0},
///     {"lat": 1.0, "lon": 1.0},
///     {"lat": 0.0, "lon": 2.0}
/// ]"#;
/// let config = PipelineConfig { epsilon: 2.0, ..PipelineConfig::default() };
/// let result = process_json(json, &config)?;
/// assert_eq!(result.original.len(), 4);
/// assert_eq!(
///     result.simplified.route().points(),
///     &[Point::new(0.0, 0.0), Point::new(0.0, 2.0)],
/// );
/// # Ok::<(), wakeline_pipeline::PipelineError>(())
/// ```
///
/// # Errors
///
/// Returns [`PipelineError::Parse`] for malformed JSON, otherwise the same
/// as [`process`].
pub fn process_json(json: &str, config: &PipelineConfig) -> Result<ProcessResult, PipelineError> {
    Tolerance::new(config.epsilon)?;
    process(RecordTable::from_json(json)?, config)
}
