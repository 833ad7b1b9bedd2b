//! Pipeline diagnostics: timing and counts for each stage.
//!
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::pipeline::Pipeline;
use crate::table::RecordTable;
use crate::types::{PipelineConfig, PipelineError, StagedResult, Tolerance};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: column cleaning (`None` when `drop_empty_columns` is off).
    pub clean: Option<StageDiagnostics>,
    /// Stage 2: coordinate extraction.
    pub extract: StageDiagnostics,
    /// Stage 3: RDP simplification.
    pub simplification: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Column cleaning metrics.
    Clean {
        /// Columns in the imported table.
        columns_before: usize,
        /// Columns that survived cleaning.
        columns_after: usize,
        /// Names of the dropped columns.
        dropped: Vec<String>,
    },
    /// Coordinate extraction metrics.
    Extract {
        /// Rows in the cleaned table.
        row_count: usize,
        /// Points in the extracted route.
        point_count: usize,
        /// Rows missing a coordinate.
        gap_count: usize,
        /// Continuous segments between gaps.
        segment_count: usize,
    },
    /// Simplification metrics.
    Simplification {
        /// RDP tolerance in degrees.
        epsilon: f64,
        /// Points before simplification.
        points_before: usize,
        /// Points after simplification.
        points_after: usize,
        /// Reduction ratio: `1.0 - (after / before)`.
        reduction_ratio: f64,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Rows in the imported table.
    pub row_count: usize,
    /// Waypoints in the original route.
    pub original_point_count: usize,
    /// Waypoints in the simplified route.
    pub simplified_point_count: usize,
}

/// Run the full pipeline and collect per-stage diagnostics.
///
/// # Errors
///
/// Same as [`crate::process_staged`].
pub fn process_staged_with_diagnostics(
    table: RecordTable,
    config: &PipelineConfig,
) -> Result<(StagedResult, PipelineDiagnostics), PipelineError> {
    Tolerance::new(config.epsilon)?;
    let drop_empty_columns = config.drop_empty_columns;
    let start = Instant::now();

    let pending = Pipeline::new(table, config.clone());
    let row_count = pending.table().row_count();
    let columns_before = pending.table().columns().len();

    let t = Instant::now();
    let cleaned = pending.clean();
    let clean = drop_empty_columns.then(|| StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Clean {
            columns_before,
            columns_after: cleaned.cleaned().columns().len(),
            dropped: cleaned.dropped_columns(),
        },
    });

    let t = Instant::now();
    let extracted = cleaned.extract()?;
    let extract = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Extract {
            row_count,
            point_count: extracted.route().len(),
            gap_count: extracted.track().gap_rows().len(),
            segment_count: extracted.track().segments().len(),
        },
    };

    let t = Instant::now();
    let simplified = extracted.simplify()?;
    let points_before = simplified.original().len();
    let points_after = simplified.simplified().len();
    let simplification = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Simplification {
            epsilon: config.epsilon,
            points_before,
            points_after,
            reduction_ratio: reduction_ratio(points_before, points_after),
        },
    };

    let staged = simplified.into_result();
    let diagnostics = PipelineDiagnostics {
        clean,
        extract,
        simplification,
        total_duration: start.elapsed(),
        summary: PipelineSummary {
            row_count,
            original_point_count: points_before,
            simplified_point_count: points_after,
        },
    };
    Ok((staged, diagnostics))
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!("Rows: {}", self.summary.row_count));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages: Vec<(&str, &StageDiagnostics)> = Vec::new();
        if let Some(ref clean) = self.clean {
            stages.push(("Clean", clean));
        }
        stages.push(("Extract", &self.extract));
        stages.push(("Simplification", &self.simplification));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Waypoints: {} -> {}",
            self.summary.original_point_count, self.summary.simplified_point_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[allow(clippy::cast_precision_loss)]
fn reduction_ratio(before: usize, after: usize) -> f64 {
    if before == 0 {
        0.0
    } else {
        1.0 - after as f64 / before as f64
    }
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Clean {
            columns_before,
            columns_after,
            dropped,
        } => {
            if dropped.is_empty() {
                format!("{columns_before}->{columns_after} columns")
            } else {
                format!(
                    "{columns_before}->{columns_after} columns (dropped: {})",
                    dropped.join(", "),
                )
            }
        }
        StageMetrics::Extract {
            row_count,
            point_count,
            gap_count,
            segment_count,
        } => {
            if *gap_count == 0 {
                format!("{row_count} rows -> {point_count} pts")
            } else {
                format!(
                    "{row_count} rows -> {point_count} pts ({gap_count} gaps, {segment_count} segments)"
                )
            }
        }
        StageMetrics::Simplification {
            epsilon,
            points_before,
            points_after,
            reduction_ratio,
        } => {
            format!(
                "eps={epsilon} {points_before}->{points_after} pts ({:.1}% reduction)",
                reduction_ratio * 100.0,
            )
        }
    }
}
