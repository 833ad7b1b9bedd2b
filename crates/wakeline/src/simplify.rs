//! `wakeline simplify`: run the pipeline on a JSON track file.

use std::path::PathBuf;

use clap::Args;
use wakeline_export::{SvgMetadata, result_to_json, table_to_json, to_svg};
use wakeline_pipeline::diagnostics::process_staged_with_diagnostics;
use wakeline_pipeline::{PipelineConfig, RecordTable, Tolerance};

use crate::error::{CliError, read_file, write_file};

#[derive(Args)]
pub struct SimplifyArgs {
    /// Path to the track, a JSON array of row objects.
    pub input: PathBuf,

    /// Simplification tolerance in degrees.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Name of the latitude column.
    #[arg(long, default_value = PipelineConfig::DEFAULT_LAT_COLUMN)]
    pub lat_column: String,

    /// Name of the longitude column.
    #[arg(long, default_value = PipelineConfig::DEFAULT_LON_COLUMN)]
    pub lon_column: String,

    /// Keep columns that are empty in every row.
    #[arg(long)]
    pub keep_empty_columns: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    #[arg(long)]
    pub config_json: Option<String>,

    /// Write the original and simplified routes as JSON to this file.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write the retained rows, with every remaining column, as JSON to
    /// this file.
    #[arg(long)]
    pub rows_output: Option<PathBuf>,

    /// Write an SVG overlay of both routes to this file.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// SVG title (defaults to the input file stem).
    #[arg(long)]
    pub title: Option<String>,

    /// Print diagnostics as JSON instead of the human-readable report.
    #[arg(long)]
    pub json: bool,
}

/// Build a [`PipelineConfig`] from the arguments.
///
/// `--config-json` wins over the individual flags.
pub fn config_from_args(args: &SimplifyArgs) -> Result<PipelineConfig, CliError> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(CliError::Config);
    }

    Ok(PipelineConfig {
        epsilon: args.epsilon,
        drop_empty_columns: !args.keep_empty_columns,
        lat_column: args.lat_column.clone(),
        lon_column: args.lon_column.clone(),
    })
}

pub fn run(args: &SimplifyArgs) -> Result<(), CliError> {
    let config = config_from_args(args)?;
    Tolerance::new(config.epsilon)?;
    tracing::debug!(?config, "pipeline config");

    let json = read_file(&args.input)?;
    tracing::info!(input = %args.input.display(), bytes = json.len(), "read track");

    let table = RecordTable::from_json(&json)?;
    let (staged, diagnostics) = process_staged_with_diagnostics(table, &config)?;
    tracing::info!(
        original = staged.original.len(),
        simplified = staged.simplified.len(),
        "simplified route"
    );

    if args.json {
        let report = serde_json::to_string_pretty(&diagnostics).map_err(CliError::Serialize)?;
        println!("{report}");
    } else {
        println!("{}", diagnostics.report());
    }

    if let Some(ref path) = args.rows_output {
        let rows = table_to_json(&staged.simplified_rows).map_err(CliError::Serialize)?;
        write_file(path, &rows)?;
    }

    let result = staged.into_process_result();

    if let Some(ref path) = args.output {
        let doc = result_to_json(&result).map_err(CliError::Serialize)?;
        write_file(path, &doc)?;
    }

    if let Some(ref path) = args.svg {
        let title = args
            .title
            .as_deref()
            .or_else(|| args.input.file_stem().and_then(|s| s.to_str()))
            .unwrap_or("route");
        let description = format!(
            "epsilon={} points={}/{}",
            config.epsilon,
            result.simplified.len(),
            result.original.len(),
        );
        let config_json = serde_json::to_string(&config).map_err(CliError::Serialize)?;
        let svg = to_svg(
            &result,
            &SvgMetadata {
                title: Some(title),
                description: Some(&description),
                config_json: Some(&config_json),
            },
        );
        write_file(path, &svg)?;
    }

    Ok(())
}
