//! wakeline: command-line front end for the track simplification
//! pipeline and the vessel lookups.
//!
//! # Usage
//!
//! ```text
//! wakeline simplify [OPTIONS] <INPUT_JSON>
//! wakeline lookup <MMSI> [--registry FILE] [--performance FILE] [--optimizations FILE]
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod lookup;
mod simplify;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Ship-track simplification and vessel lookups.
#[derive(Parser)]
#[command(name = "wakeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simplify a recorded track and export the result.
    Simplify(simplify::SimplifyArgs),
    /// Look up a vessel by MMSI.
    Lookup(lookup::LookupArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let outcome = match cli.command {
        Command::Simplify(args) => simplify::run(&args),
        Command::Lookup(args) => lookup::run(&args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use wakeline_pipeline::PipelineConfig;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("wakeline").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    fn simplify_args(args: &[&str]) -> simplify::SimplifyArgs {
        match parse(args) {
            Command::Simplify(a) => a,
            Command::Lookup(_) => panic!("expected simplify"),
        }
    }

    #[test]
    fn simplify_flags_build_config() {
        let args = simplify_args(&[
            "simplify",
            "track.json",
            "--epsilon",
            "0.25",
            "--lat-column",
            "latitude",
            "--keep-empty-columns",
        ]);
        let config = simplify::config_from_args(&args).unwrap();
        assert!((config.epsilon - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.lat_column, "latitude");
        assert_eq!(config.lon_column, PipelineConfig::DEFAULT_LON_COLUMN);
        assert!(!config.drop_empty_columns);
    }

    #[test]
    fn simplify_defaults_match_pipeline_defaults() {
        let args = simplify_args(&["simplify", "track.json"]);
        assert_eq!(
            simplify::config_from_args(&args).unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn config_json_overrides_flags() {
        let args = simplify_args(&[
            "simplify",
            "track.json",
            "--epsilon",
            "5",
            "--config-json",
            r#"{"epsilon": 0.01, "lon_column": "lng"}"#,
        ]);
        let config = simplify::config_from_args(&args).unwrap();
        assert!((config.epsilon - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.lon_column, "lng");
        assert_eq!(config.lat_column, PipelineConfig::DEFAULT_LAT_COLUMN);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let args = simplify_args(&["simplify", "track.json", "--config-json", "{"]);
        assert!(matches!(
            simplify::config_from_args(&args),
            Err(error::CliError::Config(_))
        ));
    }

    #[test]
    fn negative_epsilon_fails_before_reading_input() {
        let args = simplify_args(&[
            "simplify",
            "/nonexistent/track.json",
            "--epsilon=-1",
        ]);
        assert!(matches!(
            simplify::run(&args),
            Err(error::CliError::Pipeline(
                wakeline_pipeline::PipelineError::InvalidTolerance(_)
            ))
        ));
    }

    #[test]
    fn lookup_requires_a_store() {
        assert!(Cli::try_parse_from(["wakeline", "lookup", "563045200"]).is_err());
        assert!(matches!(
            parse(&["lookup", "563045200", "--optimizations", "opt.json"]),
            Command::Lookup(_)
        ));
    }

    #[test]
    fn simplify_writes_outputs() {
        let dir = std::env::temp_dir().join(format!("wakeline-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("track.json");
        std::fs::write(
            &input,
            r#"[
                {"lat": 0.0, "lon": 0.0, "speed": 10.0},
                {"lat": 0.0, "lon": 1.0, "speed": 11.0},
                {"lat": 1.0, "lon": 1.0, "speed": 12.0},
                {"lat": 0.0, "lon": 2.0, "speed": 13.0}
            ]"#,
        )
        .unwrap();
        let output = dir.join("result.json");
        let rows = dir.join("rows.json");
        let svg = dir.join("overlay.svg");

        let args = simplify_args(&[
            "simplify",
            input.to_str().unwrap(),
            "--epsilon",
            "0.8",
            "--output",
            output.to_str().unwrap(),
            "--rows-output",
            rows.to_str().unwrap(),
            "--svg",
            svg.to_str().unwrap(),
        ]);
        simplify::run(&args).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc["source_indices"], serde_json::json!([0, 2, 3]));

        let rows: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&rows).unwrap()).unwrap();
        assert_eq!(rows[1]["speed"], 12.0);

        let svg = std::fs::read_to_string(&svg).unwrap();
        assert!(svg.contains("<title>track</title>"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
