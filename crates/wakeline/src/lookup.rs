//! `wakeline lookup`: query the vessel stores by MMSI.

use std::path::PathBuf;

use clap::Args;
use wakeline_registry::{Mmsi, OptimizationStore, PerformanceTable, RecordKind, ShipRegistry};

use crate::error::{CliError, read_file};

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("stores")
        .required(true)
        .multiple(true)
        .args(["registry", "performance", "optimizations"]),
))]
pub struct LookupArgs {
    /// Vessel MMSI.
    pub mmsi: u32,

    /// Ship base information, a JSON array of records.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Ship performance, a JSON array of records.
    #[arg(long)]
    pub performance: Option<PathBuf>,

    /// Optimization suggestions, a JSON object keyed by MMSI.
    #[arg(long)]
    pub optimizations: Option<PathBuf>,
}

/// Result of querying one store: the pretty JSON to print, or why not.
type Outcome = (RecordKind, Result<String, CliError>);

/// Query every requested store independently, in a fixed order.
///
/// A miss or unreadable file in one store does not stop the others.
pub fn lookup_all(args: &LookupArgs, mmsi: Mmsi) -> Vec<Outcome> {
    let mut outcomes = Vec::new();

    if let Some(ref path) = args.registry {
        outcomes.push((
            RecordKind::Registry,
            read_file(path).and_then(|json| {
                let store = ShipRegistry::from_json(&json)?;
                pretty(&store.lookup(mmsi)?)
            }),
        ));
    }

    if let Some(ref path) = args.performance {
        outcomes.push((
            RecordKind::Performance,
            read_file(path).and_then(|json| {
                let store = PerformanceTable::from_json(&json)?;
                pretty(&store.lookup(mmsi)?)
            }),
        ));
    }

    if let Some(ref path) = args.optimizations {
        outcomes.push((
            RecordKind::Optimization,
            read_file(path).and_then(|json| {
                let store = OptimizationStore::from_json(&json)?;
                Ok(store.lookup_json(mmsi)?)
            }),
        ));
    }

    outcomes
}

fn pretty<T: serde::Serialize>(records: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(records).map_err(CliError::Serialize)
}

/// Print each successful lookup as JSON on stdout and log each failure.
///
/// Fails after all stores were tried if any of them failed.
pub fn run(args: &LookupArgs) -> Result<(), CliError> {
    let mmsi = Mmsi::new(args.mmsi);
    tracing::info!(%mmsi, "looking up vessel");

    let outcomes = lookup_all(args, mmsi);
    let requested = outcomes.len();
    let mut failed = 0;
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(json) => println!("{json}"),
            Err(e) => {
                failed += 1;
                tracing::warn!(%kind, "{e}");
            }
        }
    }

    if failed > 0 {
        return Err(CliError::LookupIncomplete { failed, requested });
    }
    Ok(())
}
