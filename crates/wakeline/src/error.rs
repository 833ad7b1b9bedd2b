use std::path::PathBuf;

use wakeline_pipeline::PipelineError;
use wakeline_registry::LookupError;

/// Anything that stops a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing --config-json: {0}")]
    Config(serde_json::Error),

    #[error("error serializing output: {0}")]
    Serialize(serde_json::Error),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{failed} of {requested} lookups failed")]
    LookupIncomplete { failed: usize, requested: usize },
}

pub fn read_file(path: &std::path::Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_file(path: &std::path::Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}
