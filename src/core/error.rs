use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a command. Everything else is recorded and reported.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{artifact} not found in {}; run `{producer}` first", dir.display())]
    MissingArtifact {
        artifact: &'static str,
        dir: PathBuf,
        producer: &'static str,
    },

    #[error("{} already exists", path.display())]
    ConfigExists { path: PathBuf },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
