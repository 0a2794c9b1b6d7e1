use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed; issues it found are reported, not fatal
/// - `Failure` (1): Command refused to run (e.g. config already exists)
/// - `Error` (2): Command failed (missing artifact, invalid config, I/O error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed.
    Success,
    /// Command refused to run.
    Failure,
    /// Command failed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

impl ExitStatus {
    /// Status for an error that aborted a command.
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<crate::core::error::PipelineError>() {
            Some(crate::core::error::PipelineError::ConfigExists { .. }) => ExitStatus::Failure,
            _ => ExitStatus::Error,
        }
    }
}
