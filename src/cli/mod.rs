use anyhow::Result;

pub mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs};
pub use exit_status::ExitStatus;

/// Run one command and print its report.
///
/// Issues a command finds are reported, never turned into a failing status.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    tracing::debug!(command = ?result.kind, files = result.source_files_checked, "command finished");
    report::print(&result, verbose);

    Ok(ExitStatus::Success)
}
