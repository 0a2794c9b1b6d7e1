use anyhow::Result;

use super::helper::{finish, load_context};
use super::{CommandKind, CommandResult, CommandSummary, ValidateSummary};
use crate::cli::args::ValidateCommand;
use crate::core::validate::{Validator, write_report};
use crate::issues::ParseErrorIssue;

pub fn validate(cmd: ValidateCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let validator = Validator::new(&ctx.config)?;

    let scan = ctx.scan();
    let validation = validator.check_files(&scan.files);
    let report_path = write_report(&ctx.output_dir(), &validation)?;
    tracing::info!(
        files = validation.total_files,
        issues = validation.total_issues,
        report = %report_path.display(),
        "validation finished"
    );

    let unreadable = validation
        .unreadable
        .iter()
        .map(|file| ParseErrorIssue {
            file_path: file.clone(),
            error: "could not be read".to_string(),
        })
        .collect();
    let files = validation.total_files;

    Ok(finish(
        CommandKind::Validate,
        CommandSummary::Validate(ValidateSummary {
            validation,
            report_path,
        }),
        unreadable,
        files,
    ))
}
