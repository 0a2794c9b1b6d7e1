use anyhow::Result;
use time::OffsetDateTime;

use super::helper::{finish, load_context};
use super::{CommandKind, CommandResult, CommandSummary};
use crate::cli::args::RewriteCommand;
use crate::core::rewrite::{FailureReason, RewriteOptions, Rewriter, SubstitutionStatus};
use crate::core::snapshot::Snapshot;
use crate::issues::ParseErrorIssue;

/// Apply the latest extraction snapshot to the sources.
pub fn rewrite(cmd: RewriteCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let (snapshot_path, snapshot) = Snapshot::load_latest(&ctx.output_dir())?;
    tracing::info!(
        path = %snapshot_path.display(),
        occurrences = snapshot.occurrences.len(),
        "snapshot loaded"
    );

    let options = RewriteOptions {
        preview: cmd.preview || ctx.config.preview,
        backup: ctx.config.backup,
    };
    let summary = Rewriter::new(&ctx, options).run(&snapshot, OffsetDateTime::now_utc())?;

    // Files that could not be read or parsed are reported like extract's parse errors.
    let parse_errors = summary
        .records
        .iter()
        .filter_map(|record| {
            record.substitutions.iter().find_map(|s| match &s.status {
                SubstitutionStatus::Failed {
                    reason: FailureReason::Unreadable { message },
                } => Some(ParseErrorIssue {
                    file_path: record.file.clone(),
                    error: message.clone(),
                }),
                _ => None,
            })
        })
        .collect();
    let files = summary.records.len();

    Ok(finish(
        CommandKind::Rewrite,
        CommandSummary::Rewrite(summary),
        parse_errors,
        files,
    ))
}
