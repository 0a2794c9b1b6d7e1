use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary};
use crate::cli::args::CommonArgs;
use crate::core::context::ProjectContext;
use crate::issues::ParseErrorIssue;

/// Resolve `--root` and load the project config from there.
pub fn load_context(common: &CommonArgs) -> Result<ProjectContext> {
    let root = common
        .root
        .canonicalize()
        .with_context(|| format!("Project root not found: {}", common.root.display()))?;
    let ctx = ProjectContext::load(&root)?;
    match &ctx.config_path {
        Some(path) => tracing::info!("using config {}", path.display()),
        None => tracing::info!("no config file found, using defaults"),
    }
    Ok(ctx)
}

pub fn finish(
    kind: CommandKind,
    summary: CommandSummary,
    mut parse_errors: Vec<ParseErrorIssue>,
    source_files_checked: usize,
) -> CommandResult {
    parse_errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    CommandResult {
        kind,
        summary,
        parse_errors,
        source_files_checked,
    }
}
