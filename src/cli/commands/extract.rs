use anyhow::Result;
use time::OffsetDateTime;

use super::helper::{finish, load_context};
use super::{CommandKind, CommandResult, CommandSummary, ExtractSummary};
use crate::cli::args::ExtractCommand;
use crate::core::emit::{emit_default_locale, emit_target_locale, read_locale};
use crate::core::extract::{OccurrenceKind, extract_files};
use crate::core::keys::KeyAssigner;
use crate::core::snapshot::Snapshot;

/// Scan, extract, assign keys and write every extract artifact.
///
/// Keys already present in the default locale are kept, so running
/// `extract` again only adds resources.
pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let at = OffsetDateTime::now_utc();

    let scan = ctx.scan();
    tracing::info!(
        files = scan.files.len(),
        excluded = scan.skipped_count,
        "scan finished"
    );

    let mut extraction = extract_files(&scan.files, &ctx.extract_settings());
    for skip in &extraction.skips {
        tracing::debug!(file = skip.file.as_str(), line = skip.line, reason = %skip.reason, "skipped {:?}", skip.text);
    }

    let locale_dir = ctx.locale_dir(&ctx.config.default_locale);
    let existing = read_locale(&locale_dir)?;
    let assignment = KeyAssigner::new(&ctx.config)
        .with_existing(existing)
        .assign(&extraction.occurrences);

    let emitted = emit_default_locale(&ctx, &assignment.tree)?;
    let snapshot = Snapshot::new(&extraction, &assignment, at);
    let snapshot_path = snapshot.write(&ctx.output_dir(), at)?;
    tracing::info!(path = %snapshot_path.display(), total = snapshot.metadata.total, "snapshot written");

    let secondary = if ctx.config.generate_secondary_locale {
        Some(emit_target_locale(&ctx, &ctx.config.secondary_locale)?)
    } else {
        None
    };

    let summary = ExtractSummary {
        plain_count: extraction.count(OccurrenceKind::Plain),
        interpolated_count: extraction.count(OccurrenceKind::Interpolated),
        key_count: assignment.tree.leaves().len(),
        module_count: emitted.modules.len(),
        skips: std::mem::take(&mut extraction.skips),
        unassigned: assignment.unassigned,
        locale_dir,
        template_path: emitted.template_path,
        snapshot_path,
        bootstrap_written: emitted.bootstrap_written,
        secondary,
    };

    Ok(finish(
        CommandKind::Extract,
        CommandSummary::Extract(summary),
        extraction.parse_errors,
        extraction.file_count,
    ))
}
