//! Report formatting and printing utilities.
//!
//! Kept apart from the pipeline so the library never prints.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary, ValidateSummary};
use crate::core::emit::{TargetLocaleOutput, TranslationGap};
use crate::core::rewrite::{RewriteSummary, SubstitutionStatus};
use crate::issues::{ParseErrorIssue, ValidationIssue};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of skipped candidates listed with `-v`.
const MAX_SKIPS_DISPLAY: usize = 20;

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut out = io::stdout().lock();
    print_to(result, verbose, &mut out);
    print_parse_warning_to(&result.parse_errors, verbose, &mut io::stderr().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::Extract(summary) => print_extract(summary, verbose, writer),
        CommandSummary::Rewrite(summary) => print_rewrite(summary, writer),
        CommandSummary::Translate(output) => print_translate(output, writer),
        CommandSummary::Validate(summary) => print_validate(summary, writer),
    }
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(errors: &[ParseErrorIssue], verbose: bool, writer: &mut W) {
    if errors.is_empty() {
        return;
    }
    if verbose {
        for error in errors {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                error.file_path,
                error.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            errors.len(),
            "-v".cyan()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", summary.path.display()).green()
    );
}

fn print_extract<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    let total = summary.plain_count + summary.interpolated_count;
    let _ = writeln!(
        writer,
        "{} {} ({} plain, {} interpolated)",
        SUCCESS_MARK.green(),
        format!("Extracted {}", plural(total, "occurrence")).green(),
        summary.plain_count,
        summary.interpolated_count
    );
    let _ = writeln!(
        writer,
        "  - keys: {} in {}",
        summary.key_count,
        plural(summary.module_count, "module")
    );
    let _ = writeln!(writer, "  - locale: {}", summary.locale_dir.display());
    let _ = writeln!(writer, "  - template: {}", summary.template_path.display());
    let _ = writeln!(writer, "  - snapshot: {}", summary.snapshot_path.display());
    if summary.bootstrap_written {
        let _ = writeln!(writer, "  - bootstrap: lang/index.js");
    }

    if !summary.skips.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            "Skipped".yellow().bold(),
            plural(summary.skips.len(), "candidate")
        );
        if verbose {
            for skip in summary.skips.iter().take(MAX_SKIPS_DISPLAY) {
                let _ = writeln!(
                    writer,
                    "  {}:{} {} {}",
                    skip.file,
                    skip.line,
                    skip.text.replace('\n', "\\n"),
                    format!("({})", skip.reason).dimmed()
                );
            }
            if summary.skips.len() > MAX_SKIPS_DISPLAY {
                let _ = writeln!(
                    writer,
                    "  (and {} more)",
                    summary.skips.len() - MAX_SKIPS_DISPLAY
                );
            }
        }
    }

    for unassigned in &summary.unassigned {
        let _ = writeln!(
            writer,
            "{} {}: {}",
            "warning:".bold().yellow(),
            unassigned.location_key,
            unassigned.conflict
        );
    }

    if let Some(secondary) = &summary.secondary {
        print_translate(secondary, writer);
    }
}

fn print_rewrite<W: Write>(summary: &RewriteSummary, writer: &mut W) {
    if summary.preview {
        for record in &summary.records {
            let applicable: Vec<_> = record
                .substitutions
                .iter()
                .filter(|s| s.is_applied())
                .collect();
            if applicable.is_empty() {
                continue;
            }
            let _ = writeln!(writer, "{}", record.file.bold());
            for substitution in applicable {
                let _ = writeln!(writer, "  line {}", substitution.line);
                let _ = writeln!(writer, "  {}", format!("- {}", substitution.old).red());
                let _ = writeln!(
                    writer,
                    "  {}",
                    format!("+ {}", substitution.replacement).green()
                );
            }
            let _ = writeln!(writer);
        }
    }

    let applied = summary.applied();
    if summary.preview {
        let _ = writeln!(
            writer,
            "{} {} in {}",
            "Would replace".yellow().bold(),
            plural(applied, "occurrence"),
            plural(summary.files_modified(), "file")
        );
        let _ = writeln!(writer, "Run without {} to apply.", "--preview".cyan());
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Replaced {} in {}",
                plural(applied, "occurrence"),
                plural(summary.files_modified(), "file")
            )
            .green()
        );
        if let Some(dir) = &summary.backup_dir {
            let _ = writeln!(writer, "  - backup: {}", dir.display());
        }
    }

    let skipped = summary.skipped();
    if skipped > 0 {
        let _ = writeln!(writer, "  - skipped: {}", skipped);
        for record in &summary.records {
            if let Some(reason) = record.substitutions.iter().find_map(|s| match &s.status {
                SubstitutionStatus::Skipped { reason } => Some(reason),
                _ => None,
            }) {
                let _ = writeln!(writer, "    {} ({})", record.file, reason.dimmed());
            }
        }
    }

    let failed = summary.failed();
    if failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} need manual work",
            FAILURE_MARK.red(),
            plural(failed, "substitution")
        );
        for record in &summary.records {
            for failure in record.failures() {
                let _ = writeln!(
                    writer,
                    "  {}:{} {} {}",
                    record.file,
                    failure.line,
                    failure.old,
                    format!("({})", status_reason(&failure.status)).dimmed()
                );
            }
        }
        if let Some(path) = &summary.pending_report {
            let _ = writeln!(writer, "  - pending tasks: {}", path.display());
        }
    }
}

fn status_reason(status: &SubstitutionStatus) -> String {
    match status {
        SubstitutionStatus::Applied => "applied".to_string(),
        SubstitutionStatus::Failed { reason } => reason.to_string(),
        SubstitutionStatus::Skipped { reason } => reason.clone(),
    }
}

fn print_translate<W: Write>(output: &TargetLocaleOutput, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Generated locale {} ({})",
            output.lang,
            plural(output.modules.len(), "module")
        )
        .green()
    );

    if output.missing.is_empty() {
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} ({} empty, {} missing)",
        "Untranslated".yellow().bold(),
        plural(output.missing.len(), "phrase"),
        output.count(TranslationGap::Empty),
        output.count(TranslationGap::Missing)
    );
    if let Some(path) = &output.report_path {
        let _ = writeln!(writer, "  - report: {}", path.display());
    }
}

fn print_validate<W: Write>(summary: &ValidateSummary, writer: &mut W) {
    let validation = &summary.validation;
    let issues: Vec<&ValidationIssue> = validation.per_file.values().flatten().collect();

    if issues.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} - no untranslated text found",
                plural(validation.total_files, "source file")
            )
            .green()
        );
        return;
    }

    let max_line_width = issues
        .iter()
        .map(|i| i.line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);
    for issue in &issues {
        print_issue(issue, writer, max_line_width);
    }

    let _ = writeln!(
        writer,
        "{} {} in {} ({} checked)",
        FAILURE_MARK.red(),
        plural(validation.total_issues, "untranslated text"),
        plural(validation.files_with_issues, "file"),
        validation.total_files
    );
    let _ = writeln!(writer, "  - report: {}", summary.report_path.display());
}

fn print_issue<W: Write>(issue: &ValidationIssue, writer: &mut W, max_line_width: usize) {
    let _ = writeln!(writer, "{}: {}", "warning".bold().yellow(), issue.message());
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        issue.file_path,
        issue.line,
        issue.col
    );
    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        issue.line.to_string().blue(),
        "|".blue(),
        issue.source_line,
        width = max_line_width
    );

    // Caret under the first character of the text (col is 1-based)
    let prefix: String = issue
        .source_line
        .chars()
        .take(issue.col.saturating_sub(1))
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let caret_len = UnicodeWidthStr::width(issue.text.as_str()).max(1);
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".repeat(caret_len).yellow(),
        width = max_line_width,
        padding = caret_padding
    );
    let _ = writeln!(writer);
}
