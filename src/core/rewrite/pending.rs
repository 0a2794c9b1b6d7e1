//! Pending-manual-work report: every substitution the rewrite could not apply.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::record::{FailureReason, RewriteRecord, SubstitutionStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingFile<'a> {
    file: &'a str,
    tasks: Vec<PendingTask<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingTask<'a> {
    location_key: &'a str,
    line: usize,
    key: &'a str,
    text: &'a str,
    old: &'a str,
    replacement: &'a str,
    reason: &'a FailureReason,
}

fn pending_files(records: &[RewriteRecord]) -> Vec<PendingFile<'_>> {
    records
        .iter()
        .filter_map(|record| {
            let tasks: Vec<PendingTask> = record
                .substitutions
                .iter()
                .filter_map(|s| match &s.status {
                    SubstitutionStatus::Failed { reason } => Some(PendingTask {
                        location_key: &s.location_key,
                        line: s.line,
                        key: &s.key,
                        text: &s.text,
                        old: &s.old,
                        replacement: &s.replacement,
                        reason,
                    }),
                    _ => None,
                })
                .collect();
            (!tasks.is_empty()).then_some(PendingFile {
                file: &record.file,
                tasks,
            })
        })
        .collect()
}

fn render_markdown(files: &[PendingFile], generated_at: &str) -> String {
    let total: usize = files.iter().map(|f| f.tasks.len()).sum();
    let mut out = String::new();
    let _ = writeln!(out, "# Pending manual rewrites\n");
    let _ = writeln!(out, "Generated: {}", generated_at);
    let _ = writeln!(out, "Files: {}, substitutions: {}\n", files.len(), total);

    for file in files {
        let _ = writeln!(out, "## {}\n", file.file);
        for task in &file.tasks {
            let _ = writeln!(
                out,
                "- [ ] line {}: replace `{}` with `{}` ({})",
                task.line, task.old, task.replacement, task.reason
            );
            let _ = writeln!(out, "  - key `{}`: {}", task.key, task.text.replace('\n', "\\n"));
        }
        out.push('\n');
    }
    out
}

/// Write `pending-tasks-<timestamp>.md` and `.json` into `dir` when any
/// substitution failed. Returns the markdown path.
pub fn write_pending_report(
    dir: &Path,
    records: &[RewriteRecord],
    timestamp: &str,
) -> Result<Option<PathBuf>> {
    let files = pending_files(records);
    if files.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let markdown = dir.join(format!("pending-tasks-{}.md", timestamp));
    fs::write(&markdown, render_markdown(&files, timestamp))
        .with_context(|| format!("Failed to write file: {}", markdown.display()))?;

    let json = dir.join(format!("pending-tasks-{}.json", timestamp));
    let content = serde_json::to_string_pretty(&files).context("Failed to serialize pending tasks")?;
    fs::write(&json, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", json.display()))?;

    Ok(Some(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rewrite::record::Substitution;
    use tempfile::tempdir;

    fn record(status: SubstitutionStatus) -> RewriteRecord {
        RewriteRecord {
            file: "src/App.vue".to_string(),
            modified: false,
            import_inserted: false,
            substitutions: vec![Substitution {
                location_key: "src/App.vue::template::line:3".to_string(),
                key: "Common.hello".to_string(),
                text: "你好".to_string(),
                line: 3,
                old: "你好".to_string(),
                replacement: "{{ $t('Common.hello') }}".to_string(),
                status,
            }],
        }
    }

    #[test]
    fn test_no_report_without_failures() {
        let dir = tempdir().unwrap();
        let written =
            write_pending_report(dir.path(), &[record(SubstitutionStatus::Applied)], "ts").unwrap();
        assert!(written.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_lists_failures_as_checklist() {
        let dir = tempdir().unwrap();
        let failed = record(SubstitutionStatus::Failed {
            reason: FailureReason::TextNotFound,
        });

        let path = write_pending_report(dir.path(), &[failed], "2024-01-01_00-00-00")
            .unwrap()
            .unwrap();
        let markdown = fs::read_to_string(&path).unwrap();
        assert!(markdown.contains("## src/App.vue"));
        assert!(markdown.contains("- [ ] line 3: replace `你好`"));
        assert!(markdown.contains("(text not found)"));

        let json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("pending-tasks-2024-01-01_00-00-00.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json[0]["tasks"][0]["key"], "Common.hello");
    }
}
