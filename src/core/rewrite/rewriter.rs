use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use time::OffsetDateTime;

use super::backup::Backup;
use super::call::replacement;
use super::edits::{Edit, apply_edits};
use super::import::{has_module_binding, import_specifier, insert_import};
use super::pending::write_pending_report;
use super::record::{FailureReason, RewriteRecord, RewriteSummary, Substitution, SubstitutionStatus};
use crate::core::context::ProjectContext;
use crate::core::extract::{ExtractSettings, RegionKind, extract_source};
use crate::core::parsers::FileKind;
use crate::core::snapshot::{Snapshot, SnapshotEntry};
use crate::utils::file_timestamp;

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Compute every substitution but write nothing.
    pub preview: bool,
    /// Copy each file into the backup directory before overwriting it.
    pub backup: bool,
}

/// Result of rewriting one file in memory.
#[derive(Debug)]
pub struct FileRewrite {
    pub record: RewriteRecord,
    /// New content, present only when it differs from the input.
    pub content: Option<String>,
}

/// Replaces located occurrences with translation calls, one file at a time.
pub struct Rewriter<'a> {
    ctx: &'a ProjectContext,
    settings: ExtractSettings,
    options: RewriteOptions,
}

impl<'a> Rewriter<'a> {
    pub fn new(ctx: &'a ProjectContext, options: RewriteOptions) -> Self {
        Self {
            ctx,
            settings: ctx.extract_settings(),
            options,
        }
    }

    /// Rewrite `content` of `file` for the given snapshot entries.
    ///
    /// The file is re-extracted and every entry is matched to the fresh
    /// occurrence at the same site; entries without a match are recorded
    /// as failures and the text around them is left untouched.
    pub fn rewrite_source(
        &self,
        file: &str,
        content: &str,
        kind: FileKind,
        entries: &[&SnapshotEntry],
    ) -> FileRewrite {
        let fresh = match extract_source(file, content, kind, &self.settings) {
            Ok(extraction) => extraction.occurrences,
            Err(e) => {
                tracing::warn!("cannot rewrite {}: {:#}", file, e);
                return self.failed_file(
                    file,
                    entries,
                    FailureReason::Unreadable {
                        message: format!("{:#}", e),
                    },
                );
            }
        };

        let calls = &self.ctx.config.calls;
        let mut substitutions = Vec::with_capacity(entries.len());
        let mut edits = Vec::new();

        for entry in entries {
            let stored = &entry.occurrence;
            let found = fresh.iter().find(|candidate| candidate.same_site(stored));
            let located = found.unwrap_or(stored);
            let new_text = replacement(
                located.region,
                &located.site,
                &entry.key,
                &entry.bindings,
                calls,
            );

            let status = match found {
                Some(current) => {
                    edits.push(Edit {
                        span: current.span.clone(),
                        replacement: new_text.clone(),
                        id: substitutions.len(),
                    });
                    tracing::debug!(location = stored.location_key.as_str(), "substitution located");
                    SubstitutionStatus::Applied
                }
                None => {
                    tracing::warn!(
                        location = stored.location_key.as_str(),
                        "text no longer found: {}",
                        stored.raw_text
                    );
                    SubstitutionStatus::Failed {
                        reason: FailureReason::TextNotFound,
                    }
                }
            };

            substitutions.push(Substitution {
                location_key: stored.location_key.clone(),
                key: entry.key.clone(),
                text: stored.text.clone(),
                line: located.line,
                old: stored.raw_text.clone(),
                replacement: new_text,
                status,
            });
        }

        let (mut output, rejected) = apply_edits(content, edits);
        for id in rejected {
            substitutions[id].status = SubstitutionStatus::Failed {
                reason: FailureReason::Overlap,
            };
        }

        let needs_import = substitutions
            .iter()
            .zip(entries)
            .any(|(s, e)| s.is_applied() && e.occurrence.region == RegionKind::File);
        let binding = &calls.module_binding;
        let import_inserted = needs_import && !has_module_binding(&output, binding);
        if import_inserted {
            let specifier = import_specifier(
                self.ctx.config.import_path.as_deref(),
                &self.ctx.resolve(&self.ctx.config.translation_module),
                &self.ctx.root.join(file),
            );
            output = insert_import(&output, binding, &specifier);
        }

        let modified = output != content;
        FileRewrite {
            record: RewriteRecord {
                file: file.to_string(),
                modified,
                import_inserted,
                substitutions,
            },
            content: modified.then_some(output),
        }
    }

    fn failed_file(&self, file: &str, entries: &[&SnapshotEntry], reason: FailureReason) -> FileRewrite {
        self.unchanged(file, entries, SubstitutionStatus::Failed { reason })
    }

    fn unchanged(&self, file: &str, entries: &[&SnapshotEntry], status: SubstitutionStatus) -> FileRewrite {
        let substitutions = entries
            .iter()
            .map(|entry| Substitution {
                location_key: entry.occurrence.location_key.clone(),
                key: entry.key.clone(),
                text: entry.occurrence.text.clone(),
                line: entry.occurrence.line,
                old: entry.occurrence.raw_text.clone(),
                replacement: replacement(
                    entry.occurrence.region,
                    &entry.occurrence.site,
                    &entry.key,
                    &entry.bindings,
                    &self.ctx.config.calls,
                ),
                status: status.clone(),
            })
            .collect();
        FileRewrite {
            record: RewriteRecord {
                file: file.to_string(),
                modified: false,
                import_inserted: false,
                substitutions,
            },
            content: None,
        }
    }

    fn rewrite_file(&self, file: &str, entries: &[&SnapshotEntry]) -> FileRewrite {
        if self.ctx.is_protected(file) {
            tracing::debug!("skipping protected file {}", file);
            return self.unchanged(
                file,
                entries,
                SubstitutionStatus::Skipped {
                    reason: "protected file".to_string(),
                },
            );
        }

        let path = self.ctx.root.join(file);
        let Some(kind) = FileKind::from_path(&path) else {
            return self.failed_file(
                file,
                entries,
                FailureReason::Unreadable {
                    message: "unsupported file type".to_string(),
                },
            );
        };
        match fs::read_to_string(&path) {
            Ok(content) => self.rewrite_source(file, &content, kind, entries),
            Err(e) => {
                tracing::warn!("cannot read {}: {}", file, e);
                self.failed_file(
                    file,
                    entries,
                    FailureReason::Unreadable {
                        message: e.to_string(),
                    },
                )
            }
        }
    }

    /// Rewrite every file of the snapshot.
    ///
    /// All new contents are computed first; backups are taken before the
    /// first write. A failed write aborts the run.
    pub fn run(&self, snapshot: &Snapshot, at: OffsetDateTime) -> Result<RewriteSummary> {
        let groups: Vec<(&str, Vec<&SnapshotEntry>)> = snapshot.by_file().into_iter().collect();
        let rewrites: Vec<FileRewrite> = groups
            .par_iter()
            .map(|(file, entries)| self.rewrite_file(file, entries))
            .collect();

        let timestamp = file_timestamp(at);
        let mut summary = RewriteSummary {
            preview: self.options.preview,
            ..Default::default()
        };

        if !self.options.preview {
            let pending_writes: Vec<(&FileRewrite, &String)> = rewrites
                .iter()
                .filter_map(|r| r.content.as_ref().map(|c| (r, c)))
                .collect();

            if self.options.backup && !pending_writes.is_empty() {
                let backup = Backup::new(&self.ctx.root, &self.ctx.backup_dir(), &timestamp);
                for (rewrite, _) in &pending_writes {
                    backup.save(&rewrite.record.file)?;
                }
                summary.backup_dir = Some(backup.dir().to_path_buf());
            }

            for (rewrite, content) in &pending_writes {
                let path: PathBuf = self.ctx.root.join(&rewrite.record.file);
                fs::write(&path, content)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                tracing::info!(file = rewrite.record.file.as_str(), "rewritten");
            }
        }

        summary.records = rewrites.into_iter().map(|r| r.record).collect();
        if !self.options.preview {
            summary.pending_report =
                write_pending_report(&self.ctx.output_dir(), &summary.records, &timestamp)?;
        }
        Ok(summary)
    }
}
