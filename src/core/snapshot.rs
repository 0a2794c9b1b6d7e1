//! Extraction snapshot: the hand-off between `extract` and `rewrite`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::error::PipelineError;
use crate::core::extract::{CapturedExpression, ExtractionResult, LiteralOccurrence, OccurrenceKind};
use crate::core::keys::Assignment;
use crate::utils::file_timestamp;

const FILE_PREFIX: &str = "i18n-extracted-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub extracted_at: String,
    pub plain_count: usize,
    pub interpolated_count: usize,
    pub total: usize,
    pub skipped_count: usize,
    pub file_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<CapturedExpression>,
    pub occurrence: LiteralOccurrence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    /// Location key to occurrence and assigned key. Unassigned occurrences
    /// are left out.
    pub occurrences: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    pub fn new(extraction: &ExtractionResult, assignment: &Assignment, at: OffsetDateTime) -> Self {
        let occurrences = extraction
            .occurrences
            .iter()
            .filter_map(|occurrence| {
                let entry = assignment.entries.get(&occurrence.location_key)?;
                Some((
                    occurrence.location_key.clone(),
                    SnapshotEntry {
                        key: entry.key.clone(),
                        bindings: entry.bindings.clone(),
                        occurrence: occurrence.clone(),
                    },
                ))
            })
            .collect();

        Self {
            metadata: SnapshotMetadata {
                extracted_at: at.format(&Rfc3339).unwrap_or_default(),
                plain_count: extraction.count(OccurrenceKind::Plain),
                interpolated_count: extraction.count(OccurrenceKind::Interpolated),
                total: extraction.occurrences.len(),
                skipped_count: extraction.skips.len(),
                file_count: extraction.file_count,
            },
            occurrences,
        }
    }

    /// Write to `<dir>/i18n-extracted-<timestamp>.json`.
    pub fn write(&self, dir: &Path, at: OffsetDateTime) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        let path = dir.join(format!("{}{}.json", FILE_PREFIX, file_timestamp(at)));
        let content = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        fs::write(&path, format!("{}\n", content))
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }

    /// Load the most recent snapshot in `dir`.
    pub fn load_latest(dir: &Path) -> Result<(PathBuf, Self)> {
        let latest = fs::read_dir(dir)
            .ok()
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(".json"))
            })
            .max();

        let Some(path) = latest else {
            return Err(PipelineError::MissingArtifact {
                artifact: "extraction snapshot",
                dir: dir.to_path_buf(),
                producer: "extract",
            }
            .into());
        };
        let snapshot = Self::read(&path)?;
        Ok((path, snapshot))
    }

    /// Entries grouped by file, each group in source order.
    pub fn by_file(&self) -> BTreeMap<&str, Vec<&SnapshotEntry>> {
        let mut groups: BTreeMap<&str, Vec<&SnapshotEntry>> = BTreeMap::new();
        for entry in self.occurrences.values() {
            groups
                .entry(entry.occurrence.file.as_str())
                .or_default()
                .push(entry);
        }
        for entries in groups.values_mut() {
            entries.sort_by_key(|e| e.occurrence.span.start);
        }
        groups
    }
}
