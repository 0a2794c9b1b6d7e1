use std::fs;

use anyhow::Result;
use rayon::prelude::*;

use super::occurrence::{LiteralOccurrence, OccurrenceKind, RegionKind};
use super::script::{Placement, collect_script};
use super::template::scan_template;
use super::{ExtractSettings, RegionScan};
use crate::core::file_scanner::SourceFile;
use crate::core::parsers::{FileKind, ParsedUnit, parse, parse_script};
use crate::issues::{ParseErrorIssue, SkipRecord};

/// Occurrences and skips of one file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub occurrences: Vec<LiteralOccurrence>,
    pub skips: Vec<SkipRecord>,
}

/// Result of extracting a whole project.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// Ordered by file path, then source position.
    pub occurrences: Vec<LiteralOccurrence>,
    pub skips: Vec<SkipRecord>,
    pub parse_errors: Vec<ParseErrorIssue>,
    pub file_count: usize,
}

impl ExtractionResult {
    pub fn count(&self, kind: OccurrenceKind) -> usize {
        self.occurrences.iter().filter(|o| o.kind == kind).count()
    }
}

/// Extract every occurrence from one file's content.
///
/// Fails only when the file (or a component's script block) cannot be parsed.
pub fn extract_source(
    file: &str,
    content: &str,
    kind: FileKind,
    settings: &ExtractSettings,
) -> Result<FileExtraction> {
    let mut scan = RegionScan::default();

    match parse(content, file, kind)? {
        ParsedUnit::Component(regions) => {
            if let Some(script) = &regions.script {
                let parsed = parse_script(&script.region.content, file, script.dialect)?;
                let placement = Placement {
                    region: RegionKind::Script,
                    offset: script.region.offset,
                    start_line: script.region.start_line,
                };
                scan.merge(collect_script(
                    &parsed,
                    &script.region.content,
                    placement,
                    file,
                    settings,
                ));
            }
            if let Some(template) = &regions.template {
                scan.merge(scan_template(template, file, settings));
            }
        }
        ParsedUnit::Script(parsed) => {
            scan.merge(collect_script(
                &parsed,
                content,
                Placement::whole_file(),
                file,
                settings,
            ));
        }
    }

    Ok(FileExtraction {
        occurrences: LiteralOccurrence::number(file, scan.candidates),
        skips: scan.skips,
    })
}

/// Extract all files in parallel. Output order follows the input order.
pub fn extract_files(files: &[SourceFile], settings: &ExtractSettings) -> ExtractionResult {
    let results: Vec<Result<FileExtraction, ParseErrorIssue>> = files
        .par_iter()
        .map(|file| extract_file(file, settings))
        .collect();

    let mut extraction = ExtractionResult {
        file_count: files.len(),
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(file) => {
                extraction.occurrences.extend(file.occurrences);
                extraction.skips.extend(file.skips);
            }
            Err(issue) => extraction.parse_errors.push(issue),
        }
    }

    tracing::info!(
        files = extraction.file_count,
        occurrences = extraction.occurrences.len(),
        skipped = extraction.skips.len(),
        "extraction finished"
    );
    extraction
}

fn extract_file(
    file: &SourceFile,
    settings: &ExtractSettings,
) -> Result<FileExtraction, ParseErrorIssue> {
    let content = fs::read_to_string(&file.path).map_err(|e| {
        tracing::warn!("cannot read {}: {}", file.relative, e);
        ParseErrorIssue {
            file_path: file.relative.clone(),
            error: e.to_string(),
        }
    })?;

    extract_source(&file.relative, &content, file.kind, settings).map_err(|e| {
        tracing::warn!("skipping {}: {:#}", file.relative, e);
        ParseErrorIssue {
            file_path: file.relative.clone(),
            error: format!("{:#}", e),
        }
    })
}
