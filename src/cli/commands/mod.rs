pub mod extract;
mod helper;
pub mod init;
pub mod rewrite;
pub mod translate;
pub mod validate;

use std::path::PathBuf;

use crate::core::emit::TargetLocaleOutput;
use crate::core::keys::UnassignedOccurrence;
use crate::core::rewrite::RewriteSummary;
use crate::core::validate::ValidationSummary;
use crate::issues::{ParseErrorIssue, SkipRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Init,
    Extract,
    Rewrite,
    Translate,
    Validate,
}

#[derive(Debug)]
pub enum CommandSummary {
    Init(InitSummary),
    Extract(ExtractSummary),
    Rewrite(RewriteSummary),
    Translate(TargetLocaleOutput),
    Validate(ValidateSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub plain_count: usize,
    pub interpolated_count: usize,
    pub key_count: usize,
    pub module_count: usize,
    pub skips: Vec<SkipRecord>,
    pub unassigned: Vec<UnassignedOccurrence>,
    pub locale_dir: PathBuf,
    pub template_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub bootstrap_written: bool,
    pub secondary: Option<TargetLocaleOutput>,
}

#[derive(Debug)]
pub struct ValidateSummary {
    pub validation: ValidationSummary,
    pub report_path: PathBuf,
}

/// Result of running a command.
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Files that could not be parsed and were skipped.
    pub parse_errors: Vec<ParseErrorIssue>,
    /// Number of source files the command looked at.
    pub source_files_checked: usize,
}

impl CommandResult {
    pub fn new(kind: CommandKind, summary: CommandSummary) -> Self {
        Self {
            kind,
            summary,
            parse_errors: Vec::new(),
            source_files_checked: 0,
        }
    }
}
