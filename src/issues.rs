//! Issue and record types produced by the pipeline.
//!
//! Recoverable conditions never become errors. They are collected here and
//! surfaced by the reporter:
//! - `ParseErrorIssue`: a file that could not be parsed and was skipped
//! - `SkipRecord`: a candidate the Extractor deliberately left alone
//! - `ValidationIssue`: residual target-script text found by the Validator

use serde::{Deserialize, Serialize};

// ============================================================
// Severity
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

// ============================================================
// Parse errors
// ============================================================

/// A file that could not be parsed. The file is skipped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }
}

// ============================================================
// Extraction skips
// ============================================================

/// Why a candidate containing target-script text was not extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Fully covered by a comment.
    Comment,
    /// Argument of a console-style diagnostic call.
    DiagnosticCall,
    /// Module path of an import or require.
    ModuleSpecifier,
    /// Inside static route metadata.
    RouteMetadata,
    /// Interpolation binds an expression that is not a plain path.
    ComplexInterpolation,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Comment => write!(f, "comment"),
            SkipReason::DiagnosticCall => write!(f, "diagnostic call"),
            SkipReason::ModuleSpecifier => write!(f, "module specifier"),
            SkipReason::RouteMetadata => write!(f, "route metadata"),
            SkipReason::ComplexInterpolation => write!(f, "complex interpolation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub file: String,
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

// ============================================================
// Validation
// ============================================================

/// Target-script text left in a file that is not wrapped by a translation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub file_path: String,
    pub line: usize,
    /// 1-based column in characters.
    pub col: usize,
    pub text: String,
    /// Up to 40 characters of surrounding text.
    pub context: String,
    #[serde(skip)]
    pub source_line: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn message(&self) -> String {
        format!("untranslated text \"{}\"", self.text)
    }
}
