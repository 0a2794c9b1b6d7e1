//! Validator.
//!
//! A line-oriented scan for target-script text that is still not wrapped by
//! a translation call. Cheaper and looser than extraction: it only looks at
//! quotes, comments and `{{ }}` delimiters.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use crate::config::Config;
use crate::core::file_scanner::SourceFile;
use crate::issues::{Severity, ValidationIssue};
use crate::utils::ScriptDetector;

const CONTEXT_CHARS: usize = 40;

/// Where a byte of a line sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Bare,
    Comment,
    Quoted { wrapped: bool },
    Interpolation,
}

/// Comment and template-literal state carried from one line to the next.
#[derive(Debug, Default)]
struct ScanState {
    in_block_comment: bool,
    in_html_comment: bool,
    open_backtick: Option<bool>,
    /// Open parentheses of a diagnostic call such as `console.log(`.
    diagnostic_depth: usize,
}

#[derive(Debug, Default)]
pub struct ValidationSummary {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_issues: usize,
    pub per_file: BTreeMap<String, Vec<ValidationIssue>>,
    /// Files that could not be read.
    pub unreadable: Vec<String>,
}

pub struct Validator {
    detector: ScriptDetector,
    call_prefix: Regex,
    diagnostic_call: Option<Regex>,
}

/// Module specifiers are never translated.
static SPECIFIER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:from|import|import\s*\(|require\s*\()\s*$").unwrap());

impl Validator {
    pub fn new(config: &Config) -> Result<Self> {
        let spellings = config
            .calls
            .all()
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        let call_prefix = Regex::new(&format!(r"(?:{})\s*\(\s*$", spellings))
            .context("Failed to build translation call pattern")?;

        let diagnostic_call = if config.diagnostic_objects.is_empty() {
            None
        } else {
            let objects = config
                .diagnostic_objects
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"^(?:{})\s*\.\s*[A-Za-z_$][\w$]*\s*\(", objects);
            Some(Regex::new(&pattern).context("Failed to build diagnostic call pattern")?)
        };

        Ok(Self {
            detector: config.script_detector(),
            call_prefix,
            diagnostic_call,
        })
    }

    /// Every unwrapped run of target-script text in `content`.
    pub fn check_source(&self, file: &str, content: &str) -> Vec<ValidationIssue> {
        let mut state = ScanState::default();
        let mut issues = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let classes = self.classify(line, &mut state);
            if is_comment_line(line) {
                continue;
            }

            for run in self.detector.runs(line) {
                let reportable = matches!(
                    classes.get(run.start),
                    Some(Class::Quoted { wrapped: false } | Class::Interpolation)
                );
                if !reportable {
                    continue;
                }
                let col = line[..run.start].chars().count() + 1;
                issues.push(ValidationIssue {
                    file_path: file.to_string(),
                    line: index + 1,
                    col,
                    text: line[run.clone()].to_string(),
                    context: context_window(line, col - 1, line[run].chars().count()),
                    source_line: line.to_string(),
                    severity: Severity::Error,
                });
            }
        }

        issues
    }

    fn classify(&self, line: &str, state: &mut ScanState) -> Vec<Class> {
        let mut classes = vec![Class::Bare; line.len()];
        let mut quote: Option<(char, bool)> = state.open_backtick.map(|wrapped| ('`', wrapped));
        let mut in_interpolation = false;
        let mut diagnostic_pending = false;
        let mut chars = line.char_indices();

        while let Some((i, c)) = chars.next() {
            let rest = &line[i..];
            let mark = |len: usize, class: Class, classes: &mut Vec<Class>| {
                for slot in classes.iter_mut().skip(i).take(len) {
                    *slot = class;
                }
            };

            if state.in_block_comment || state.in_html_comment {
                let close = if state.in_block_comment { "*/" } else { "-->" };
                mark(c.len_utf8(), Class::Comment, &mut classes);
                if rest.starts_with(close) {
                    mark(close.len(), Class::Comment, &mut classes);
                    advance(&mut chars, close.len() - 1);
                    state.in_block_comment = false;
                    state.in_html_comment = false;
                }
                continue;
            }

            if let Some((open, wrapped)) = quote {
                mark(c.len_utf8(), Class::Quoted { wrapped }, &mut classes);
                if c == '\\' {
                    if let Some((j, escaped)) = chars.next() {
                        for slot in classes.iter_mut().skip(j).take(escaped.len_utf8()) {
                            *slot = Class::Quoted { wrapped };
                        }
                    }
                } else if c == open {
                    quote = None;
                }
                continue;
            }

            if rest.starts_with("//") {
                mark(rest.len(), Class::Comment, &mut classes);
                break;
            }
            if rest.starts_with("/*") {
                state.in_block_comment = true;
                mark(2, Class::Comment, &mut classes);
                advance(&mut chars, 1);
                continue;
            }
            if rest.starts_with("<!--") {
                state.in_html_comment = true;
                mark(4, Class::Comment, &mut classes);
                advance(&mut chars, 3);
                continue;
            }
            if state.diagnostic_depth == 0
                && !diagnostic_pending
                && starts_word(line, i)
                && self
                    .diagnostic_call
                    .as_ref()
                    .is_some_and(|call| call.is_match(rest))
            {
                diagnostic_pending = true;
            }
            match c {
                '(' if diagnostic_pending => {
                    diagnostic_pending = false;
                    state.diagnostic_depth = 1;
                }
                '(' if state.diagnostic_depth > 0 => state.diagnostic_depth += 1,
                ')' if state.diagnostic_depth > 0 => state.diagnostic_depth -= 1,
                _ => {}
            }
            if matches!(c, '\'' | '"' | '`') {
                let prefix = &line[..i];
                let wrapped = state.diagnostic_depth > 0
                    || self.call_prefix.is_match(prefix)
                    || SPECIFIER_PREFIX.is_match(prefix);
                quote = Some((c, wrapped));
                mark(1, Class::Quoted { wrapped }, &mut classes);
                continue;
            }
            if rest.starts_with("{{") {
                in_interpolation = true;
                advance(&mut chars, 1);
                continue;
            }
            if rest.starts_with("}}") {
                in_interpolation = false;
                advance(&mut chars, 1);
                continue;
            }
            if in_interpolation {
                mark(c.len_utf8(), Class::Interpolation, &mut classes);
            }
        }

        state.open_backtick = match quote {
            Some(('`', wrapped)) => Some(wrapped),
            _ => None,
        };
        classes
    }

    /// Validate files in parallel.
    pub fn check_files(&self, files: &[SourceFile]) -> ValidationSummary {
        let results: Vec<(String, Result<Vec<ValidationIssue>, String>)> = files
            .par_iter()
            .map(|file| {
                let result = fs::read_to_string(&file.path)
                    .map(|content| self.check_source(&file.relative, &content))
                    .map_err(|e| e.to_string());
                (file.relative.clone(), result)
            })
            .collect();

        let mut summary = ValidationSummary {
            total_files: files.len(),
            ..Default::default()
        };
        for (file, result) in results {
            match result {
                Ok(issues) if issues.is_empty() => {}
                Ok(issues) => {
                    summary.total_issues += issues.len();
                    summary.files_with_issues += 1;
                    summary.per_file.insert(file, issues);
                }
                Err(e) => {
                    tracing::warn!("cannot read {}: {}", file, e);
                    summary.unreadable.push(file);
                }
            }
        }

        tracing::info!(
            files = summary.total_files,
            issues = summary.total_issues,
            "validation finished"
        );
        summary
    }
}

fn advance<I: Iterator>(iter: &mut I, n: usize) {
    for _ in 0..n {
        iter.next();
    }
}

fn starts_word(line: &str, at: usize) -> bool {
    line[..at]
        .chars()
        .next_back()
        .is_none_or(|prev| !(prev.is_alphanumeric() || matches!(prev, '_' | '$' | '.')))
}

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["//", "<!--", "/*", "*"]
        .iter()
        .any(|opening| trimmed.starts_with(opening))
}

/// Up to `CONTEXT_CHARS` characters around a run, with `...` where cut.
fn context_window(line: &str, start_char: usize, run_chars: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let margin = CONTEXT_CHARS.saturating_sub(run_chars) / 2;
    let from = start_char.saturating_sub(margin);
    let to = (start_char + run_chars + margin).min(chars.len());

    let mut out = String::new();
    if from > 0 {
        out.push_str("...");
    }
    out.extend(&chars[from..to]);
    if to < chars.len() {
        out.push_str("...");
    }
    out.trim().to_string()
}

/// Markdown report of every issue, grouped by file.
pub fn render_report(summary: &ValidationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Validation report\n");
    let _ = writeln!(out, "- Files checked: {}", summary.total_files);
    let _ = writeln!(out, "- Files with issues: {}", summary.files_with_issues);
    let _ = writeln!(out, "- Issues: {}\n", summary.total_issues);

    for (file, issues) in &summary.per_file {
        let _ = writeln!(out, "## {}\n", file);
        for issue in issues {
            let _ = writeln!(
                out,
                "- {}:{} `{}`: {}",
                issue.line, issue.col, issue.text, issue.context
            );
        }
        out.push('\n');
    }
    out
}

pub fn write_report(dir: &Path, summary: &ValidationSummary) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join("validation-report.md");
    fs::write(&path, render_report(summary))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(path)
}
