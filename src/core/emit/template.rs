use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::keys::ResourceTree;

const HEADER: &str = "\
# Translation template
#
# One phrase per line: `source phrase = translation`.
# Fill in the right-hand side and run `translate <lang>`.
# Lines starting with `#` are ignored. Write line breaks as \\n,
# `=` as \\=, a leading `#` as \\# and spaces at either end as \\s.
# Phrases left blank are reported as empty, absent phrases as missing.
";

const RETAINED_MARKER: &str = "# Retained: translations of phrases no longer extracted";

/// Outcome of looking a phrase up in a filled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Translated(&'a str),
    Empty,
    Missing,
}

/// Flat phrase to translation table edited by translators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTemplate {
    /// One entry per distinct resource text, sorted by phrase.
    pub entries: BTreeMap<String, String>,
    /// Non-blank translations kept from earlier templates.
    pub retained: BTreeMap<String, String>,
}

impl TranslationTemplate {
    /// Blank template with every distinct leaf text of `tree`.
    pub fn from_tree(tree: &ResourceTree) -> Self {
        let entries = tree
            .leaves()
            .into_iter()
            .map(|(_, text)| (text, String::new()))
            .collect();
        Self {
            entries,
            retained: BTreeMap::new(),
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut template = Self::default();
        let mut in_retained = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed == RETAINED_MARKER {
                in_retained = true;
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((phrase, translation)) = split_line(trimmed) else {
                continue;
            };
            if phrase.is_empty() {
                continue;
            }

            let target = if in_retained {
                &mut template.retained
            } else {
                &mut template.entries
            };
            target.insert(unescape(phrase), unescape(translation));
        }

        template
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for (phrase, translation) in &self.entries {
            push_line(&mut out, phrase, translation);
        }
        if !self.retained.is_empty() {
            out.push('\n');
            out.push_str(RETAINED_MARKER);
            out.push('\n');
            for (phrase, translation) in &self.retained {
                push_line(&mut out, phrase, translation);
            }
        }
        out
    }

    /// Carry over every non-blank translation from `previous`.
    ///
    /// Phrases no longer present move to the retained section.
    pub fn merge_previous(&mut self, previous: &TranslationTemplate) {
        for (phrase, translation) in previous.entries.iter().chain(&previous.retained) {
            if translation.is_empty() {
                continue;
            }
            match self.entries.get_mut(phrase) {
                Some(slot) => *slot = translation.clone(),
                None => {
                    self.retained.insert(phrase.clone(), translation.clone());
                }
            }
        }
    }

    pub fn lookup(&self, phrase: &str) -> Lookup<'_> {
        match self.entries.get(phrase).or_else(|| self.retained.get(phrase)) {
            Some(translation) if !translation.is_empty() => Lookup::Translated(translation),
            Some(_) => Lookup::Empty,
            None => Lookup::Missing,
        }
    }

    pub fn translated_count(&self) -> usize {
        self.entries.values().filter(|t| !t.is_empty()).count()
    }
}

fn push_line(out: &mut String, phrase: &str, translation: &str) {
    out.push_str(&escape(phrase));
    if translation.is_empty() {
        out.push_str(" =\n");
    } else {
        out.push_str(" = ");
        out.push_str(&escape(translation));
        out.push('\n');
    }
}

/// Split on the first unescaped ` = `, else a trailing `=`, else the
/// first unescaped `=`.
fn split_line(line: &str) -> Option<(&str, &str)> {
    if let Some(at) = find_unescaped(line, " = ") {
        return Some((line[..at].trim(), line[at + 3..].trim()));
    }
    if let Some(phrase) = line.strip_suffix('=')
        && !ends_with_escape(phrase)
    {
        return Some((phrase.trim(), ""));
    }
    find_unescaped(line, "=").map(|at| (line[..at].trim(), line[at + 1..].trim()))
}

fn find_unescaped(line: &str, pattern: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if line[i..].starts_with(pattern) {
            return Some(i);
        }
    }
    None
}

fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Escape a phrase or translation so it survives one template line.
///
/// `=` and a leading `#` are escaped, and so is whitespace at either edge,
/// which the parser would otherwise trim.
fn escape(text: &str) -> String {
    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    let core_end = text.len() - trailing;

    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        let at_edge = i < leading || i >= core_end.max(leading);
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' => out.push_str("\\="),
            '#' if i == 0 => out.push_str("\\#"),
            ' ' if at_edge => out.push_str("\\s"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(c @ ('=' | '#')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
