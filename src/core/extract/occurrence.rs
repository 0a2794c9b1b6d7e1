use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::utils::is_identifier;

/// Part of a file an occurrence was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Markup of a component's `<template>` block.
    Template,
    /// A component's `<script>` block.
    Script,
    /// A plain script file.
    File,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Template => write!(f, "template"),
            RegionKind::Script => write!(f, "script"),
            RegionKind::File => write!(f, "file"),
        }
    }
}

/// Syntactic position an occurrence was taken from. Decides the rewrite form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Site {
    /// Whole text node between two tags.
    Text,
    /// One run of target-script characters in a text node mixed with markup.
    Run,
    /// Quoted branch of a ternary inside `{{ }}`.
    TernaryBranch,
    /// Whitelisted attribute value, e.g. `placeholder="..."`.
    Attribute { name: String },
    /// Script string literal.
    Literal,
    /// Script template literal.
    TemplateLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccurrenceKind {
    Plain,
    Interpolated,
}

/// Source expression bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedExpression {
    /// Safe parameter name used in `{label}` placeholders and the call's params object.
    pub label: String,
    /// Full source expression, emitted verbatim in the rewritten call.
    pub expression: String,
}

/// Occurrence data found by a region scanner, before file-level numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub region: RegionKind,
    pub line: usize,
    pub site: Site,
    /// File-absolute byte range replaced at rewrite time.
    pub span: Range<usize>,
    pub kind: OccurrenceKind,
    /// Resource text with `{label}` placeholders.
    pub text: String,
    /// Exact source text covered by `span`.
    pub raw_text: String,
    pub captured: Vec<CapturedExpression>,
}

/// One located instance of embedded target-script text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralOccurrence {
    pub location_key: String,
    /// Project-relative path with `/` separators.
    pub file: String,
    pub region: RegionKind,
    pub line: usize,
    pub site: Site,
    /// Index among occurrences of the same file, region, site and raw text.
    pub ordinal: usize,
    pub span: Range<usize>,
    pub kind: OccurrenceKind,
    pub text: String,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captured: Vec<CapturedExpression>,
}

impl LiteralOccurrence {
    /// Number the candidates of one file in source order.
    pub fn number(file: &str, mut candidates: Vec<Candidate>) -> Vec<LiteralOccurrence> {
        candidates.sort_by_key(|c| (c.span.start, c.span.end));

        let mut per_line: HashMap<(RegionKind, usize), usize> = HashMap::new();
        let mut per_signature: HashMap<(RegionKind, Site, String), usize> = HashMap::new();

        candidates
            .into_iter()
            .map(|c| {
                let seen_on_line = per_line.entry((c.region, c.line)).or_default();
                *seen_on_line += 1;
                let location_key = if *seen_on_line == 1 {
                    format!("{}::{}::line:{}", file, c.region, c.line)
                } else {
                    format!("{}::{}::line:{}#{}", file, c.region, c.line, seen_on_line)
                };

                let ordinal = per_signature
                    .entry((c.region, c.site.clone(), c.raw_text.clone()))
                    .or_default();
                let occurrence = LiteralOccurrence {
                    location_key,
                    file: file.to_string(),
                    region: c.region,
                    line: c.line,
                    site: c.site,
                    ordinal: *ordinal,
                    span: c.span,
                    kind: c.kind,
                    text: c.text,
                    raw_text: c.raw_text,
                    captured: c.captured,
                };
                *ordinal += 1;
                occurrence
            })
            .collect()
    }

    /// Same source construct as `other`, regardless of where it sits now.
    pub fn same_site(&self, other: &LiteralOccurrence) -> bool {
        self.region == other.region
            && self.site == other.site
            && self.raw_text == other.raw_text
            && self.ordinal == other.ordinal
    }
}

/// Derive a placeholder name from a source expression.
///
/// A plain identifier is kept, a dotted path keeps its last segment if that
/// is an identifier, anything else becomes `val<index>`.
pub fn safe_name(expression: &str, index: usize) -> String {
    let expression = expression.trim();
    if is_identifier(expression) {
        return expression.to_string();
    }
    if let Some((_, last)) = expression.rsplit_once('.')
        && is_identifier(last)
    {
        return last.to_string();
    }
    format!("val{}", index)
}

/// Bind safe names to the expressions of one interpolation, in order.
///
/// Two different expressions deriving the same name would share a
/// placeholder, so the later one falls back to its positional name.
pub fn bind_expressions<I, S>(expressions: I) -> Vec<CapturedExpression>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut bound: Vec<CapturedExpression> = Vec::new();

    for (index, expression) in expressions.into_iter().enumerate() {
        let expression: String = expression.into();
        let mut label = safe_name(&expression, index);
        if bound
            .iter()
            .any(|b| b.label == label && b.expression != expression)
        {
            label = format!("val{}", index);
        }
        bound.push(CapturedExpression { label, expression });
    }

    bound
}
