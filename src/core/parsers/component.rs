//! Block scanner for single-file components.
//!
//! Splits a `.vue` file into its template and script regions. Only the
//! region boundaries are located here; the regions themselves are scanned by
//! the template scanner and parsed by the script parser.

use std::sync::LazyLock;

use regex::Regex;

use super::script::ScriptDialect;
use crate::utils::line_of_offset;

static TEMPLATE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)template\b[^>]*?(/?)>").unwrap());

static SCRIPT_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<script\b([^>]*)>").unwrap());

static LANG_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\blang\s*=\s*["']([^"']+)["']"#).unwrap());

/// A slice of a component file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub content: String,
    /// 1-based line of the first content byte within the file.
    pub start_line: usize,
    /// Byte offset of the first content byte within the file.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRegion {
    pub region: Region,
    pub dialect: ScriptDialect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegions {
    pub template: Option<Region>,
    pub script: Option<ScriptRegion>,
}

pub fn split_component(source: &str) -> ComponentRegions {
    ComponentRegions {
        template: find_template(source),
        script: find_script(source),
    }
}

/// The outermost `<template>` block. Nested template tags are balanced.
fn find_template(source: &str) -> Option<Region> {
    let mut depth = 0usize;
    let mut content_start = None;

    for caps in TEMPLATE_TAG_REGEX.captures_iter(source) {
        let tag = caps.get(0)?;
        let closing = !caps[1].is_empty();
        let self_closing = !caps[2].is_empty();

        if self_closing {
            continue;
        }
        if closing {
            if depth == 0 {
                continue;
            }
            depth -= 1;
            if depth == 0 {
                let start = content_start?;
                return Some(region(source, start, tag.start()));
            }
        } else {
            if depth == 0 {
                content_start = Some(tag.end());
            }
            depth += 1;
        }
    }

    None
}

/// The first `<script>` block with its `lang` attribute.
fn find_script(source: &str) -> Option<ScriptRegion> {
    let caps = SCRIPT_OPEN_REGEX.captures(source)?;
    let open = caps.get(0)?;
    let lang = LANG_ATTR_REGEX
        .captures(&caps[1])
        .map(|lang| lang[1].to_string());

    let start = open.end();
    let end = start + source[start..].find("</script>")?;

    Some(ScriptRegion {
        region: region(source, start, end),
        dialect: ScriptDialect::from_lang(lang.as_deref()),
    })
}

fn region(source: &str, start: usize, end: usize) -> Region {
    Region {
        content: source[start..end].to_string(),
        start_line: line_of_offset(source, start),
        offset: start,
    }
}
