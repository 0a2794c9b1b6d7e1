//! Textual scanner for component templates.
//!
//! Text nodes are the spans between a `>` and the next `<`. Attribute values
//! from the configured whitelist are scanned separately.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::occurrence::{Candidate, OccurrenceKind, RegionKind, Site, bind_expressions};
use super::{ExtractSettings, RegionScan};
use crate::core::parsers::Region;
use crate::issues::{SkipReason, SkipRecord};
use crate::utils::line_of_offset;

static TEXT_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([^<]*)<").unwrap());

static INTERPOLATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap());

static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'[^'\n]*'|"[^"\n]*""#).unwrap());

static SIMPLE_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
});

/// Replace every `<!-- ... -->` with spaces, keeping byte offsets and newlines.
pub fn blank_html_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        let end = rest[start + 4..]
            .find("-->")
            .map(|e| start + 4 + e + 3)
            .unwrap_or(rest.len());
        for c in rest[start..end].chars() {
            if c == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
        }
        rest = &rest[end..];
    }
    out.push_str(rest);

    out
}

pub fn scan_template(region: &Region, file: &str, settings: &ExtractSettings) -> RegionScan {
    let scanner = TemplateScanner {
        region,
        file,
        settings,
        source: blank_html_comments(&region.content),
    };

    let mut scan = RegionScan::default();
    let attributes = scanner.scan_attributes();

    for caps in TEXT_SPAN_REGEX.captures_iter(&scanner.source) {
        let Some(inner) = caps.get(1) else { continue };
        if !settings.detector.contains(inner.as_str()) {
            continue;
        }
        scanner.scan_text(inner.start(), inner.as_str(), &mut scan);
    }

    // A `>` inside an attribute value can open a bogus text span over a
    // whitelisted attribute; the attribute scan owns that text.
    scan.candidates.retain(|c| {
        !attributes
            .iter()
            .any(|a| c.span.start < a.span.end && a.span.start < c.span.end)
    });
    scan.candidates.extend(attributes);

    scan
}

struct TemplateScanner<'a> {
    region: &'a Region,
    file: &'a str,
    settings: &'a ExtractSettings,
    /// Region content with comments blanked.
    source: String,
}

impl TemplateScanner<'_> {
    fn scan_text(&self, start: usize, text: &str, scan: &mut RegionScan) {
        let trimmed = text.trim();
        let start = start + (text.len() - text.trim_start().len());

        if trimmed.contains("{{") && trimmed.contains("}}") {
            self.scan_interpolated(start, trimmed, scan);
        } else if trimmed.contains('>') {
            self.push_runs(start, trimmed, scan);
        } else {
            let range = start..start + trimmed.len();
            scan.candidates.push(self.plain(
                range,
                Site::Text,
                trimmed.to_string(),
                trimmed.to_string(),
            ));
        }
    }

    fn scan_interpolated(&self, start: usize, text: &str, scan: &mut RegionScan) {
        let bodies: Vec<(Range<usize>, &str)> = INTERPOLATION_REGEX
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
            .collect();

        if bodies
            .iter()
            .any(|(_, body)| body.contains('?') && body.contains(':'))
        {
            self.scan_ternary_branches(start, text, &bodies, scan);
            return;
        }

        let expressions: Vec<&str> = bodies.iter().map(|(_, body)| body.trim()).collect();
        if expressions.iter().any(|e| !SIMPLE_PATH_REGEX.is_match(e)) {
            let skip = SkipRecord {
                file: self.file.to_string(),
                line: self.line(start),
                text: text.to_string(),
                reason: SkipReason::ComplexInterpolation,
            };
            tracing::debug!(file = self.file, line = skip.line, text, "complex interpolation skipped");
            scan.skips.push(skip);
            return;
        }

        let captured = bind_expressions(expressions);
        let mut normalized = String::with_capacity(text.len());
        let mut last = 0;
        for ((range, _), binding) in bodies.iter().zip(&captured) {
            normalized.push_str(&text[last..range.start]);
            normalized.push('{');
            normalized.push_str(&binding.label);
            normalized.push('}');
            last = range.end;
        }
        normalized.push_str(&text[last..]);

        scan.candidates.push(Candidate {
            region: RegionKind::Template,
            line: self.line(start),
            site: Site::Text,
            span: self.absolute(start..start + text.len()),
            kind: OccurrenceKind::Interpolated,
            text: normalized,
            raw_text: text.to_string(),
            captured,
        });
    }

    /// Each quoted target-script branch becomes its own plain occurrence, and
    /// so does every run of text around the interpolations.
    fn scan_ternary_branches(
        &self,
        start: usize,
        text: &str,
        bodies: &[(Range<usize>, &str)],
        scan: &mut RegionScan,
    ) {
        let mut last = 0;
        for (range, _) in bodies {
            self.push_runs(start + last, &text[last..range.start], scan);
            last = range.end;
            let body_start = range.start;
            for quoted in QUOTED_REGEX.find_iter(&text[range.clone()]) {
                let raw = quoted.as_str();
                let inner = &raw[1..raw.len() - 1];
                if !self.settings.detector.contains(inner) {
                    continue;
                }
                let at = start + body_start + quoted.start();
                scan.candidates.push(self.plain(
                    at..at + raw.len(),
                    Site::TernaryBranch,
                    inner.to_string(),
                    raw.to_string(),
                ));
            }
        }
        self.push_runs(start + last, &text[last..], scan);
    }

    fn push_runs(&self, start: usize, text: &str, scan: &mut RegionScan) {
        for run in self.settings.detector.runs(text) {
            let raw = &text[run.clone()];
            scan.candidates.push(self.plain(
                start + run.start..start + run.end,
                Site::Run,
                raw.to_string(),
                raw.to_string(),
            ));
        }
    }

    fn scan_attributes(&self) -> Vec<Candidate> {
        let Some(regex) = &self.settings.attribute_regex else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for caps in regex.captures_iter(&self.source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
                continue;
            };
            if !self.settings.detector.contains(value.as_str()) {
                continue;
            }

            let range = name.start()..whole.end();
            candidates.push(self.plain(
                range.clone(),
                Site::Attribute {
                    name: name.as_str().to_string(),
                },
                value.as_str().to_string(),
                self.region.content[range].to_string(),
            ));
        }
        candidates
    }

    fn plain(&self, range: Range<usize>, site: Site, text: String, raw_text: String) -> Candidate {
        Candidate {
            region: RegionKind::Template,
            line: self.line(range.start),
            site,
            span: self.absolute(range),
            kind: OccurrenceKind::Plain,
            text,
            raw_text,
            captured: Vec::new(),
        }
    }

    fn line(&self, offset: usize) -> usize {
        self.region.start_line + line_of_offset(&self.region.content, offset) - 1
    }

    fn absolute(&self, range: Range<usize>) -> Range<usize> {
        self.region.offset + range.start..self.region.offset + range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region(content: &str) -> Region {
        Region {
            content: content.to_string(),
            start_line: 1,
            offset: 0,
        }
    }

    fn scan(content: &str) -> RegionScan {
        scan_template(&region(content), "App.vue", &ExtractSettings::default())
    }

    fn texts(scan: &RegionScan) -> Vec<&str> {
        scan.candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_plain_text_node() {
        let content = "<div>\n  <span> 你好 </span>\n</div>";
        let result = scan(content);

        assert_eq!(texts(&result), vec!["你好"]);
        let candidate = &result.candidates[0];
        assert_eq!(candidate.site, Site::Text);
        assert_eq!(candidate.line, 2);
        assert_eq!(&content[candidate.span.clone()], "你好");
    }

    #[test]
    fn test_html_comment_is_ignored() {
        let content = "<div><!-- <span>注释</span> --><p>正文</p></div>";
        let result = scan(content);
        assert_eq!(texts(&result), vec!["正文"]);
    }

    #[test]
    fn test_blank_html_comments_keeps_offsets() {
        let source = "a<!--中\n文-->b";
        let blanked = blank_html_comments(source);
        assert_eq!(blanked.len(), source.len());
        assert!(blanked.starts_with('a') && blanked.ends_with('b'));
        assert_eq!(blanked.matches('\n').count(), 1);
    }

    #[test]
    fn test_interpolated_text() {
        let content = "<p>欢迎 {{ user.name }}，共 {{count}} 条</p>";
        let result = scan(content);

        assert_eq!(texts(&result), vec!["欢迎 {name}，共 {count} 条"]);
        let candidate = &result.candidates[0];
        assert_eq!(candidate.kind, OccurrenceKind::Interpolated);
        assert_eq!(candidate.raw_text, "欢迎 {{ user.name }}，共 {{count}} 条");
        assert_eq!(candidate.captured[0].expression, "user.name");
        assert_eq!(candidate.captured[0].label, "name");
        assert_eq!(candidate.captured[1].label, "count");
    }

    #[test]
    fn test_ternary_branches_are_independent() {
        let content = "<span>{{ ok ? '成功' : '失败' }}</span>";
        let result = scan(content);

        assert_eq!(texts(&result), vec!["成功", "失败"]);
        for candidate in &result.candidates {
            assert_eq!(candidate.site, Site::TernaryBranch);
            assert_eq!(candidate.kind, OccurrenceKind::Plain);
        }
        assert_eq!(&content[result.candidates[0].span.clone()], "'成功'");
    }

    #[test]
    fn test_text_around_ternary_is_kept() {
        let content = "<p>状态：{{ ok ? '成功' : '失败' }} 完成</p>";
        let result = scan(content);

        assert_eq!(texts(&result), vec!["状态", "成功", "失败", "完成"]);
        let first = &result.candidates[0];
        assert_eq!(first.site, Site::Run);
        assert_eq!(&content[first.span.clone()], "状态");
        assert_eq!(result.candidates[3].site, Site::Run);
        assert!(result.skips.is_empty());
    }

    #[test]
    fn test_complex_interpolation_is_abandoned() {
        let result = scan("<p>合计 {{ price * count }}</p>");
        assert!(result.candidates.is_empty());
        assert_eq!(result.skips.len(), 1);
        assert_eq!(result.skips[0].reason, SkipReason::ComplexInterpolation);
    }

    #[test]
    fn test_mixed_markup_falls_back_to_runs() {
        let content = r#"<div :class="a > b">标题<b"#;
        let result = scan(content);
        assert_eq!(texts(&result), vec!["标题"]);
        assert_eq!(result.candidates[0].site, Site::Run);
        assert_eq!(&content[result.candidates[0].span.clone()], "标题");
    }

    #[test]
    fn test_whitelisted_attributes() {
        let content = r#"<el-input placeholder="请输入名称" :title="t" label='标签' id="名字"/>"#;
        let result = scan(content);

        assert_eq!(texts(&result), vec!["请输入名称", "标签"]);
        let candidate = &result.candidates[0];
        assert_eq!(
            candidate.site,
            Site::Attribute {
                name: "placeholder".to_string()
            }
        );
        assert_eq!(&content[candidate.span.clone()], r#"placeholder="请输入名称""#);
    }

    #[test]
    fn test_region_offsets_are_file_absolute() {
        let file = "<template>\n  <b>好的</b>\n</template>";
        let region = Region {
            content: file[10..file.len() - 11].to_string(),
            start_line: 1,
            offset: 10,
        };
        let result = scan_template(&region, "App.vue", &ExtractSettings::default());
        let candidate = &result.candidates[0];
        assert_eq!(&file[candidate.span.clone()], "好的");
        assert_eq!(candidate.line, 2);
    }

    #[test]
    fn test_rewritten_template_has_no_candidates() {
        let result = scan(r#"<span>{{ $t('Common.text1') }}</span><input :placeholder="$t('A.b')">"#);
        assert!(result.candidates.is_empty());
        assert!(result.skips.is_empty());
    }
}
