use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap, Span,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Spans of every leading and trailing comment, sorted by start position.
    pub fn spans(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = self
            .leading
            .values()
            .chain(self.trailing.values())
            .flatten()
            .map(|comment| comment.span)
            .collect();
        spans.sort_by_key(|span| (span.lo, span.hi));
        spans.dedup();
        spans
    }
}

/// Script dialect of a plain file or a component's script block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    #[default]
    JavaScript,
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl ScriptDialect {
    /// Dialect named by a `<script lang="...">` attribute.
    pub fn from_lang(lang: Option<&str>) -> Self {
        match lang.map(str::to_ascii_lowercase).as_deref() {
            Some("ts" | "typescript") => ScriptDialect::TypeScript,
            Some("tsx") => ScriptDialect::Tsx,
            _ => ScriptDialect::JavaScript,
        }
    }

    /// Dialect implied by a file extension, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(ScriptDialect::JavaScript),
            "ts" | "mts" | "cts" => Some(ScriptDialect::TypeScript),
            "tsx" => Some(ScriptDialect::Tsx),
            _ => None,
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            ScriptDialect::JavaScript => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
            ScriptDialect::TypeScript | ScriptDialect::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == ScriptDialect::Tsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

pub struct ParsedScript {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    pub dialect: ScriptDialect,
    start_pos: BytePos,
}

impl ParsedScript {
    /// Byte range of `span` within the parsed source text.
    pub fn range(&self, span: Span) -> Range<usize> {
        let start = (span.lo.0 - self.start_pos.0) as usize;
        let end = (span.hi.0 - self.start_pos.0) as usize;
        start..end
    }

    /// 1-based line of a position within the parsed source text.
    pub fn line(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }
}

/// Parse script source into an AST with comments and positions.
///
/// Every call gets its own SourceMap, so files can be parsed from parallel
/// workers without sharing state.
pub fn parse_script(code: &str, file_path: &str, dialect: ScriptDialect) -> Result<ParsedScript> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Default::default();
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.to_string());

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            dialect.syntax(),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind()))?;

        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedScript {
            module,
            start_pos: source_file.start_pos,
            source_map,
            comments: extracted_comments,
            dialect,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::Spanned;

    #[test]
    fn test_parse_javascript() {
        let code = "const a = '你好';\n// note\nexport default a;";
        let parsed = parse_script(code, "a.js", ScriptDialect::JavaScript).unwrap();
        assert_eq!(parsed.module.body.len(), 2);
        assert_eq!(parsed.comments.spans().len(), 1);
    }

    #[test]
    fn test_parse_typescript() {
        let code = "const a: string = '你好';\nenum E { A = 'x' }";
        let parsed = parse_script(code, "a.ts", ScriptDialect::TypeScript).unwrap();
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn test_parse_tsx() {
        let code = "const a: string = '你好';\nexport const b = <div title={a}>x</div>;";
        let parsed = parse_script(code, "a.tsx", ScriptDialect::Tsx).unwrap();
        assert_eq!(parsed.module.body.len(), 2);
        assert!(parse_script(code, "a.ts", ScriptDialect::TypeScript).is_err());
    }

    #[test]
    fn test_parse_error() {
        let result = parse_script("const = ;", "bad.js", ScriptDialect::JavaScript);
        assert!(result.is_err());
    }

    #[test]
    fn test_range_is_relative_to_source() {
        let code = "let x = 1;\nlet y = 'abc';";
        let parsed = parse_script(code, "a.js", ScriptDialect::JavaScript).unwrap();
        let span = parsed.module.body[1].span();
        let range = parsed.range(span);
        assert_eq!(&code[range], "let y = 'abc';");
        assert_eq!(parsed.line(span.lo), 2);
    }

    #[test]
    fn test_dialect_from_lang() {
        assert_eq!(ScriptDialect::from_lang(Some("ts")), ScriptDialect::TypeScript);
        assert_eq!(ScriptDialect::from_lang(Some("TS")), ScriptDialect::TypeScript);
        assert_eq!(ScriptDialect::from_lang(Some("tsx")), ScriptDialect::Tsx);
        assert_eq!(ScriptDialect::from_lang(None), ScriptDialect::JavaScript);
        assert_eq!(ScriptDialect::from_extension("tsx"), Some(ScriptDialect::Tsx));
        assert_eq!(ScriptDialect::from_extension("vue"), None);
    }
}
