//! Source Adapter.
//!
//! Wraps the two source dialects behind one contract:
//! - `component`: `.vue` files split into template and script regions
//! - `script`: plain JS/TS parsed into an swc AST with comments and positions

pub mod component;
pub mod script;

use std::path::Path;

use anyhow::Result;

pub use component::{ComponentRegions, Region, ScriptRegion, split_component};
pub use script::{ExtractedComments, ParsedScript, ScriptDialect, parse_script};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Component,
    Script(ScriptDialect),
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext == "vue" {
            return Some(FileKind::Component);
        }
        ScriptDialect::from_extension(ext).map(FileKind::Script)
    }
}

pub enum ParsedUnit {
    Component(ComponentRegions),
    Script(ParsedScript),
}

/// Parse raw source of the given kind.
///
/// Component files never fail here: a missing region is simply absent and
/// the script region is parsed later by the Extractor. Plain script files
/// fail with the parser's diagnostic.
pub fn parse(content: &str, file_path: &str, kind: FileKind) -> Result<ParsedUnit> {
    match kind {
        FileKind::Component => Ok(ParsedUnit::Component(split_component(content))),
        FileKind::Script(dialect) => {
            parse_script(content, file_path, dialect).map(ParsedUnit::Script)
        }
    }
}
