//! Extractor.
//!
//! Finds every span of embedded target-script text in a file:
//! - `template`: textual scan of a component's markup
//! - `script`: AST traversal of script blocks and plain script files
//! - `extractor`: per-file driver and the parallel project-wide pass

pub mod extractor;
pub mod occurrence;
pub mod script;
pub mod template;

use regex::Regex;

pub use extractor::{ExtractionResult, FileExtraction, extract_files, extract_source};
pub use occurrence::{
    Candidate, CapturedExpression, LiteralOccurrence, OccurrenceKind, RegionKind, Site,
};

use crate::config::Config;
use crate::issues::SkipRecord;
use crate::utils::ScriptDetector;

/// Extraction knobs taken from the config.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub detector: ScriptDetector,
    /// Compiled matcher for the whitelisted template attributes.
    pub attribute_regex: Option<Regex>,
    pub diagnostic_objects: Vec<String>,
    /// Lower-cased names of bindings that hold route configuration.
    pub route_config_names: Vec<String>,
}

impl ExtractSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            detector: config.script_detector(),
            attribute_regex: attribute_regex(&config.checked_attributes),
            diagnostic_objects: config.diagnostic_objects.clone(),
            route_config_names: config
                .route_config_names
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
        }
    }

    pub fn is_route_config_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.route_config_names.iter().any(|n| *n == name)
    }

    pub fn is_diagnostic_object(&self, name: &str) -> bool {
        self.diagnostic_objects.iter().any(|n| n == name)
    }
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// `name="value"` or `name='value'` for any whitelisted name, not bound with `:`.
fn attribute_regex(names: &[String]) -> Option<Regex> {
    if names.is_empty() {
        return None;
    }
    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r#"(?:^|\s)({})\s*=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#,
        alternation
    ))
    .ok()
}

/// Candidates and skips found in one region.
#[derive(Debug, Default)]
pub struct RegionScan {
    pub candidates: Vec<Candidate>,
    pub skips: Vec<SkipRecord>,
}

impl RegionScan {
    pub fn merge(&mut self, other: RegionScan) {
        self.candidates.extend(other.candidates);
        self.skips.extend(other.skips);
    }
}
