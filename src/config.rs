use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::utils::ScriptDetector;

pub const CONFIG_FILE_NAME: &str = ".i18nrc.json";

/// Files that configure the build and must never be rewritten.
pub const CONFIG_SOURCE_FILES: &[&str] = &[
    "vue.config.js",
    "babel.config.js",
    ".eslintrc.js",
    "postcss.config.js",
    "jest.config.js",
    "webpack.config.js",
    "vite.config.js",
    "vite.config.ts",
    "tsconfig.json",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// Built-in phrase dictionary first, content hash otherwise.
    #[default]
    Semantic,
    /// Content hash only.
    Hash,
}

/// Maps files whose path matches `pattern` to the key module `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyPrefixRule {
    pub pattern: String,
    pub prefix: String,
}

/// Spellings of the translation call in each rewrite context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSpellings {
    /// Used inside component templates: `{{ $t('key') }}`.
    #[serde(default = "default_template_call")]
    pub template: String,
    /// Used inside component scripts: `this.$t('key')`.
    #[serde(default = "default_component_call")]
    pub component: String,
    /// Used inside plain script modules: `i18n.t('key')`.
    #[serde(default = "default_module_call")]
    pub module: String,
    /// Binding imported into plain script modules.
    #[serde(default = "default_module_binding")]
    pub module_binding: String,
}

impl Default for CallSpellings {
    fn default() -> Self {
        Self {
            template: default_template_call(),
            component: default_component_call(),
            module: default_module_call(),
            module_binding: default_module_binding(),
        }
    }
}

impl CallSpellings {
    pub fn all(&self) -> [&str; 3] {
        [&self.template, &self.component, &self.module]
    }
}

fn default_template_call() -> String {
    "$t".to_string()
}

fn default_component_call() -> String {
    "this.$t".to_string()
}

fn default_module_call() -> String {
    "i18n.t".to_string()
}

fn default_module_binding() -> String {
    "i18n".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_target_root")]
    pub target_root: String,
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_default_locale")]
    pub default_locale: String,
    #[serde(default = "default_key_mappings")]
    pub key_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub key_prefixes: Vec<KeyPrefixRule>,
    #[serde(default = "default_key_prefix")]
    pub default_key_prefix: String,
    #[serde(default)]
    pub key_strategy: KeyStrategy,
    #[serde(default)]
    pub generate_secondary_locale: bool,
    #[serde(default = "default_secondary_locale")]
    pub secondary_locale: String,
    #[serde(default = "default_import_path")]
    pub import_path: Option<String>,
    #[serde(default = "default_translation_module")]
    pub translation_module: String,
    #[serde(default = "default_backup")]
    pub backup: bool,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default)]
    pub preview: bool,
    #[serde(default = "default_checked_attributes")]
    pub checked_attributes: Vec<String>,
    #[serde(default = "default_diagnostic_objects")]
    pub diagnostic_objects: Vec<String>,
    #[serde(default = "default_route_config_names")]
    pub route_config_names: Vec<String>,
    #[serde(default = "default_target_script")]
    pub target_script: String,
    #[serde(default)]
    pub calls: CallSpellings,
}

fn default_target_root() -> String {
    "./".to_string()
}

fn default_file_extensions() -> Vec<String> {
    [".vue", ".js", ".ts"].map(String::from).to_vec()
}

fn default_exclude_dirs() -> Vec<String> {
    [
        "node_modules",
        "dist",
        ".git",
        "build",
        "public",
        "i18n",
        "locales",
        "lang",
        "output",
    ]
    .map(String::from)
    .to_vec()
}

fn default_exclude_files() -> Vec<String> {
    ["*.min.js", "*.test.js", "*.spec.js"]
        .map(String::from)
        .to_vec()
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn default_default_locale() -> String {
    "zh-cn".to_string()
}

fn default_key_mappings() -> BTreeMap<String, String> {
    [
        ("提交", "Common.submit"),
        ("取消", "Common.cancel"),
        ("确认", "Common.confirm"),
        ("删除", "Common.delete"),
        ("编辑", "Common.edit"),
        ("保存", "Common.save"),
    ]
    .into_iter()
    .map(|(text, key)| (text.to_string(), key.to_string()))
    .collect()
}

fn default_key_prefix() -> String {
    "Common".to_string()
}

fn default_secondary_locale() -> String {
    "en-us".to_string()
}

fn default_import_path() -> Option<String> {
    Some("@/lang".to_string())
}

fn default_translation_module() -> String {
    "src/lang/index.js".to_string()
}

fn default_backup() -> bool {
    true
}

fn default_backup_dir() -> String {
    "./backup".to_string()
}

fn default_checked_attributes() -> Vec<String> {
    ["placeholder", "title", "label", "alt", "value"]
        .map(String::from)
        .to_vec()
}

fn default_diagnostic_objects() -> Vec<String> {
    vec!["console".to_string()]
}

fn default_route_config_names() -> Vec<String> {
    ["routes", "router", "routerConfig"]
        .map(String::from)
        .to_vec()
}

fn default_target_script() -> String {
    "Han".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_root: default_target_root(),
            file_extensions: default_file_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude_files: default_exclude_files(),
            output_dir: default_output_dir(),
            default_locale: default_default_locale(),
            key_mappings: default_key_mappings(),
            key_prefixes: Vec::new(),
            default_key_prefix: default_key_prefix(),
            key_strategy: KeyStrategy::default(),
            generate_secondary_locale: false,
            secondary_locale: default_secondary_locale(),
            import_path: default_import_path(),
            translation_module: default_translation_module(),
            backup: default_backup(),
            backup_dir: default_backup_dir(),
            preview: false,
            checked_attributes: default_checked_attributes(),
            diagnostic_objects: default_diagnostic_objects(),
            route_config_names: default_route_config_names(),
            target_script: default_target_script(),
            calls: CallSpellings::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `excludeFiles` or `keyPrefixes`
    /// is invalid, or if `targetScript` names no known Unicode script.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.exclude_files {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'excludeFiles': \"{}\"", pattern)
            })?;
        }

        for rule in &self.key_prefixes {
            if rule.pattern.contains('*') || rule.pattern.contains('?') {
                Pattern::new(&rule.pattern).with_context(|| {
                    format!("Invalid glob pattern in 'keyPrefixes': \"{}\"", rule.pattern)
                })?;
            }
            if rule.prefix.trim_end_matches('.').is_empty() {
                anyhow::bail!("Empty prefix in 'keyPrefixes' for pattern \"{}\"", rule.pattern);
            }
        }

        if ScriptDetector::from_name(&self.target_script).is_none() {
            anyhow::bail!("Unknown script in 'targetScript': \"{}\"", self.target_script);
        }

        if self.default_key_prefix.trim_end_matches('.').is_empty() {
            anyhow::bail!("'defaultKeyPrefix' must not be empty");
        }

        Ok(())
    }

    pub fn script_detector(&self) -> ScriptDetector {
        ScriptDetector::from_name(&self.target_script).unwrap_or_default()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// True if config was loaded from a file, false if using defaults.
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
