//! Project context shared by every command.
//!
//! Resolves the configured directories against the project root once, so
//! stages never join config strings themselves.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{CONFIG_SOURCE_FILES, Config, load_config};
use crate::core::error::PipelineError;
use crate::core::extract::ExtractSettings;
use crate::core::file_scanner::{ScanResult, scan_files};

pub struct ProjectContext {
    pub root: PathBuf,
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ProjectContext {
    /// Load the config found from `start_dir` upward.
    ///
    /// Relative paths in the config resolve against the config file's
    /// directory, or against `start_dir` when running on defaults.
    pub fn load(start_dir: &Path) -> Result<Self> {
        let loaded = load_config(start_dir).map_err(|e| PipelineError::InvalidConfig {
            message: format!("{:#}", e),
        })?;
        let root = loaded
            .path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(start_dir)
            .to_path_buf();

        Ok(Self {
            root,
            config: loaded.config,
            config_path: loaded.path,
        })
    }

    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            root,
            config,
            config_path: None,
        }
    }

    pub fn resolve(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        let path = path.strip_prefix("./").unwrap_or(path);
        if path.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    pub fn source_root(&self) -> PathBuf {
        self.resolve(&self.config.target_root)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir)
    }

    /// Root of the generated locale tree, `<outputDir>/lang`.
    pub fn lang_dir(&self) -> PathBuf {
        self.output_dir().join("lang")
    }

    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        self.lang_dir().join(locale.to_lowercase())
    }

    pub fn template_path(&self) -> PathBuf {
        self.output_dir().join("translation-template.txt")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.resolve(&self.config.backup_dir)
    }

    pub fn extract_settings(&self) -> ExtractSettings {
        ExtractSettings::from_config(&self.config)
    }

    pub fn scan(&self) -> ScanResult {
        scan_files(
            &self.root,
            &self.source_root(),
            &self.config,
            &[self.output_dir(), self.backup_dir()],
        )
    }

    /// Files that must never be rewritten: build configs and generated output.
    pub fn is_protected(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        if CONFIG_SOURCE_FILES.contains(&file_name) {
            return true;
        }
        self.root.join(relative).starts_with(self.output_dir())
    }
}
