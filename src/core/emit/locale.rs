use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::js_module::{read_module_file, render_module};
use super::template::{Lookup, TranslationTemplate};
use crate::core::keys::ResourceTree;
use crate::utils::{capitalize, decapitalize};

/// Why a target-locale value was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationGap {
    /// Phrase is in the template with a blank translation.
    Empty,
    /// Phrase is absent from the template.
    Missing,
}

impl std::fmt::Display for TranslationGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationGap::Empty => write!(f, "empty"),
            TranslationGap::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTranslation {
    pub key: String,
    pub phrase: String,
    pub gap: TranslationGap,
}

impl MissingTranslation {
    pub fn module(&self) -> &str {
        self.key.split('.').next().unwrap_or(&self.key)
    }
}

/// File name of a module: the module name with a lower-cased first letter.
pub fn module_file_name(module: &str) -> String {
    format!("{}.js", decapitalize(module))
}

/// Write one resource module per top-level module of `tree`.
pub fn write_locale(dir: &Path, tree: &ResourceTree) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut written: Vec<PathBuf> = Vec::new();
    for (module, content) in tree.modules() {
        let path = dir.join(module_file_name(module));
        if written.contains(&path) {
            anyhow::bail!(
                "Module \"{}\" would overwrite {}; module names differ only in case",
                module,
                path.display()
            );
        }
        fs::write(&path, render_module(content))
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Read every module of a locale directory. A missing directory is an empty tree.
pub fn read_locale(dir: &Path) -> Result<ResourceTree> {
    let mut tree = ResourceTree::new();
    if !dir.is_dir() {
        return Ok(tree);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "js"))
        .collect();
    paths.sort();

    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(content) = read_module_file(&path)? {
            tree.set_module(&capitalize(stem), Value::Object(content));
        }
    }
    Ok(tree)
}

/// Apply the filled template to the default tree, recording every gap.
pub fn translate_tree(
    tree: &ResourceTree,
    template: &TranslationTemplate,
) -> (ResourceTree, Vec<MissingTranslation>) {
    let mut missing = Vec::new();
    let translated = tree.map_texts(|key, phrase| {
        let gap = match template.lookup(phrase) {
            Lookup::Translated(translation) => return translation.to_string(),
            Lookup::Empty => TranslationGap::Empty,
            Lookup::Missing => TranslationGap::Missing,
        };
        missing.push(MissingTranslation {
            key: key.to_string(),
            phrase: phrase.to_string(),
            gap,
        });
        String::new()
    });
    (translated, missing)
}

/// Markdown report of untranslated phrases, grouped by module.
pub fn render_missing_report(lang: &str, missing: &[MissingTranslation]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Missing translations: {}\n", lang);
    let _ = writeln!(out, "Total: {}\n", missing.len());

    let mut current_module: Option<&str> = None;
    for entry in missing {
        if current_module != Some(entry.module()) {
            current_module = Some(entry.module());
            let _ = writeln!(out, "## {}\n", entry.module());
        }
        let _ = writeln!(
            out,
            "- `{}`: {} ({})",
            entry.key,
            entry.phrase.replace('\n', "\\n"),
            entry.gap
        );
    }
    out
}

/// vue-i18n bootstrap that loads `./<locale>/<module>.js` for every locale.
pub fn render_bootstrap(default_locale: &str) -> String {
    format!(
        r#"import Vue from 'vue';
import VueI18n from 'vue-i18n';

Vue.use(VueI18n);

const context = require.context('./', true, /^\.\/[^/]+\/[^/]+\.js$/);

const messages = {{}};
context.keys().forEach(key => {{
  const [, locale, file] = key.match(/^\.\/([^/]+)\/([^/]+)\.js$/);
  const moduleName = file.charAt(0).toUpperCase() + file.slice(1);
  messages[locale] = messages[locale] || {{}};
  messages[locale][moduleName] = context(key).default;
}});

const i18n = new VueI18n({{
  locale: '{locale}',
  fallbackLocale: '{locale}',
  messages,
}});

export default i18n;
"#,
        locale = default_locale.to_lowercase()
    )
}

/// Write the bootstrap unless one exists. Returns whether it was written.
pub fn write_bootstrap(lang_dir: &Path, default_locale: &str) -> Result<bool> {
    let path = lang_dir.join("index.js");
    if path.exists() {
        return Ok(false);
    }
    fs::create_dir_all(lang_dir)
        .with_context(|| format!("Failed to create directory: {}", lang_dir.display()))?;
    fs::write(&path, render_bootstrap(default_locale))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(true)
}
