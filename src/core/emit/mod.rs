//! Resource Emitter.
//!
//! - `js_module`: resource module files, written and read back as data
//! - `locale`: per-locale module sets, bootstrap and missing report
//! - `template`: the flat translation template

pub mod js_module;
pub mod locale;
pub mod template;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use locale::{MissingTranslation, TranslationGap, read_locale, translate_tree, write_locale};
pub use template::{Lookup, TranslationTemplate};

use crate::core::context::ProjectContext;
use crate::core::error::PipelineError;
use crate::core::keys::ResourceTree;

/// Files written for the default locale.
#[derive(Debug, Default)]
pub struct DefaultLocaleOutput {
    pub modules: Vec<PathBuf>,
    pub template_path: PathBuf,
    pub bootstrap_written: bool,
}

/// Files written for one target locale.
#[derive(Debug)]
pub struct TargetLocaleOutput {
    pub lang: String,
    pub modules: Vec<PathBuf>,
    pub missing: Vec<MissingTranslation>,
    pub report_path: Option<PathBuf>,
}

impl TargetLocaleOutput {
    pub fn count(&self, gap: TranslationGap) -> usize {
        self.missing.iter().filter(|m| m.gap == gap).count()
    }
}

/// Write the default-locale modules, the bootstrap and the merged template.
pub fn emit_default_locale(ctx: &ProjectContext, tree: &ResourceTree) -> Result<DefaultLocaleOutput> {
    let modules = write_locale(&ctx.locale_dir(&ctx.config.default_locale), tree)?;
    let bootstrap_written = locale::write_bootstrap(&ctx.lang_dir(), &ctx.config.default_locale)?;
    let template_path = emit_template(ctx, tree)?;

    tracing::info!(
        modules = modules.len(),
        template = %template_path.display(),
        "default locale written"
    );
    Ok(DefaultLocaleOutput {
        modules,
        template_path,
        bootstrap_written,
    })
}

/// Regenerate the translation template, keeping every existing translation.
pub fn emit_template(ctx: &ProjectContext, tree: &ResourceTree) -> Result<PathBuf> {
    let path = ctx.template_path();
    let mut template = TranslationTemplate::from_tree(tree);
    if path.exists() {
        template.merge_previous(&TranslationTemplate::read(&path)?);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, template.render())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(path)
}

/// Build the `lang` locale from the default locale and the filled template.
pub fn emit_target_locale(ctx: &ProjectContext, lang: &str) -> Result<TargetLocaleOutput> {
    let default_dir = ctx.locale_dir(&ctx.config.default_locale);
    let tree = read_locale(&default_dir)?;
    if tree.is_empty() {
        return Err(PipelineError::MissingArtifact {
            artifact: "default locale resources",
            dir: default_dir,
            producer: "extract",
        }
        .into());
    }

    let template_path = ctx.template_path();
    if !template_path.exists() {
        return Err(PipelineError::MissingArtifact {
            artifact: "translation template",
            dir: ctx.output_dir(),
            producer: "extract",
        }
        .into());
    }
    let template = TranslationTemplate::read(&template_path)?;

    let (translated, missing) = translate_tree(&tree, &template);
    let modules = write_locale(&ctx.locale_dir(lang), &translated)?;

    let report_path = if missing.is_empty() {
        None
    } else {
        let path = ctx
            .output_dir()
            .join(format!("missing-translations-{}.md", lang.to_lowercase()));
        fs::write(&path, locale::render_missing_report(lang, &missing))
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Some(path)
    };

    tracing::info!(
        lang,
        modules = modules.len(),
        missing = missing.len(),
        "target locale written"
    );
    Ok(TargetLocaleOutput {
        lang: lang.to_lowercase(),
        modules,
        missing,
        report_path,
    })
}
