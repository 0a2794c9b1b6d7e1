use std::fs;

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::cli::args::InitCommand;
use crate::config::{CONFIG_FILE_NAME, default_config_json};
use crate::core::error::PipelineError;

pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    let root = &cmd.common.root;
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory: {}", root.display()))?;

    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(PipelineError::ConfigExists { path: config_path }.into());
    }

    fs::write(&config_path, format!("{}\n", default_config_json()?))
        .with_context(|| format!("Failed to write file: {}", config_path.display()))?;
    tracing::info!("created {}", config_path.display());

    Ok(CommandResult::new(
        CommandKind::Init,
        CommandSummary::Init(InitSummary { path: config_path }),
    ))
}
