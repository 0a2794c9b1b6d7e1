//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: Write a default `.i18nrc.json`
//! - `extract`: Collect Chinese literals, assign keys, emit the default locale
//! - `rewrite` (alias `replace`): Replace extracted literals with translation calls
//! - `translate <lang>`: Build a target locale from the translation template
//! - `validate`: Report Chinese text still left in the sources

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        self.common().is_some_and(|common| common.verbose)
    }

    pub fn common(&self) -> Option<&CommonArgs> {
        match &self.command {
            Some(Command::Init(cmd)) => Some(&cmd.common),
            Some(Command::Extract(cmd)) => Some(&cmd.common),
            Some(Command::Rewrite(cmd)) => Some(&cmd.common),
            Some(Command::Translate(cmd)) => Some(&cmd.common),
            Some(Command::Validate(cmd)) => Some(&cmd.common),
            None => None,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root; the config file is searched from here upward
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct RewriteCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show every substitution without writing any file
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    /// Target language code, e.g. en-us
    pub lang: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .i18nrc.json configuration file
    Init(InitCommand),
    /// Extract Chinese text into locale resources and an extraction snapshot
    Extract(ExtractCommand),
    /// Replace extracted text with translation calls
    #[command(alias = "replace")]
    Rewrite(RewriteCommand),
    /// Generate a target locale from the translation template
    Translate(TranslateCommand),
    /// Scan sources for Chinese text that is not translated
    Validate(ValidateCommand),
}
