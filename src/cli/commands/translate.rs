use anyhow::Result;

use super::helper::load_context;
use super::{CommandKind, CommandResult, CommandSummary};
use crate::cli::args::TranslateCommand;
use crate::core::emit::emit_target_locale;

pub fn translate(cmd: TranslateCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let lang = cmd.lang.trim();
    if lang.is_empty() || lang.contains(['/', '\\']) {
        anyhow::bail!("Invalid language code: \"{}\"", cmd.lang);
    }
    if lang.eq_ignore_ascii_case(&ctx.config.default_locale) {
        anyhow::bail!(
            "\"{}\" is the default locale; its resources come from `extract`",
            lang
        );
    }

    let output = emit_target_locale(&ctx, lang)?;
    Ok(CommandResult::new(
        CommandKind::Translate,
        CommandSummary::Translate(output),
    ))
}
