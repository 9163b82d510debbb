//! Language preference CLI command.

use anyhow::Result;
use console::style;

use vaultbot_types::credential::ChatId;

use crate::state::AppState;

/// Print the language of a chat, or set it first when `lang` is given.
///
/// Uses the strict vault calls so storage failures reach the operator
/// instead of being replaced by the default language.
pub async fn lang(state: &AppState, chat_id: ChatId, lang: Option<&str>, json: bool) -> Result<()> {
    if let Some(lang) = lang {
        state.vault.try_set_lang(chat_id, lang).await?;
    }

    let current = state.vault.try_get_lang(chat_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"chat_id": chat_id, "lang": current, "updated": lang.is_some()})
        );
    } else if lang.is_some() {
        println!(
            "  {} Language for chat {} set to {}",
            style("✓").green().bold(),
            style(chat_id).cyan(),
            style(&current).bold()
        );
    } else {
        println!("  Chat {} uses {}", style(chat_id).cyan(), style(&current).bold());
    }

    Ok(())
}
