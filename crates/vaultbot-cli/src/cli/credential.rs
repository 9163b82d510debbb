//! Credential CLI commands: save, get, delete.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use vaultbot_types::credential::ChatId;
use vaultbot_types::error::VaultError;

use crate::state::AppState;

/// Mask a secret for display, keeping at most the first and last two chars.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}****{tail}")
}

/// Save a credential, prompting for the password with hidden input when not given.
///
/// # Examples
///
/// ```bash
/// # Secure prompt (recommended)
/// vaultbot save 42 github alice
///
/// # Script/automation mode
/// vaultbot save 42 github alice --password 'p@ss'
/// ```
pub async fn save_credential(
    state: &AppState,
    chat_id: ChatId,
    service: &str,
    login: &str,
    password: Option<&str>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => Password::new()
            .with_prompt(format!("Password for {}", style(service).bold()))
            .interact()?,
    };

    state.vault.save(chat_id, service, login, &password).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"saved": true, "chat_id": chat_id, "service": service})
        );
    } else {
        println!(
            "  {} Saved '{}' for chat {}",
            style("✓").green().bold(),
            style(service).bold(),
            style(chat_id).cyan()
        );
    }

    Ok(())
}

pub async fn get_credential(
    state: &AppState,
    chat_id: ChatId,
    service: &str,
    reveal: bool,
    json: bool,
) -> Result<()> {
    let credential = match state.vault.get(chat_id, service).await {
        Ok(credential) => credential,
        Err(VaultError::NotFound) => return report_missing(chat_id, service, json),
        Err(err) => return Err(err.into()),
    };

    let password = if reveal {
        credential.password.clone()
    } else {
        mask_secret(&credential.password)
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "found": true,
                "chat_id": chat_id,
                "service": service,
                "login": credential.login,
                "password": password,
            }))?
        );
    } else {
        println!();
        println!("  {} {}", style("Service").dim(), style(service).bold());
        println!("  {}   {}", style("Login").dim(), style(&credential.login).cyan());
        println!("  {} {}", style("Password").dim(), password);
        println!();
    }

    Ok(())
}

pub async fn delete_credential(
    state: &AppState,
    chat_id: ChatId,
    service: &str,
    json: bool,
) -> Result<()> {
    match state.vault.delete(chat_id, service).await {
        Ok(()) => {}
        Err(VaultError::NotFound) => return report_missing(chat_id, service, json),
        Err(err) => return Err(err.into()),
    }

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "chat_id": chat_id, "service": service})
        );
    } else {
        println!(
            "  {} Deleted '{}' for chat {}",
            style("✓").green().bold(),
            style(service).bold(),
            style(chat_id).cyan()
        );
    }

    Ok(())
}

fn report_missing(chat_id: ChatId, service: &str, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({"found": false, "chat_id": chat_id, "service": service})
        );
    } else {
        println!(
            "  {} No credential stored for '{}' in chat {}",
            style("i").blue().bold(),
            style(service).bold(),
            style(chat_id).cyan()
        );
    }
    Ok(())
}
