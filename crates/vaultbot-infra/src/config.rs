//! Configuration loader for vaultbot.
//!
//! Reads `vaultbot.toml` from the data directory (`~/.vaultbot/` by default)
//! and layers `VAULTBOT_*` environment variables on top. The encryption key
//! never comes from the file.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use vaultbot_types::config::VaultConfig;
use vaultbot_types::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "vaultbot.toml";

pub const ENV_DATA_DIR: &str = "VAULTBOT_DATA_DIR";
pub const ENV_DB_TYPE: &str = "VAULTBOT_DB_TYPE";
pub const ENV_DB_URL: &str = "VAULTBOT_DB_URL";
pub const ENV_DEFAULT_LANGUAGE: &str = "VAULTBOT_DEFAULT_LANGUAGE";
pub const ENV_ENCRYPTION_KEY: &str = "VAULTBOT_ENCRYPTION_KEY";

/// Resolve the data directory.
///
/// Priority: `VAULTBOT_DATA_DIR`, then `~/.vaultbot`, then `./.vaultbot`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".vaultbot");
    }

    PathBuf::from(".vaultbot")
}

/// Load configuration from `{data_dir}/vaultbot.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or malformed file: error.
pub async fn load_config(data_dir: &Path) -> Result<VaultConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE_NAME} found at {}, using defaults", config_path.display());
            return Ok(VaultConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    toml::from_str::<VaultConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.message().to_string(),
    })
}

/// Apply `VAULTBOT_DB_TYPE`, `VAULTBOT_DB_URL` and `VAULTBOT_DEFAULT_LANGUAGE`
/// from the process environment.
pub fn apply_env_overrides(config: &mut VaultConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary lookup. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut VaultConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(kind) = lookup(ENV_DB_TYPE) {
        config.database.kind = kind.parse()?;
    }
    if let Some(url) = lookup(ENV_DB_URL) {
        config.database.url = Some(url);
    }
    if let Some(lang) = lookup(ENV_DEFAULT_LANGUAGE) {
        config.default_language = lang.trim().to_string();
    }

    Ok(())
}

/// Load the file and apply environment overrides in one step.
pub async fn load_effective_config(data_dir: &Path) -> Result<VaultConfig, ConfigError> {
    let mut config = load_config(data_dir).await?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Read the encryption key from `VAULTBOT_ENCRYPTION_KEY`.
pub fn encryption_key_from_env() -> Result<SecretString, ConfigError> {
    match std::env::var(ENV_ENCRYPTION_KEY) {
        Ok(key) if !key.is_empty() => Ok(SecretString::from(key)),
        _ => Err(ConfigError::MissingEncryptionKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use vaultbot_types::config::DatabaseKind;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config.default_language, "en");
        assert_eq!(config.database.kind, DatabaseKind::Sqlite);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
default_language = "ru"

[database]
kind = "postgres"
url = "postgres://bot@localhost/vault"
max_connections = 4
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config.default_language, "ru");
        assert_eq!(config.database.kind, DatabaseKind::Postgres);
        assert_eq!(config.database.url.as_deref(), Some("postgres://bot@localhost/vault"));
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.acquire_timeout_secs, 5);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_unknown_kind_is_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[database]\nkind = \"mysql\"\n",
        )
        .await
        .unwrap();

        assert!(load_config(tmp.path()).await.is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = VaultConfig::default();
        apply_overrides(
            &mut config,
            env(&[
                (ENV_DB_TYPE, "PostgreSQL"),
                (ENV_DB_URL, "postgres://x/y"),
                (ENV_DEFAULT_LANGUAGE, " pt "),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.kind, DatabaseKind::Postgres);
        assert_eq!(config.database.url.as_deref(), Some("postgres://x/y"));
        assert_eq!(config.default_language, "pt");
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut config = VaultConfig::default();
        apply_overrides(&mut config, env(&[(ENV_DB_URL, ""), (ENV_DEFAULT_LANGUAGE, "  ")])).unwrap();

        assert!(config.database.url.is_none());
        assert_eq!(config.default_language, "en");
    }

    #[test]
    fn unknown_db_type_override_is_error() {
        let mut config = VaultConfig::default();
        let err = apply_overrides(&mut config, env(&[(ENV_DB_TYPE, "oracle")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDatabase(name) if name == "oracle"));
    }

    #[test]
    fn resolve_data_dir_is_never_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }
}
