//! Configuration loader for Mnemo.
//!
//! Reads `config.toml` from the data directory (`~/.mnemo/` by default)
//! and deserializes it into [`MemoryConfig`]. Falls back to defaults
//! when the file is missing or malformed. Credentials never live in the
//! file; they come from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use mnemo_types::config::MemoryConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`MemoryConfig::default()`]
///   (offline mode).
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
pub async fn load_config(data_dir: &Path) -> MemoryConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return MemoryConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return MemoryConfig::default();
        }
    };

    match toml::from_str::<MemoryConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            MemoryConfig::default()
        }
    }
}

/// The data directory: `MNEMO_DATA_DIR`, falling back to `~/.mnemo`.
pub fn data_dir() -> PathBuf {
    match std::env::var("MNEMO_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".mnemo")
        }
    }
}

/// Where the local fallback database lives: `{data_dir}/mnemo.db`.
pub fn local_database_path() -> PathBuf {
    data_dir().join("mnemo.db")
}

/// OpenAI API key from the environment, if present.
pub fn openai_api_key() -> Option<SecretString> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

/// Remote database URL: `MNEMO_DATABASE_URL`, falling back to
/// `DATABASE_URL`.
pub fn remote_database_url() -> Option<String> {
    std::env::var("MNEMO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
}
