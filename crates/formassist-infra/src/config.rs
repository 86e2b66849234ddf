//! Client configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.formassist/` unless
//! `FORMASSIST_DATA_DIR` says otherwise). A missing file yields defaults; a
//! file that exists but cannot be read or parsed is an error.

use std::path::{Path, PathBuf};

use formassist_types::config::ClientConfig;
use formassist_types::error::ConfigError;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FORMASSIST_DATA_DIR";

/// Environment variable overriding `backend_url`.
pub const BACKEND_URL_ENV: &str = "FORMASSIST_BACKEND_URL";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FORMASSIST_DATA_DIR` environment variable
/// 2. `~/.formassist`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".formassist");
    }

    PathBuf::from(".formassist")
}

/// Load `{data_dir}/config.toml`, then apply environment overrides.
pub async fn load_client_config(data_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let config = read_config_file(data_dir).await?;
    Ok(apply_backend_override(
        config,
        std::env::var(BACKEND_URL_ENV).ok(),
    ))
}

async fn read_config_file(data_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Ok(ClientConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<ClientConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        message: err.to_string(),
    })
}

/// Replace `backend_url` when an override is set and non-blank.
pub fn apply_backend_override(mut config: ClientConfig, url: Option<String>) -> ClientConfig {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!(backend_url = %url, "backend URL overridden");
        config.backend_url = url.trim().to_string();
    }
    config
}

/// Directory filled forms are saved to.
///
/// Priority: explicit override, then `download_dir` from config, then the
/// platform download directory, then the current directory.
pub fn resolve_download_dir(config: &ClientConfig, override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = &config.download_dir {
        return dir.clone();
    }
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formassist_types::config::DEFAULT_GREETING;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(tmp.path()).await.unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.greeting(), Some(DEFAULT_GREETING));
    }

    #[tokio::test]
    async fn load_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
backend_url = "http://forms.internal:8080/api"
download_dir = "/srv/forms"
greeting = ""
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(tmp.path()).await.unwrap();
        assert_eq!(config.backend_url, "http://forms.internal:8080/api");
        assert_eq!(config.download_dir, Some(PathBuf::from("/srv/forms")));
        assert_eq!(config.greeting(), None);
    }

    #[tokio::test]
    async fn load_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "backend_url = [not valid")
            .await
            .unwrap();

        let err = read_config_file(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn backend_override_replaces_url() {
        let config = apply_backend_override(
            ClientConfig::default(),
            Some(" http://10.0.0.5:5001 ".to_string()),
        );
        assert_eq!(config.backend_url, "http://10.0.0.5:5001");
    }

    #[test]
    fn blank_backend_override_is_ignored() {
        let config = apply_backend_override(ClientConfig::default(), Some("  ".to_string()));
        assert_eq!(config.backend_url, "http://localhost:5001");
        let config = apply_backend_override(ClientConfig::default(), None);
        assert_eq!(config.backend_url, "http://localhost:5001");
    }

    #[test]
    fn download_dir_priority() {
        let config = ClientConfig {
            download_dir: Some(PathBuf::from("/from/config")),
            ..ClientConfig::default()
        };
        assert_eq!(
            resolve_download_dir(&config, Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_download_dir(&config, None),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn resolve_data_dir_from_env() {
        // SAFETY: This test is the only one touching this variable and restores it immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-formassist");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-formassist"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
