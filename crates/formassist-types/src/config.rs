//! Client configuration types.
//!
//! `ClientConfig` represents the optional `config.toml` in the formassist
//! data directory. All fields have sensible defaults, so an empty or missing
//! file yields a working local setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Greeting appended to a fresh timeline unless overridden.
pub const DEFAULT_GREETING: &str =
    "Hello! Ask about USCIS info or upload documents to fill a form.";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the assistant backend; endpoint paths are appended to it.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Directory filled forms are saved to. `None` means the platform
    /// download directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// First bot message of every session. Empty disables it.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_backend_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            download_dir: None,
            greeting: default_greeting(),
        }
    }
}

impl ClientConfig {
    /// Greeting to seed the timeline with, if any.
    pub fn greeting(&self) -> Option<&str> {
        let trimmed = self.greeting.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.backend_url, "http://localhost:5001");
        assert!(config.download_dir.is_none());
        assert_eq!(config.greeting(), Some(DEFAULT_GREETING));
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
backend_url = "https://forms.example.com/api"
download_dir = "/tmp/forms"
greeting = ""
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend_url, "https://forms.example.com/api");
        assert_eq!(config.download_dir, Some(PathBuf::from("/tmp/forms")));
        assert_eq!(config.greeting(), None);
    }
}
