//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelf_commerce::cart::DEFAULT_PROFILE;
use shelf_commerce::sections::SectionRules;
use shelf_observability::LogSettings;

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "SHELF_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_ANON_KEY: &str = "SHELF_ANON_KEY";
/// Environment variable overriding `backend.access_token`.
pub const ENV_ACCESS_TOKEN: &str = "SHELF_ACCESS_TOKEN";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Hosted backend connection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Local storage for the cart and session.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LogSettings,

    /// Storefront section rules.
    #[serde(default)]
    pub sections: SectionRules,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, picking the format from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Apply `SHELF_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend.url = Some(url);
        }
        if let Some(key) = get(ENV_ANON_KEY) {
            self.backend.anon_key = Some(key);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.backend.access_token = Some(token);
        }
    }

    /// Every problem with the config, empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(url) = &self.backend.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push(format!("backend.url must start with http:// or https://: {}", url));
            }
            if !self.backend.offline && self.backend.anon_key.is_none() {
                problems.push("backend.anon_key is required when backend.url is set".to_string());
            }
        }
        if self.backend.storage_bucket.trim().is_empty() {
            problems.push("backend.storage_bucket must not be empty".to_string());
        }
        if self.storage.profile.trim().is_empty() {
            problems.push("storage.profile must not be empty".to_string());
        }
        if self.sections.limit == 0 {
            problems.push("sections.limit must be at least 1".to_string());
        }

        problems
    }
}

/// Hosted backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL. Without one the CLI runs offline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public anonymous API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Session token to use instead of the stored one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Bucket for listing images (default: book-images).
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,

    /// Use the local in-memory backend even when a URL is set.
    #[serde(default)]
    pub offline: bool,
}

fn default_bucket() -> String {
    "book-images".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            access_token: None,
            storage_bucket: default_bucket(),
            offline: false,
        }
    }
}

impl BackendConfig {
    /// Whether commands run against the local in-memory backend.
    pub fn is_offline(&self) -> bool {
        self.offline || self.url.is_none()
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage directory (default: ~/.local/share/shelf).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Cart profile name.
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            profile: default_profile(),
        }
    }
}

/// Generate a default shelf.toml config file.
pub fn generate_default_config() -> String {
    r#"# Shelf storefront configuration

[backend]
# Leave url unset to run offline against local storage.
# url = "https://your-project.example.co"
# anon_key = "public-anon-key"
storage_bucket = "book-images"
offline = false

[storage]
# dir = "~/.local/share/shelf"
profile = "default"

[logging]
level = "warn"
format = "human"

[sections]
series = ["Harry Potter", "Toy Story", "Cars"]
authors = ["J.K. Rowling", "Agatha Christie", "Stephen King", "Nicholas Sparks", "Margaret Atwood"]
limit = 8
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_observability::{LogFormat, LogLevel};

    #[test]
    fn test_default_config_round_trips() {
        let config = CliConfig::parse("shelf.toml", &generate_default_config()).unwrap();
        assert!(config.backend.is_offline());
        assert_eq!(config.backend.storage_bucket, "book-images");
        assert_eq!(config.storage.profile, "default");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.sections, SectionRules::default());
        assert!(config.problems().is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::parse("shelf.toml", "").unwrap();
        assert_eq!(config.backend.storage_bucket, "book-images");
        assert_eq!(config.sections.limit, 8);
        assert!(config.backend.is_offline());
    }

    #[test]
    fn test_parse_json() {
        let config = CliConfig::parse(
            "shelf.json",
            r#"{"backend": {"url": "https://x.example.co", "anon_key": "k"},
                "logging": {"level": "debug", "format": "json"}}"#,
        )
        .unwrap();
        assert!(!config.backend.is_offline());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_offline_flag_wins_over_url() {
        let config = CliConfig::parse(
            "shelf.toml",
            "[backend]\nurl = \"https://x.example.co\"\noffline = true\n",
        )
        .unwrap();
        assert!(config.backend.is_offline());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config.apply_overrides(|key| match key {
            ENV_BACKEND_URL => Some("https://env.example.co".to_string()),
            ENV_ANON_KEY => Some("anon".to_string()),
            ENV_ACCESS_TOKEN => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.backend.url.as_deref(), Some("https://env.example.co"));
        assert_eq!(config.backend.anon_key.as_deref(), Some("anon"));
        assert_eq!(config.backend.access_token, None);
    }

    #[test]
    fn test_problems() {
        let mut config = CliConfig::default();
        config.backend.url = Some("ftp://nope".to_string());
        config.sections.limit = 0;
        let problems = config.problems();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("http://"));
        assert!(problems[1].contains("anon_key"));
        assert!(problems[2].contains("sections.limit"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.storage.profile = "work".to_string();
        config.save(path).unwrap();

        let loaded = CliConfig::load(path).unwrap();
        assert_eq!(loaded.storage.profile, "work");
    }
}
