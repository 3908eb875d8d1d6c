//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shelf_cache::Cache;
use shelf_commerce::backend::{BackendService, MemoryBackend, MemorySnapshot};
use shelf_commerce::cart::CartStore;
use shelf_commerce::catalog::{aggregate, Catalog};
use shelf_data::{RestBackend, RestConfig};

use crate::config::CliConfig;
use crate::output::Output;

/// Storage key of the offline backend's state.
pub const OFFLINE_STATE_KEY: &str = "backend:offline";
/// Storage key of the hosted session token.
pub const SESSION_KEY: &str = "session:token";

/// The backend commands run against.
pub enum Backend {
    /// Hosted REST service.
    Rest(RestBackend),
    /// Local in-memory backend, persisted between runs.
    Memory(MemoryBackend),
}

impl Backend {
    pub fn service(&self) -> &dyn BackendService {
        match self {
            Backend::Rest(rest) => rest,
            Backend::Memory(memory) => memory,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Backend::Memory(_))
    }
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Local storage for the cart, session and offline state.
    pub cache: Cache,
    /// Backend for remote operations.
    pub backend: Backend,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let mut config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };
        config.apply_env();

        let data_dir = match &config.storage.dir {
            Some(dir) => resolve_path(&cwd, dir),
            None => dirs_path().join("shelf"),
        };
        let cache = Cache::open_dir(&data_dir)
            .with_context(|| format!("Failed to open storage at {}", data_dir.display()))?;
        output.debug(&format!("Storage: {}", data_dir.display()));

        let backend = open_backend(&config, &cache)?;
        if backend.is_offline() {
            output.debug("Backend: offline");
        }

        Ok(Self {
            config,
            output,
            cwd,
            cache,
            backend,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["shelf.toml", ".shelf.toml", "shelf.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// The backend as a trait object.
    pub fn service(&self) -> &dyn BackendService {
        self.backend.service()
    }

    /// Open the cart for the configured profile.
    pub fn cart(&self) -> CartStore {
        CartStore::open(self.cache.clone(), &self.config.storage.profile)
    }

    /// Fetch the storefront catalog behind a spinner.
    pub async fn catalog(&self) -> Catalog {
        let spinner = self.output.spinner("Loading catalog...");
        let catalog = aggregate(self.service()).await;
        spinner.finish_and_clear();
        self.output.debug(&format!("Catalog: {} book(s)", catalog.len()));
        catalog
    }

    /// Remember or forget the hosted session token.
    pub fn store_session(&self, token: Option<&str>) -> Result<()> {
        match token {
            Some(token) => self.cache.set(SESSION_KEY, &token)?,
            None => self.cache.delete(SESSION_KEY)?,
        }
        Ok(())
    }

    /// Save the offline backend's state. No-op when online.
    pub fn persist(&self) -> Result<()> {
        if let Backend::Memory(memory) = &self.backend {
            let snapshot = memory.snapshot()?;
            self.cache.set(OFFLINE_STATE_KEY, &snapshot)?;
        }
        Ok(())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve_path(&self.cwd, path)
    }
}

fn open_backend(config: &CliConfig, cache: &Cache) -> Result<Backend> {
    let backend = &config.backend;
    let url = match &backend.url {
        Some(url) if !backend.offline => url.clone(),
        _ => {
            let snapshot = match cache.get::<MemorySnapshot>(OFFLINE_STATE_KEY) {
                Ok(snapshot) => snapshot.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(error = %e, "offline state unreadable, starting fresh");
                    MemorySnapshot::default()
                }
            };
            return Ok(Backend::Memory(MemoryBackend::from_snapshot(snapshot)));
        }
    };

    let anon_key = backend
        .anon_key
        .clone()
        .context("backend.anon_key is required when backend.url is set")?;
    let access_token = match &backend.access_token {
        Some(token) => Some(token.clone()),
        None => cache.get::<String>(SESSION_KEY).unwrap_or_default(),
    };

    let rest = RestBackend::new(RestConfig {
        url,
        anon_key,
        access_token,
        storage_bucket: backend.storage_bucket.clone(),
    })
    .context("Invalid backend configuration")?;
    Ok(Backend::Rest(rest))
}

fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    if PathBuf::from(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_commerce::account::User;

    #[test]
    fn test_no_url_opens_offline_backend() {
        let cache = Cache::open_memory();
        let backend = open_backend(&CliConfig::default(), &cache).unwrap();
        assert!(backend.is_offline());
    }

    #[test]
    fn test_url_without_key_is_rejected() {
        let mut config = CliConfig::default();
        config.backend.url = Some("https://x.example.co".to_string());
        let err = open_backend(&config, &Cache::open_memory()).err().unwrap();
        assert!(err.to_string().contains("anon_key"));
    }

    #[test]
    fn test_rest_backend_uses_stored_session() {
        let cache = Cache::open_memory();
        cache.set(SESSION_KEY, &"stored-token").unwrap();

        let mut config = CliConfig::default();
        config.backend.url = Some("https://x.example.co".to_string());
        config.backend.anon_key = Some("anon".to_string());

        match open_backend(&config, &cache).unwrap() {
            Backend::Rest(rest) => {
                assert_eq!(rest.access_token().as_deref(), Some("stored-token"))
            }
            Backend::Memory(_) => panic!("expected rest backend"),
        }
    }

    #[tokio::test]
    async fn test_offline_state_restored() {
        let cache = Cache::open_memory();
        let memory = MemoryBackend::new().signed_in(User::new("reader@example.com", None));
        cache
            .set(OFFLINE_STATE_KEY, &memory.snapshot().unwrap())
            .unwrap();

        let backend = open_backend(&CliConfig::default(), &cache).unwrap();
        let user = backend.service().current_user().await.unwrap();
        assert_eq!(user.unwrap().id.as_str(), "reader@example.com");
    }

    #[test]
    fn test_resolve_path() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_path(cwd, "data"), PathBuf::from("/work/data"));
        assert_eq!(resolve_path(cwd, "/abs"), PathBuf::from("/abs"));
    }
}
