use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::models::MAX_CANDIDATES;

/// Root application configuration, loaded from `~/.config/shelfscout/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub library_path: String,
}

/// Remote catalog endpoint and request policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub covers_base_url: String,
    pub placeholder_cover_url: String,
    pub timeout_secs: u64,
    pub result_limit: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_candidates: usize,
    pub debounce_ms: u64,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("shelfscout");
        Self {
            library_path: data_dir.to_string_lossy().to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_base_url: "https://covers.openlibrary.org".to_string(),
            placeholder_cover_url: "https://placehold.co/128x192?text=No+Cover".to_string(),
            timeout_secs: 10,
            result_limit: 10,
            user_agent: format!("shelfscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_candidates: MAX_CANDIDATES,
            debounce_ms: 250,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/shelfscout/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("SHELFSCOUT_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("shelfscout")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(ShelfError::ConfigError("catalog.base_url is empty".to_string()));
        }
        if self.catalog.placeholder_cover_url.trim().is_empty() {
            return Err(ShelfError::ConfigError(
                "catalog.placeholder_cover_url is empty".to_string(),
            ));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ShelfError::ConfigError(
                "catalog.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn set_library_path(&mut self, path: PathBuf) {
        self.core.library_path = path.to_string_lossy().to_string();
    }

    /// Path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.core.library_path)
            .join("db")
            .join("shelfscout.db")
    }
}
