//! # pokeglyph configuration
//!
//! Configuration sources (in priority order):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables (`POKEGLYPH_SECTION__KEY`)
//! 3. Config file (`--config` or ~/.config/pokeglyph/config.toml)
//! 4. Defaults

use anyhow::bail;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "POKEGLYPH_";

/// Default manifest location
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/msikma/pokesprite/master/data/pokemon.json";

/// Default sprite base, holding `regular/` and `shiny/`
pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://github.com/msikma/pokesprite/raw/master/pokemon-gen8";

/// Placeholder sprite file name under the sprite base
pub const UNKNOWN_SPRITE: &str = "unknown.png";

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "pokeglyph", "pokeglyph")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config/pokeglyph"))
}

/// Default config file path
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote manifest and sprites
    pub source: SourceConfig,
    /// Icon output
    pub output: OutputConfig,
    /// Run behavior
    pub run: RunConfig,
}

/// Remote resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON manifest of all entities
    pub manifest_url: String,
    /// Base URL holding one folder per variant
    pub sprite_base_url: String,
    /// Placeholder sprite URL (unset = `<sprite_base_url>/unknown.png`)
    pub unknown_url: Option<String>,
    /// User agent sent with every request (unset = client default)
    pub user_agent: Option<String>,
    /// Request timeout in seconds (unset = client default)
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            unknown_url: None,
            user_agent: None,
            timeout_secs: None,
        }
    }
}

impl SourceConfig {
    /// Placeholder URL, following the sprite base unless set explicitly
    pub fn unknown_url(&self) -> String {
        self.unknown_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}",
                self.sprite_base_url.trim_end_matches('/'),
                UNKNOWN_SPRITE
            )
        })
    }
}

/// Where icons go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Icon store root
    pub dir: PathBuf,
    /// Skip icons that already exist
    pub resume: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/icons"),
            resume: true,
        }
    }
}

/// Run behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Only process the first N catalog entries
    pub limit: Option<usize>,
    /// Stop on the first sprite failure instead of skipping it
    pub fail_fast: bool,
}

impl Config {
    /// Build the layered figment. `path` overrides the default file location.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration. An explicit `path` must exist; the default file
    /// is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            tracing::debug!("Loading config from {}", path.display());
        }
        Ok(Self::figment(path).extract()?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
