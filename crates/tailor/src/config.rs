//! User configuration loaded from `config.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tailor_core::diff::DEFAULT_MAX_REFINE_CELLS;
use tailor_core::generate::{DEFAULT_API_URL, DEFAULT_MODEL};
use tailor_core::{
    DiffEngine, Generator, GeneratorKind, LocalGenerator, RemoteGenerator, PLACEHOLDER,
};
use tracing::{debug, info};

/// Environment variable consulted when `generate.api_key` is empty
pub const API_KEY_ENV: &str = "TAILOR_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub diff: DiffConfig,
    pub generate: GenerateConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Refine replaced words character by character
    pub refine_chars: bool,
    /// Skip refinement for replacements whose table would be larger than this
    pub max_refine_cells: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            refine_chars: true,
            max_refine_cells: DEFAULT_MAX_REFINE_CELLS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub backend: GeneratorKind,
    pub placeholder: String,
    pub api_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorKind::Local,
            placeholder: PLACEHOLDER.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store location; the platform data dir is used when unset
    pub path: Option<PathBuf>,
}

impl Config {
    /// `<config dir>/tailor/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tailor").join("config.toml"))
    }

    /// Load from `path`, or the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            debug!("No config directory, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!("Config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn engine(&self) -> DiffEngine {
        DiffEngine::new()
            .with_char_refinement(self.diff.refine_chars)
            .with_max_refine_cells(self.diff.max_refine_cells)
    }

    /// The configured API key, falling back to the environment
    fn api_key(&self) -> String {
        if !self.generate.api_key.is_empty() {
            return self.generate.api_key.clone();
        }
        std::env::var(API_KEY_ENV).unwrap_or_default()
    }

    pub fn generator(&self) -> Box<dyn Generator> {
        let settings = &self.generate;
        match settings.backend {
            GeneratorKind::Local => Box::new(LocalGenerator::new(settings.placeholder.clone())),
            GeneratorKind::Remote => Box::new(
                RemoteGenerator::new(
                    settings.model.clone(),
                    settings.api_url.clone(),
                    self.api_key(),
                )
                .with_placeholder(settings.placeholder.clone()),
            ),
        }
    }
}
