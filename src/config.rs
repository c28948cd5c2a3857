//! # Configuration Module
//!
//! Data directory layout and the tunables of a ranking run.
//!
//! ## Data Storage
//!
//! Tasteradio keeps its files in the platform-standard data directory:
//! - Linux: `~/.local/share/tasteradio/`
//! - macOS: `~/Library/Application Support/tasteradio/`
//! - Windows: `%APPDATA%\tasteradio\`
//!
//! | file           | contents                                |
//! |----------------|-----------------------------------------|
//! | `catalog.db`   | analyzed library (`tracks` table)       |
//! | `profile.json` | taste profile                           |
//! | `config.json`  | optional [`RadioConfig`] overrides      |
//!
//! ## Precedence
//!
//! Built-in defaults < `config.json` < environment variables < command-line
//! flags. The last two are handled by clap in [`crate::cli`].

use crate::normalize::ClampPolicy;
use crate::scorer::{ScoringContext, DEFAULT_GENRE_WEIGHT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the platform-appropriate data directory for Tasteradio,
/// creating it when missing.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The tasteradio subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let app_dir = data_dir.join("tasteradio");
    fs::create_dir_all(&app_dir)
        .with_context(|| format!(
            "Failed to create Tasteradio data directory at {}. Please check file permissions.",
            app_dir.display()
        ))?;

    Ok(app_dir)
}

/// Default location of the catalog database.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.db"))
}

/// Default location of the taste profile.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_profile_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("profile.json"))
}

/// Default location of the configuration file.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("config.json"))
}

/// Length of the printed "radio" playlist.
pub const DEFAULT_TOP_K: usize = 50;

/// Tunables for a ranking run.
///
/// Every field is optional in `config.json`; absent fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Catalog database, `None` for the data-directory default
    pub catalog_path: Option<PathBuf>,
    /// Taste profile, `None` for the data-directory default
    pub profile_path: Option<PathBuf>,
    /// How much genre affinity offsets numeric distance (`0` disables it)
    pub genre_weight: f64,
    /// Number of tracks shown in the playlist view
    pub top_k: usize,
    /// Out-of-range handling during normalization
    pub clamp: ClampPolicy,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            profile_path: None,
            genre_weight: DEFAULT_GENRE_WEIGHT,
            top_k: DEFAULT_TOP_K,
            clamp: ClampPolicy::Clamp,
        }
    }
}

impl RadioConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Catalog path, falling back to the data directory.
    ///
    /// # Errors
    ///
    /// See [`get_catalog_path`].
    pub fn catalog_path(&self) -> Result<PathBuf> {
        self.catalog_path.clone().map_or_else(get_catalog_path, Ok)
    }

    /// Profile path, falling back to the data directory.
    ///
    /// # Errors
    ///
    /// See [`get_profile_path`].
    pub fn profile_path(&self) -> Result<PathBuf> {
        self.profile_path.clone().map_or_else(get_profile_path, Ok)
    }

    /// Validated scoring parameters.
    ///
    /// # Errors
    ///
    /// Fails if `genre_weight` is negative or not finite.
    pub fn scoring_context(&self) -> Result<ScoringContext> {
        ScoringContext::new(self.genre_weight, self.clamp).context("Invalid scoring configuration")
    }
}
