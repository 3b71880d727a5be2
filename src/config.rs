//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `<config_dir>/dupepurge/config.toml`)
//! 3. Environment variables prefixed `DUPEPURGE_`
//! 4. Command-line flags ([`Config::apply_cli`])
//!
//! ```toml
//! ignore_suffixes = [".swp", ".tmp"]
//! io_threads = 2
//! strict_delete = false
//! use_trash = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPEPURGE_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value parsed but is out of range.
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filename suffixes excluded from scanning.
    pub ignore_suffixes: Vec<String>,
    /// Hashing threads per signature group.
    pub io_threads: usize,
    /// Fail the run when a removal fails.
    pub strict_delete: bool,
    /// Move files to the system trash instead of unlinking.
    pub use_trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_suffixes: Vec::new(),
            io_threads: 4,
            strict_delete: false,
            use_trash: false,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults on any error.
    ///
    /// `path` overrides the platform config file. A missing file is not an
    /// error; a malformed one is logged and ignored.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load the configuration from all layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provider fails or a value is invalid.
    pub fn try_load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "io_threads",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupepurge", "dupepurge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded layers.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if !cli.ignore_suffixes.is_empty() {
            self.ignore_suffixes.clone_from(&cli.ignore_suffixes);
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads as usize;
        }
        self.strict_delete |= cli.strict;
        self.use_trash |= cli.trash;
    }
}
