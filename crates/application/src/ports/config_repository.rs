//! Config repository port
//!
//! Defines the interface for loading and saving the merged configuration.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use tplkit_domain::{Config, ConfigOverwrite};

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// I/O error.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// A file is not valid YAML for the config schema.
    #[error("Failed to parse {path}: {message}")]
    Serialization {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An `additional_configs` entry is not a valid glob pattern.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Glob parser message.
        message: String,
    },
}

/// A merged configuration and where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: Config,

    /// Files that were read, in merge order.
    pub sources: Vec<PathBuf>,

    /// Entries replaced by a later file.
    pub overwrites: Vec<ConfigOverwrite>,

    /// The main file was missing and the starter config stands in for it.
    pub starter: bool,
}

/// Repository trait for configuration persistence.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Loads the main configuration file and everything it pulls in.
    ///
    /// A missing main file is not an error: the starter config is used and
    /// [`LoadedConfig::starter`] is set. Nothing is written.
    ///
    /// # Arguments
    /// * `path` - Path to the main configuration file
    ///
    /// # Errors
    /// Returns an error if a file that exists cannot be read or parsed.
    async fn load(&self, path: &Path) -> Result<LoadedConfig, ConfigError>;

    /// Writes a configuration file, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    async fn save(&self, path: &Path, config: &Config) -> Result<(), ConfigError>;
}
