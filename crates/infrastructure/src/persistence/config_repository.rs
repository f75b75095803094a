//! File-based config repository implementation.
//!
//! The merged configuration is assembled from:
//! ```text
//! ~/.config/tplkit/
//!   config.yaml          main file, holds settings
//!   snippets/*.yaml      additional configs matched by settings.additional_configs
//! ./.csnippets           directory-local snippets
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tplkit_application::ports::{
    ConfigError, ConfigRepository, FileSystem, FileSystemError, LoadedConfig,
};
use tplkit_domain::{Config, SnippetSource};

use crate::serialization::{from_yaml, to_yaml};

/// File name of the directory-local snippet file.
pub const LOCAL_SNIPPETS_FILE: &str = ".csnippets";

/// Returns `~/.config/tplkit/config.yaml`, or `None` without a home directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("tplkit").join("config.yaml"))
}

fn to_config_error(path: &Path, e: FileSystemError) -> ConfigError {
    match e {
        FileSystemError::NotFound(path) => ConfigError::NotFound(path),
        other => ConfigError::Io {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// YAML config repository.
///
/// Reads the main file, then every additional config in pattern order, then
/// the local file. Later files replace same-named entries and each
/// replacement is logged.
#[derive(Debug, Clone)]
pub struct YamlConfigRepository<F> {
    fs: F,
    local_file: Option<PathBuf>,
}

impl<F: FileSystem> YamlConfigRepository<F> {
    /// Creates a repository that only reads the main file and its additional configs.
    pub const fn new(fs: F) -> Self {
        Self {
            fs,
            local_file: None,
        }
    }

    /// Also merges the given directory-local snippet file when it exists.
    #[must_use]
    pub fn with_local_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_file = Some(path.into());
        self
    }

    async fn read_config(&self, path: &Path) -> Result<Config, ConfigError> {
        let content = self
            .fs
            .read_file_string(path)
            .await
            .map_err(|e| to_config_error(path, e))?;
        from_yaml(&content).map_err(|e| ConfigError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    async fn merge_file(
        &self,
        loaded: &mut LoadedConfig,
        path: &Path,
        source: SnippetSource,
    ) -> Result<(), ConfigError> {
        let other = self.read_config(path).await?;
        let overwrites = loaded.config.merge(other, source);
        for overwrite in &overwrites {
            tracing::warn!(
                file = %path.display(),
                "{} '{}' overwritten",
                overwrite.kind,
                overwrite.name
            );
        }
        tracing::debug!(file = %path.display(), source = %source, "merged config file");
        loaded.overwrites.extend(overwrites);
        loaded.sources.push(path.to_path_buf());
        Ok(())
    }
}

/// Expands one `additional_configs` entry into concrete paths.
///
/// `~/` is replaced by the home directory and relative patterns are taken
/// relative to `base_dir`. Matches are sorted. A pattern with no matches is
/// returned as a literal path.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidGlob`] if the pattern does not parse.
pub fn expand_pattern(pattern: &str, base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let expanded = match pattern.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map_or_else(|| PathBuf::from(pattern), |h| h.join(rest)),
        None => PathBuf::from(pattern),
    };
    let expanded = if expanded.is_relative() {
        base_dir.join(expanded)
    } else {
        expanded
    };

    let text = expanded.to_string_lossy();
    let entries = glob::glob(&text).map_err(|e| ConfigError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "skipping unreadable match");
                None
            }
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        paths.push(expanded);
    }
    Ok(paths)
}

#[async_trait]
impl<F: FileSystem + Sync> ConfigRepository for YamlConfigRepository<F> {
    async fn load(&self, path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut loaded = LoadedConfig::default();

        if self.fs.exists(path).await {
            loaded.config = self.read_config(path).await?;
            loaded.config.mark_source(SnippetSource::Global);
            loaded.sources.push(path.to_path_buf());
        } else {
            tracing::info!(file = %path.display(), "config file not found, using starter config");
            loaded.config = Config::starter();
            loaded.starter = true;
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let patterns = loaded.config.settings.additional_configs.clone();
        for pattern in &patterns {
            for file in expand_pattern(pattern, base_dir)? {
                if !self.fs.exists(&file).await {
                    tracing::warn!(file = %file.display(), "additional config not found, skipping");
                    continue;
                }
                self.merge_file(&mut loaded, &file, SnippetSource::Global)
                    .await?;
            }
        }

        if let Some(local) = &self.local_file {
            if self.fs.exists(local).await {
                self.merge_file(&mut loaded, local, SnippetSource::Local)
                    .await?;
            }
        }

        Ok(loaded)
    }

    async fn save(&self, path: &Path, config: &Config) -> Result<(), ConfigError> {
        let yaml = to_yaml(config).map_err(|e| ConfigError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.fs
            .write_file(path, yaml.as_bytes())
            .await
            .map_err(|e| to_config_error(path, e))
    }
}
