//! Load config use case.

use std::path::PathBuf;

use tplkit_domain::Config;

use crate::ports::{ConfigError, ConfigRepository, LoadedConfig};

/// Input for loading the configuration.
#[derive(Debug, Clone)]
pub struct LoadConfigInput {
    /// Path to the main configuration file.
    pub path: PathBuf,
}

/// Use case for loading the merged configuration.
pub struct LoadConfig<R: ConfigRepository> {
    config_repo: R,
}

impl<R: ConfigRepository> LoadConfig<R> {
    /// Creates a new `LoadConfig` use case.
    #[must_use]
    pub const fn new(config_repo: R) -> Self {
        Self { config_repo }
    }

    /// Loads the main file, its additional configs and the local file.
    ///
    /// When the main file does not exist yet, the starter config is written
    /// to its path. A failed write is logged and loading still succeeds.
    ///
    /// # Errors
    /// - Returns error if a present file cannot be read
    /// - Returns error if YAML parsing fails
    /// - Returns error if an additional config pattern is not a valid glob
    pub async fn execute(&self, input: LoadConfigInput) -> Result<LoadedConfig, ConfigError> {
        let loaded = self.config_repo.load(&input.path).await?;
        if loaded.starter {
            match self.config_repo.save(&input.path, &Config::starter()).await {
                Ok(()) => tracing::info!(
                    file = %input.path.display(),
                    "wrote starter configuration"
                ),
                Err(e) => tracing::warn!(
                    file = %input.path.display(),
                    error = %e,
                    "could not save starter configuration"
                ),
            }
        }
        tracing::info!(
            files = loaded.sources.len(),
            snippets = loaded.config.snippets.len(),
            "configuration loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use tplkit_domain::{Config, Snippet};

    struct MockRepository {
        files: Mutex<HashMap<PathBuf, Config>>,
        read_only: bool,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                files: Mutex::new(HashMap::new()),
                read_only: false,
            }
        }

        fn read_only() -> Self {
            Self {
                read_only: true,
                ..Self::new()
            }
        }

        fn stored(&self, path: &str) -> Option<Config> {
            let files = self.files.lock().expect("Lock poisoned");
            files.get(Path::new(path)).cloned()
        }
    }

    #[async_trait]
    impl ConfigRepository for MockRepository {
        async fn load(&self, path: &Path) -> Result<LoadedConfig, ConfigError> {
            let files = self.files.lock().expect("Lock poisoned");
            if path.as_os_str() == "/unreadable.yaml" {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: "permission denied".to_string(),
                });
            }
            Ok(files.get(path).cloned().map_or_else(
                || LoadedConfig {
                    config: Config::starter(),
                    starter: true,
                    ..LoadedConfig::default()
                },
                |config| LoadedConfig {
                    config,
                    sources: vec![path.to_path_buf()],
                    ..LoadedConfig::default()
                },
            ))
        }

        async fn save(&self, path: &Path, config: &Config) -> Result<(), ConfigError> {
            if self.read_only {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: "read-only file system".to_string(),
                });
            }
            let mut files = self.files.lock().expect("Lock poisoned");
            files.insert(path.to_path_buf(), config.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_config_success() {
        let repo = MockRepository::new();
        let mut config = Config::default();
        config
            .snippets
            .insert("hello".to_string(), Snippet::new("hello", "echo hello"));
        repo.save(Path::new("/cfg/config.yaml"), &config)
            .await
            .expect("save");

        let use_case = LoadConfig::new(repo);
        let loaded = use_case
            .execute(LoadConfigInput {
                path: PathBuf::from("/cfg/config.yaml"),
            })
            .await
            .expect("load");

        assert_eq!(loaded.config, config);
        assert_eq!(loaded.sources, vec![PathBuf::from("/cfg/config.yaml")]);
    }

    #[tokio::test]
    async fn test_load_config_error_passes_through() {
        let use_case = LoadConfig::new(MockRepository::new());
        let result = use_case
            .execute(LoadConfigInput {
                path: PathBuf::from("/unreadable.yaml"),
            })
            .await;

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[tokio::test]
    async fn test_missing_main_file_writes_starter() {
        let use_case = LoadConfig::new(MockRepository::new());
        let loaded = use_case
            .execute(LoadConfigInput {
                path: PathBuf::from("/cfg/config.yaml"),
            })
            .await
            .expect("load");

        assert!(loaded.starter);
        assert_eq!(loaded.config, Config::starter());
        assert_eq!(
            use_case.config_repo.stored("/cfg/config.yaml"),
            Some(Config::starter())
        );
    }

    #[tokio::test]
    async fn test_existing_main_file_is_not_rewritten() {
        let repo = MockRepository::new();
        repo.save(Path::new("/cfg/config.yaml"), &Config::default())
            .await
            .expect("save");

        let use_case = LoadConfig::new(repo);
        let loaded = use_case
            .execute(LoadConfigInput {
                path: PathBuf::from("/cfg/config.yaml"),
            })
            .await
            .expect("load");

        assert!(!loaded.starter);
        assert_eq!(
            use_case.config_repo.stored("/cfg/config.yaml"),
            Some(Config::default())
        );
    }

    #[tokio::test]
    async fn test_failed_starter_write_still_loads() {
        let use_case = LoadConfig::new(MockRepository::read_only());
        let loaded = use_case
            .execute(LoadConfigInput {
                path: PathBuf::from("/cfg/config.yaml"),
            })
            .await
            .expect("load");

        assert!(loaded.starter);
        assert_eq!(loaded.config, Config::starter());
        assert_eq!(use_case.config_repo.stored("/cfg/config.yaml"), None);
    }
}
