//! Persistence adapters.

mod config_repository;
mod file_system;

pub use config_repository::{
    LOCAL_SNIPPETS_FILE, YamlConfigRepository, default_config_path, expand_pattern,
};
pub use file_system::TokioFileSystem;
