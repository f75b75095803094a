//! TplKit Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: a tokio-backed file system and the
//! YAML config repository that discovers and merges config files.

pub mod persistence;
pub mod serialization;

pub use persistence::{
    LOCAL_SNIPPETS_FILE, TokioFileSystem, YamlConfigRepository, default_config_path,
    expand_pattern,
};
pub use serialization::{SerializationError, from_yaml, to_yaml};
