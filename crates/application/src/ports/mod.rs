//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod config_repository;
mod file_system;

pub use config_repository::{ConfigError, ConfigRepository, LoadedConfig};
pub use file_system::{FileSystem, FileSystemError};
