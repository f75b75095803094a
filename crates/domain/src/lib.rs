//! TplKit Domain - Core snippet types
//!
//! This crate defines the domain model for TplKit: snippets, their
//! variables, reusable transforms and variable types, and the merged
//! configuration that holds them.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod snippet;
pub mod variable;

pub use config::{
    Config, ConfigOverwrite, InteractiveSettings, OverwriteKind, Settings, TransformTemplate,
    VariableType,
};
pub use snippet::{Snippet, SnippetSource};
pub use variable::{Transform, Validation, Variable, VariableKind};
