//! TplKit Application - Resolution engine, use cases and ports
//!
//! This crate defines the application layer with:
//! - The snippet resolution engine (transforms, computed values, validation)
//! - The sandboxed expression language used by value patterns and compose rules
//! - Port traits (interfaces for external dependencies)
//! - Use case orchestration

pub mod computed;
pub mod error;
pub mod expression;
pub mod ports;
pub mod transform;
pub mod use_cases;
pub mod validation;
pub mod variable_resolver;

pub use error::{ResolveError, ValidationError};
pub use expression::{Expression, ExpressionError};
pub use ports::{ConfigError, ConfigRepository, FileSystem, FileSystemError, LoadedConfig};
pub use use_cases::{
    CheckIssue, CheckSnippets, ListSnippets, ListSnippetsInput, LoadConfig, LoadConfigInput,
    ProcessError, ProcessSnippet, ProcessSnippetInput, ProcessSnippetOutput, SearchSnippets,
    SnippetEntry, SnippetReport,
};
pub use variable_resolver::{
    ResolutionResult, ResolvedVariable, SnippetResolver, ValueSource, resolve_command,
};
