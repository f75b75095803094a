//! Variable resolution module
//!
//! Binds snippet variables to `<name>` placeholders and produces the final
//! command.
//!
//! # Usage
//!
//! ```
//! use std::collections::HashMap;
//! use tplkit_application::variable_resolver::SnippetResolver;
//! use tplkit_domain::{Config, Snippet, Transform, Variable};
//!
//! let snippet = Snippet::new("get-pods", "kubectl get pods <namespace>").with_variable(
//!     Variable::new("namespace").with_transform(
//!         Transform::pattern(r#"{{if eq .Value "all"}}-A{{else}}-n {{.Value}}{{end}}"#),
//!     ),
//! );
//! let config = Config::default();
//! let resolver = SnippetResolver::new(&config);
//!
//! let values = HashMap::from([("namespace".to_string(), "all".to_string())]);
//! let result = resolver.resolve(&snippet, &values).unwrap();
//! assert_eq!(result.command, "kubectl get pods -A");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{
    ResolutionResult, ResolvedVariable, SnippetResolver, ValueSource, resolve_command,
};
pub use parser::{
    PlaceholderReference, extract_placeholder_names, has_placeholders, is_valid_placeholder_name,
    parse_placeholders,
};
