//! Snippet resolution engine
//!
//! Turns a snippet command and a map of raw values into the final command.

use std::collections::HashMap;

use tplkit_domain::{Config, Snippet, Variable};

use super::parser::extract_placeholder_names;
use crate::computed::{compose_rule, evaluate_computed};
use crate::error::ResolveError;
use crate::transform::{apply_transform, resolve_transform};
use crate::validation::validate_with_config;

/// How a variable's substituted value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The raw value, unchanged.
    Raw,
    /// The variable's default, used for an empty value.
    Default,
    /// The transform's `empty_value`.
    EmptyValue,
    /// The transform's `value_pattern`, rendered.
    Pattern,
    /// A boolean switch's `true_value` or `false_value`.
    Boolean,
    /// A compose rule over the raw values.
    Computed,
    /// Nothing applied; the placeholder is removed.
    Empty,
}

impl ValueSource {
    /// Returns a short label for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Default => "default",
            Self::EmptyValue => "empty_value",
            Self::Pattern => "value_pattern",
            Self::Boolean => "boolean",
            Self::Computed => "computed",
            Self::Empty => "empty",
        }
    }
}

/// A single variable after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// Variable name.
    pub name: String,
    /// Text substituted for `<name>`.
    pub value: String,
    /// Where the text came from.
    pub source: ValueSource,
}

/// Result of resolving a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The final command.
    pub command: String,

    /// Every declared variable in declaration order.
    pub resolved_variables: Vec<ResolvedVariable>,

    /// Placeholders in the command that no variable declares.
    /// They are left in the output verbatim.
    pub unbound: Vec<String>,
}

impl ResolutionResult {
    /// Returns true when every placeholder was bound to a variable.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unbound.is_empty()
    }

    /// Returns the resolved record for a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&ResolvedVariable> {
        self.resolved_variables.iter().find(|v| v.name == name)
    }
}

/// The snippet resolution engine.
///
/// Borrows the configuration and holds no other state, so one resolver can
/// serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct SnippetResolver<'a> {
    config: &'a Config,
}

impl<'a> SnippetResolver<'a> {
    /// Creates a resolver over the given configuration.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolves a snippet, validating every non-computed raw value first.
    ///
    /// Variables are processed in declaration order. The first failure
    /// aborts the resolution and no partial command is returned.
    ///
    /// # Errors
    ///
    /// Returns the first validation, transform or expression error.
    pub fn resolve(
        &self,
        snippet: &Snippet,
        raw_values: &HashMap<String, String>,
    ) -> Result<ResolutionResult, ResolveError> {
        self.run(snippet, raw_values, true)
    }

    /// Resolves a snippet without validation.
    ///
    /// Meant for showing the command while values are still being entered.
    ///
    /// # Errors
    ///
    /// Returns transform and expression errors.
    pub fn preview(
        &self,
        snippet: &Snippet,
        raw_values: &HashMap<String, String>,
    ) -> Result<ResolutionResult, ResolveError> {
        self.run(snippet, raw_values, false)
    }

    fn run(
        &self,
        snippet: &Snippet,
        raw_values: &HashMap<String, String>,
        validate: bool,
    ) -> Result<ResolutionResult, ResolveError> {
        let mut command = snippet.command.clone();
        let mut resolved_variables = Vec::with_capacity(snippet.variables.len());

        for variable in &snippet.variables {
            let raw = raw_values.get(&variable.name).map_or("", String::as_str);

            if validate && !variable.computed {
                validate_with_config(variable, raw, self.config)?;
            }

            let (value, source) = self.resolve_variable(variable, raw, raw_values)?;
            tracing::debug!(
                snippet = %snippet.id,
                variable = %variable.name,
                source = source.as_str(),
                "resolved variable"
            );

            command = command.replace(&variable.placeholder(), &value);
            resolved_variables.push(ResolvedVariable {
                name: variable.name.clone(),
                value,
                source,
            });
        }

        let unbound = extract_placeholder_names(&snippet.command)
            .into_iter()
            .filter(|name| snippet.variable(name).is_none())
            .collect();

        Ok(ResolutionResult {
            command,
            resolved_variables,
            unbound,
        })
    }

    fn resolve_variable(
        &self,
        variable: &Variable,
        raw: &str,
        raw_values: &HashMap<String, String>,
    ) -> Result<(String, ValueSource), ResolveError> {
        let transform = resolve_transform(variable, self.config)?;

        if let Some(compose) = compose_rule(variable, transform) {
            let value = evaluate_computed(variable, compose, raw_values)?;
            return Ok((value, ValueSource::Computed));
        }

        apply_transform(variable, transform, raw)
    }
}

/// Resolves a snippet and returns only the final command.
///
/// # Errors
///
/// See [`SnippetResolver::resolve`].
pub fn resolve_command(
    snippet: &Snippet,
    raw_values: &HashMap<String, String>,
    config: &Config,
) -> Result<String, ResolveError> {
    SnippetResolver::new(config)
        .resolve(snippet, raw_values)
        .map(|result| result.command)
}
