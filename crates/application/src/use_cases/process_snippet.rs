//! Process snippet use case.
//!
//! Collects the raw values for a snippet and resolves it into a command.

use std::collections::HashMap;

use tplkit_domain::{Config, Snippet, Variable};

use crate::error::ResolveError;
use crate::variable_resolver::{ResolutionResult, SnippetResolver};

/// Errors from processing a snippet.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// No snippet with the given name.
    #[error("snippet '{0}' not found")]
    SnippetNotFound(String),

    /// A supplied value names no variable of the snippet.
    #[error("snippet '{snippet}' has no variable named '{variable}'")]
    UnknownVariable {
        /// Snippet name.
        snippet: String,
        /// Supplied variable name.
        variable: String,
    },

    /// A supplied value names a computed variable, which takes no input.
    #[error("variable '{variable}' of snippet '{snippet}' is computed and cannot be set")]
    ComputedVariable {
        /// Snippet name.
        snippet: String,
        /// Supplied variable name.
        variable: String,
    },

    /// Resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Input for processing a snippet.
#[derive(Debug, Clone, Default)]
pub struct ProcessSnippetInput {
    /// Snippet name.
    pub name: String,
    /// Values supplied by the user, by variable name.
    pub values: HashMap<String, String>,
    /// Skip validation and render what is there.
    pub preview: bool,
}

/// Output from processing a snippet.
#[derive(Debug, Clone)]
pub struct ProcessSnippetOutput {
    /// The raw values after defaults were filled in.
    pub raw_values: HashMap<String, String>,
    /// The resolution result.
    pub result: ResolutionResult,
}

/// Use case for turning a snippet and user input into a command.
pub struct ProcessSnippet<'a> {
    config: &'a Config,
}

impl<'a> ProcessSnippet<'a> {
    /// Creates a new `ProcessSnippet` use case.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Looks up the snippet, fills in defaults and resolves it.
    ///
    /// A value that is not supplied falls back to the variable default, then
    /// to the default of its variable type. Computed variables never get a
    /// raw value.
    ///
    /// # Errors
    /// - Returns error if the snippet does not exist
    /// - Returns error if a supplied name matches no variable
    /// - Returns error if a supplied name is a computed variable
    /// - Returns error if resolution fails
    pub fn execute(&self, input: ProcessSnippetInput) -> Result<ProcessSnippetOutput, ProcessError> {
        let snippet = self
            .config
            .snippet(&input.name)
            .ok_or_else(|| ProcessError::SnippetNotFound(input.name.clone()))?;

        let mut supplied: Vec<&String> = input.values.keys().collect();
        supplied.sort();
        for name in supplied {
            match snippet.variable(name) {
                None => {
                    return Err(ProcessError::UnknownVariable {
                        snippet: input.name.clone(),
                        variable: name.clone(),
                    });
                }
                Some(variable) if variable.computed => {
                    return Err(ProcessError::ComputedVariable {
                        snippet: input.name.clone(),
                        variable: name.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        let raw_values = self.collect_values(snippet, input.values);
        let resolver = SnippetResolver::new(self.config);
        let result = if input.preview {
            resolver.preview(snippet, &raw_values)?
        } else {
            resolver.resolve(snippet, &raw_values)?
        };

        Ok(ProcessSnippetOutput { raw_values, result })
    }

    fn collect_values(
        &self,
        snippet: &Snippet,
        mut supplied: HashMap<String, String>,
    ) -> HashMap<String, String> {
        let mut raw_values = HashMap::with_capacity(snippet.variables.len());
        for variable in snippet.variables.iter().filter(|v| !v.computed) {
            let value = supplied
                .remove(&variable.name)
                .unwrap_or_else(|| self.default_for(variable));
            raw_values.insert(variable.name.clone(), value);
        }
        raw_values
    }

    fn default_for(&self, variable: &Variable) -> String {
        if !variable.default_value.is_empty() {
            return variable.default_value.clone();
        }
        self.config
            .variable_type(&variable.type_name)
            .map(|t| t.default_value.clone())
            .unwrap_or_default()
    }
}
