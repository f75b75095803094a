//! Check snippets use case.
//!
//! Static checks that catch mistakes before a snippet is rendered.

use std::collections::HashSet;
use std::fmt;

use tplkit_domain::{Config, Snippet};

use super::process_snippet::ProcessError;
use crate::expression::Expression;
use crate::transform::{PATTERN_VALUE_FIELD, resolve_transform};
use crate::variable_resolver::extract_placeholder_names;

/// A problem found in a snippet definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIssue {
    /// A `<name>` placeholder that no variable declares.
    UnboundPlaceholder(String),
    /// A variable declared more than once.
    DuplicateVariable(String),
    /// A variable references a transform template that is not configured.
    MissingTransformTemplate {
        /// Variable name.
        variable: String,
        /// Template name.
        template: String,
    },
    /// A computed variable with no compose rule.
    ComputedWithoutCompose(String),
    /// A compose rule or value pattern that does not parse.
    InvalidExpression {
        /// Variable name.
        variable: String,
        /// Parser message.
        message: String,
    },
    /// A compose rule reads a name with no raw value.
    ComposeReadsUnknown {
        /// Variable name.
        variable: String,
        /// Field read by the rule.
        field: String,
    },
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundPlaceholder(name) => {
                write!(f, "placeholder <{name}> has no variable")
            }
            Self::DuplicateVariable(name) => write!(f, "variable {name} is declared twice"),
            Self::MissingTransformTemplate { variable, template } => {
                write!(f, "variable {variable}: transform template '{template}' not found")
            }
            Self::ComputedWithoutCompose(name) => {
                write!(f, "variable {name} is computed but has no compose rule")
            }
            Self::InvalidExpression { variable, message } => {
                write!(f, "variable {variable}: {message}")
            }
            Self::ComposeReadsUnknown { variable, field } => write!(
                f,
                "variable {variable}: compose reads .{field}, which is not an input variable"
            ),
        }
    }
}

/// The issues found in one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetReport {
    /// Config key of the snippet.
    pub key: String,
    /// Issues in discovery order.
    pub issues: Vec<CheckIssue>,
}

impl SnippetReport {
    /// Returns true when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Use case for checking snippet definitions.
pub struct CheckSnippets<'a> {
    config: &'a Config,
}

impl<'a> CheckSnippets<'a> {
    /// Creates a new `CheckSnippets` use case.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Checks one snippet, or every snippet when `name` is `None`.
    ///
    /// # Errors
    /// Returns error if the named snippet does not exist.
    pub fn execute(&self, name: Option<&str>) -> Result<Vec<SnippetReport>, ProcessError> {
        if let Some(name) = name {
            let snippet = self
                .config
                .snippet(name)
                .ok_or_else(|| ProcessError::SnippetNotFound(name.to_string()))?;
            return Ok(vec![self.check(name, snippet)]);
        }

        Ok(self
            .config
            .snippets
            .iter()
            .map(|(key, snippet)| self.check(key, snippet))
            .collect())
    }

    fn check(&self, key: &str, snippet: &Snippet) -> SnippetReport {
        let mut issues = Vec::new();

        for placeholder in extract_placeholder_names(&snippet.command) {
            if snippet.variable(&placeholder).is_none() {
                issues.push(CheckIssue::UnboundPlaceholder(placeholder));
            }
        }

        let mut seen = HashSet::new();
        for variable in &snippet.variables {
            if !seen.insert(variable.name.as_str()) {
                issues.push(CheckIssue::DuplicateVariable(variable.name.clone()));
            }
        }

        let inputs: HashSet<&str> = snippet
            .variables
            .iter()
            .filter(|v| !v.computed)
            .map(|v| v.name.as_str())
            .collect();

        for variable in &snippet.variables {
            let transform = match resolve_transform(variable, self.config) {
                Ok(transform) => transform,
                Err(_) => {
                    issues.push(CheckIssue::MissingTransformTemplate {
                        variable: variable.name.clone(),
                        template: variable.transform_template.clone(),
                    });
                    continue;
                }
            };

            let compose = transform.map_or("", |t| t.compose.as_str());
            if variable.computed && compose.is_empty() {
                issues.push(CheckIssue::ComputedWithoutCompose(variable.name.clone()));
            }

            if variable.computed && !compose.is_empty() {
                match Expression::parse(compose) {
                    Ok(expr) => {
                        for field in expr.fields() {
                            if !inputs.contains(field.as_str()) {
                                issues.push(CheckIssue::ComposeReadsUnknown {
                                    variable: variable.name.clone(),
                                    field,
                                });
                            }
                        }
                    }
                    Err(err) => issues.push(CheckIssue::InvalidExpression {
                        variable: variable.name.clone(),
                        message: format!("compose: {err}"),
                    }),
                }
            }

            let pattern = transform.map_or("", |t| t.value_pattern.as_str());
            if !pattern.is_empty() {
                match Expression::parse(pattern) {
                    Ok(expr) => {
                        for field in expr.fields() {
                            if field != PATTERN_VALUE_FIELD {
                                issues.push(CheckIssue::InvalidExpression {
                                    variable: variable.name.clone(),
                                    message: format!(
                                        "value pattern reads .{field}, only .{PATTERN_VALUE_FIELD} is set"
                                    ),
                                });
                            }
                        }
                    }
                    Err(err) => issues.push(CheckIssue::InvalidExpression {
                        variable: variable.name.clone(),
                        message: format!("value pattern: {err}"),
                    }),
                }
            }
        }

        SnippetReport {
            key: key.to_string(),
            issues,
        }
    }
}
