//! Snippet types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// Where a snippet was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetSource {
    /// The user's main configuration or one of its additional files.
    #[default]
    Global,
    /// The directory-local snippet file.
    Local,
}

impl SnippetSource {
    /// Returns the lowercase name of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for SnippetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored command template and the variables that fill it in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snippet {
    /// Stable identifier.
    #[serde(default)]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Human description.
    #[serde(default)]
    pub description: String,

    /// Command template containing `<name>` placeholders.
    pub command: String,

    /// Variables in declaration order. Substitution follows this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,

    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Set by the loader, never persisted.
    #[serde(skip)]
    pub source: SnippetSource,
}

impl Snippet {
    /// Creates a snippet with the given id and command template.
    #[must_use]
    pub fn new(id: impl Into<String>, command: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            command: command.into(),
            ..Self::default()
        }
    }

    /// Appends a variable definition.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Finds a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Returns true if any tag equals one of `filter` (ASCII case-insensitive).
    #[must_use]
    pub fn has_any_tag(&self, filter: &[String]) -> bool {
        filter
            .iter()
            .any(|wanted| self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(wanted)))
    }

    /// Returns true if the lowercase query occurs in the name, description,
    /// command or any tag.
    #[must_use]
    pub fn matches_query(&self, key: &str, query: &str) -> bool {
        let query = query.to_lowercase();
        [
            key,
            self.name.as_str(),
            self.description.as_str(),
            self.command.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
        .any(|field| field.to_lowercase().contains(&query))
    }
}
