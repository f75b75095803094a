//! Shared configuration: transform templates, variable types and snippets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snippet::{Snippet, SnippetSource};
use crate::variable::{Transform, Validation};

/// A named, reusable transform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformTemplate {
    /// Human description.
    #[serde(default)]
    pub description: String,

    /// The transform rules. A template without rules behaves like no transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl TransformTemplate {
    /// Creates a template wrapping the given transform.
    #[must_use]
    pub fn new(description: impl Into<String>, transform: Transform) -> Self {
        Self {
            description: description.into(),
            transform: Some(transform),
        }
    }
}

/// A named bundle of default value, validation and transform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariableType {
    /// Human description.
    #[serde(default)]
    pub description: String,

    /// Validation checked as a separate pass after the variable's own rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,

    /// Default offered when no value is supplied.
    #[serde(default, rename = "default", skip_serializing_if = "String::is_empty")]
    pub default_value: String,

    /// Transform carried by the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl VariableType {
    /// Creates a type with the given validation rules.
    #[must_use]
    pub fn with_validation(validation: Validation) -> Self {
        Self {
            validation: Some(validation),
            ..Self::default()
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// Settings for interactive front ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractiveSettings {
    /// Ask for confirmation before running a rendered command.
    #[serde(default)]
    pub confirm_before_execute: bool,

    /// Echo the rendered command to stderr.
    #[serde(default)]
    pub show_final_command: bool,
}

/// Global settings stored in the main configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Extra config files or glob patterns merged after the main file.
    #[serde(
        default,
        alias = "additional_snippets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_configs: Vec<String>,

    /// Interactive behaviour.
    #[serde(default)]
    pub interactive: InteractiveSettings,
}

/// The merged configuration root.
///
/// Maps are ordered so that listing and serialization are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reusable transforms by name.
    #[serde(default)]
    pub transform_templates: BTreeMap<String, TransformTemplate>,

    /// Reusable variable types by name.
    #[serde(default)]
    pub variable_types: BTreeMap<String, VariableType>,

    /// Snippets by name.
    #[serde(default)]
    pub snippets: BTreeMap<String, Snippet>,

    /// Global settings.
    #[serde(default)]
    pub settings: Settings,
}

/// What kind of entry a merge replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteKind {
    /// A transform template.
    TransformTemplate,
    /// A variable type.
    VariableType,
    /// A snippet.
    Snippet,
}

impl fmt::Display for OverwriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TransformTemplate => "transform template",
            Self::VariableType => "variable type",
            Self::Snippet => "snippet",
        })
    }
}

/// An entry replaced during [`Config::merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverwrite {
    /// Kind of entry.
    pub kind: OverwriteKind,
    /// Entry name.
    pub name: String,
}

impl Config {
    /// Returns the configuration written for first-time users.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            settings: Settings {
                additional_configs: vec!["snippets/*.yaml".to_string()],
                interactive: InteractiveSettings {
                    confirm_before_execute: false,
                    show_final_command: true,
                },
            },
            ..Self::default()
        }
    }

    /// Looks up a transform template.
    #[must_use]
    pub fn transform_template(&self, name: &str) -> Option<&TransformTemplate> {
        self.transform_templates.get(name)
    }

    /// Looks up a variable type.
    #[must_use]
    pub fn variable_type(&self, name: &str) -> Option<&VariableType> {
        self.variable_types.get(name)
    }

    /// Looks up a snippet.
    #[must_use]
    pub fn snippet(&self, name: &str) -> Option<&Snippet> {
        self.snippets.get(name)
    }

    /// Tags every snippet with the given source.
    pub fn mark_source(&mut self, source: SnippetSource) {
        for snippet in self.snippets.values_mut() {
            snippet.source = source;
        }
    }

    /// Merges `other` into `self`. Entries of `other` replace same-named
    /// entries; merged snippets are tagged with `source`. Settings of `other`
    /// are ignored.
    ///
    /// Returns every replaced entry, in kind then name order.
    pub fn merge(&mut self, other: Self, source: SnippetSource) -> Vec<ConfigOverwrite> {
        let mut overwrites = Vec::new();

        for (name, template) in other.transform_templates {
            if self.transform_templates.insert(name.clone(), template).is_some() {
                overwrites.push(ConfigOverwrite {
                    kind: OverwriteKind::TransformTemplate,
                    name,
                });
            }
        }

        for (name, variable_type) in other.variable_types {
            if self.variable_types.insert(name.clone(), variable_type).is_some() {
                overwrites.push(ConfigOverwrite {
                    kind: OverwriteKind::VariableType,
                    name,
                });
            }
        }

        for (name, mut snippet) in other.snippets {
            snippet.source = source;
            if self.snippets.insert(name.clone(), snippet).is_some() {
                overwrites.push(ConfigOverwrite {
                    kind: OverwriteKind::Snippet,
                    name,
                });
            }
        }

        overwrites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;
    use pretty_assertions::assert_eq;

    fn base() -> Config {
        let mut config = Config::default();
        config.transform_templates.insert(
            "ns".to_string(),
            TransformTemplate::new("namespace", Transform::empty_value("-A")),
        );
        config.snippets.insert(
            "echo".to_string(),
            Snippet::new("echo", "echo <name>").with_variable(Variable::new("name")),
        );
        config
    }

    #[test]
    fn merge_adds_and_reports_overwrites() {
        let mut config = base();

        let mut extra = Config::default();
        extra.transform_templates.insert(
            "ns".to_string(),
            TransformTemplate::new("replacement", Transform::empty_value("")),
        );
        extra
            .variable_types
            .insert("port".to_string(), VariableType::default());
        extra
            .snippets
            .insert("ls".to_string(), Snippet::new("ls", "ls <path>"));

        let overwrites = config.merge(extra, SnippetSource::Global);

        assert_eq!(
            overwrites,
            vec![ConfigOverwrite {
                kind: OverwriteKind::TransformTemplate,
                name: "ns".to_string(),
            }]
        );
        assert_eq!(
            config.transform_template("ns").map(|t| t.description.as_str()),
            Some("replacement")
        );
        assert!(config.variable_type("port").is_some());
        assert_eq!(config.snippets.len(), 2);
    }

    #[test]
    fn merge_tags_snippet_source() {
        let mut config = base();
        let mut local = Config::default();
        local
            .snippets
            .insert("echo".to_string(), Snippet::new("echo", "echo local"));

        let overwrites = config.merge(local, SnippetSource::Local);

        assert_eq!(overwrites.len(), 1);
        assert_eq!(overwrites[0].kind, OverwriteKind::Snippet);
        let echo = config.snippet("echo").unwrap();
        assert_eq!(echo.command, "echo local");
        assert_eq!(echo.source, SnippetSource::Local);
    }

    #[test]
    fn merge_ignores_other_settings() {
        let mut config = Config::starter();
        let mut other = Config::default();
        other.settings.additional_configs = vec!["elsewhere/*.yaml".to_string()];

        config.merge(other, SnippetSource::Global);

        assert_eq!(config.settings.additional_configs, vec!["snippets/*.yaml"]);
    }

    #[test]
    fn deserialize_full_config() {
        let yaml = r#"
transform_templates:
  kubectl-namespace:
    description: namespace flag
    transform:
      empty_value: ""
      value_pattern: '{{if eq .Value "all"}}-A{{else}}-n {{.Value}}{{end}}'
variable_types:
  port:
    description: TCP port
    default: "8080"
    validation:
      range: [1, 65535]
snippets:
  get-pods:
    id: get-pods
    name: Get pods
    command: kubectl get pods <namespace>
    variables:
      - name: namespace
        transformTemplate: kubectl-namespace
settings:
  additional_snippets: ["more/*.yaml"]
  interactive:
    show_final_command: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let template = config.transform_template("kubectl-namespace").unwrap();
        assert!(template.transform.as_ref().unwrap().value_pattern.contains("-A"));
        let port = config.variable_type("port").unwrap();
        assert_eq!(port.default_value, "8080");
        assert_eq!(port.validation.as_ref().unwrap().bounds(), Some((1, 65535)));
        assert_eq!(config.settings.additional_configs, vec!["more/*.yaml"]);
        assert!(config.settings.interactive.show_final_command);
        assert_eq!(config.snippets["get-pods"].variables[0].name, "namespace");
    }

    #[test]
    fn empty_document_fields_default() {
        let config: Config = serde_yaml::from_str("snippets: {}\n").unwrap();
        assert!(config.transform_templates.is_empty());
        assert!(config.variable_types.is_empty());
        assert_eq!(config.settings, Settings::default());
    }
}
