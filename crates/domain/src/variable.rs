//! Snippet variable types

use serde::{Deserialize, Serialize};

/// Type name that marks a variable as a boolean switch.
pub const BOOLEAN_TYPE: &str = "boolean";

/// Type name that marks a variable whose value must itself be a regex.
pub const REGEX_TYPE: &str = "regex";

/// A variable declared by a snippet and bound to a `<name>` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within a snippet.
    pub name: String,

    /// Human description shown next to the variable.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Value used when the raw value is empty and no transform applies.
    #[serde(default, rename = "default", skip_serializing_if = "String::is_empty")]
    pub default_value: String,

    /// Whether an empty value is rejected by validation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    /// Type name: `boolean`, `regex`, or a key of the configured variable types.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub type_name: String,

    /// Inline transform rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,

    /// Name of a shared transform template. Takes precedence over `transform`.
    #[serde(
        default,
        rename = "transformTemplate",
        skip_serializing_if = "String::is_empty"
    )]
    pub transform_template: String,

    /// Inline validation rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,

    /// Whether the value is composed from other variables instead of supplied.
    #[serde(default, skip_serializing_if = "is_false")]
    pub computed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl Variable {
    /// Creates a plain variable with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Marks the variable as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Sets the inline transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// References a shared transform template by name.
    #[must_use]
    pub fn with_transform_template(mut self, name: impl Into<String>) -> Self {
        self.transform_template = name.into();
        self
    }

    /// Sets the inline validation rules.
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Marks the variable as computed.
    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Returns the placeholder text this variable replaces, e.g. `<name>`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.name)
    }

    /// Classifies the variable by its type name.
    #[must_use]
    pub fn kind(&self) -> VariableKind<'_> {
        VariableKind::from_type_name(&self.type_name)
    }
}

/// Closed classification of a variable's type name.
///
/// `boolean` and `regex` are built in; every other non-empty name refers to
/// an entry of the configured variable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind<'a> {
    /// No type declared.
    Text,
    /// Boolean switch resolved through `true_value` / `false_value`.
    Boolean,
    /// The value must compile as a regular expression.
    Regex,
    /// A named variable type looked up in the configuration.
    Named(&'a str),
}

impl<'a> VariableKind<'a> {
    /// Maps a type name to its kind. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_type_name(type_name: &'a str) -> Self {
        match type_name {
            "" => Self::Text,
            BOOLEAN_TYPE => Self::Boolean,
            REGEX_TYPE => Self::Regex,
            other => Self::Named(other),
        }
    }

    /// Returns true for the boolean kind.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }
}

/// Rules mapping a raw value to the text substituted into the command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// Substituted when the raw value is empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub empty_value: String,

    /// Expression applied to a non-empty raw value, bound as `.Value`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_pattern: String,

    /// Output for a truthy boolean.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub true_value: String,

    /// Output for a falsy boolean.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub false_value: String,

    /// Expression composing a computed value from all raw values.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub compose: String,
}

impl Transform {
    /// Creates a transform that only substitutes an empty value.
    #[must_use]
    pub fn empty_value(value: impl Into<String>) -> Self {
        Self {
            empty_value: value.into(),
            ..Self::default()
        }
    }

    /// Creates a transform with a value pattern.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            value_pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Creates a boolean transform.
    #[must_use]
    pub fn boolean(true_value: impl Into<String>, false_value: impl Into<String>) -> Self {
        Self {
            true_value: true_value.into(),
            false_value: false_value.into(),
            ..Self::default()
        }
    }

    /// Creates a compose transform for computed variables.
    #[must_use]
    pub fn compose(expression: impl Into<String>) -> Self {
        Self {
            compose: expression.into(),
            ..Self::default()
        }
    }
}

/// Validation rules for a single value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Validation {
    /// Regular expression the value must match (unanchored).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pattern: String,

    /// Closed set of allowed literal values.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Inclusive integer bounds; only a two-element list is enforced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<i64>,
}

impl Validation {
    /// Creates an enum rule.
    #[must_use]
    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates an inclusive range rule.
    #[must_use]
    pub fn range(min: i64, max: i64) -> Self {
        Self {
            range: vec![min, max],
            ..Self::default()
        }
    }

    /// Creates a regex pattern rule.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Returns the `(min, max)` bounds when the range has exactly two elements.
    #[must_use]
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match self.range.as_slice() {
            [min, max] => Some((*min, *max)),
            _ => None,
        }
    }
}
