//! Application error types

use thiserror::Error;

use crate::expression::ExpressionError;

/// A value rejected by validation. Every variant names the variable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required variable received an empty value.
    #[error("variable {variable} is required")]
    RequiredMissing {
        /// Variable name.
        variable: String,
    },

    /// The value is not one of the allowed literals.
    #[error("variable {variable} must be one of: {}", allowed.join(", "))]
    EnumMismatch {
        /// Variable name.
        variable: String,
        /// Allowed values.
        allowed: Vec<String>,
    },

    /// The value is not an integer.
    #[error("variable {variable} must be a valid number, got {value:?}")]
    NotANumber {
        /// Variable name.
        variable: String,
        /// Rejected value.
        value: String,
    },

    /// The value lies outside the inclusive range.
    #[error("variable {variable} must be between {min} and {max}, got {value}")]
    RangeInvalid {
        /// Variable name.
        variable: String,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
        /// Rejected value.
        value: i64,
    },

    /// The value does not match the declared pattern.
    #[error("variable {variable} does not match required format {pattern}")]
    PatternMismatch {
        /// Variable name.
        variable: String,
        /// Declared pattern.
        pattern: String,
    },

    /// The declared pattern itself is not a valid regex.
    #[error("variable {variable} has invalid pattern {pattern}: {message}")]
    InvalidPatternRule {
        /// Variable name.
        variable: String,
        /// Declared pattern.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },

    /// A `regex` typed value does not compile.
    #[error("variable {variable} must be a valid regular expression: {message}")]
    InvalidRegexValue {
        /// Variable name.
        variable: String,
        /// Regex compiler message.
        message: String,
    },
}

impl ValidationError {
    /// Returns the name of the offending variable.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::RequiredMissing { variable }
            | Self::EnumMismatch { variable, .. }
            | Self::NotANumber { variable, .. }
            | Self::RangeInvalid { variable, .. }
            | Self::PatternMismatch { variable, .. }
            | Self::InvalidPatternRule { variable, .. }
            | Self::InvalidRegexValue { variable, .. } => variable,
        }
    }
}

/// Errors that abort resolving a snippet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A variable references a transform template that is not configured.
    #[error("processing variable {variable}: transform template '{template}' not found")]
    TransformTemplateNotFound {
        /// Variable name.
        variable: String,
        /// Missing template name.
        template: String,
    },

    /// The compose expression of a computed variable failed.
    #[error("processing variable {variable}: compose: {source}")]
    ComposeTemplate {
        /// Variable name.
        variable: String,
        /// Underlying expression error.
        source: ExpressionError,
    },

    /// The value pattern of a transform failed.
    #[error("processing variable {variable}: value pattern: {source}")]
    ValuePattern {
        /// Variable name.
        variable: String,
        /// Underlying expression error.
        source: ExpressionError,
    },

    /// The raw value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ResolveError {
    /// Returns the name of the offending variable.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::TransformTemplateNotFound { variable, .. }
            | Self::ComposeTemplate { variable, .. }
            | Self::ValuePattern { variable, .. } => variable,
            Self::Validation(err) => err.variable(),
        }
    }
}
