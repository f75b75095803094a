//! Transform lookup and value shaping for non-computed variables.

use std::collections::HashMap;

use tplkit_domain::{Config, Transform, Variable};

use crate::error::ResolveError;
use crate::expression;
use crate::variable_resolver::ValueSource;

/// Placeholder name a value pattern reads the raw value from.
pub const PATTERN_VALUE_FIELD: &str = "Value";

/// Finds the transform that applies to `variable`.
///
/// A named template wins over the inline transform. A template name that is
/// not configured is an error and never falls back to the inline transform.
///
/// # Errors
///
/// Returns [`ResolveError::TransformTemplateNotFound`] for an unknown template.
pub fn resolve_transform<'a>(
    variable: &'a Variable,
    config: &'a Config,
) -> Result<Option<&'a Transform>, ResolveError> {
    if variable.transform_template.is_empty() {
        return Ok(variable.transform.as_ref());
    }

    config
        .transform_template(&variable.transform_template)
        .map(|template| template.transform.as_ref())
        .ok_or_else(|| ResolveError::TransformTemplateNotFound {
            variable: variable.name.clone(),
            template: variable.transform_template.clone(),
        })
}

/// Maps the raw value of a non-computed variable to its substituted text.
///
/// Precedence: boolean switch, then transform (`empty_value`, then
/// `value_pattern`), then the variable default for an empty value, then the
/// raw value itself.
///
/// # Errors
///
/// Returns [`ResolveError::ValuePattern`] if the value pattern fails.
pub fn apply_transform(
    variable: &Variable,
    transform: Option<&Transform>,
    raw: &str,
) -> Result<(String, ValueSource), ResolveError> {
    if variable.kind().is_boolean() {
        let Some(transform) = transform else {
            return Ok((String::new(), ValueSource::Empty));
        };
        let value = if is_truthy(raw) {
            &transform.true_value
        } else {
            &transform.false_value
        };
        return Ok((value.clone(), ValueSource::Boolean));
    }

    if let Some(transform) = transform {
        if raw.is_empty() {
            if transform.empty_value.is_empty() {
                return Ok((String::new(), ValueSource::Empty));
            }
            return Ok((transform.empty_value.clone(), ValueSource::EmptyValue));
        }
        if transform.value_pattern.is_empty() {
            return Ok((raw.to_string(), ValueSource::Raw));
        }
        let values = HashMap::from([(PATTERN_VALUE_FIELD.to_string(), raw.to_string())]);
        let rendered = expression::render(&transform.value_pattern, &values).map_err(|source| {
            ResolveError::ValuePattern {
                variable: variable.name.clone(),
                source,
            }
        })?;
        return Ok((rendered, ValueSource::Pattern));
    }

    if raw.is_empty() {
        let source = if variable.default_value.is_empty() {
            ValueSource::Empty
        } else {
            ValueSource::Default
        };
        return Ok((variable.default_value.clone(), source));
    }

    Ok((raw.to_string(), ValueSource::Raw))
}

/// Boolean switches accept exactly `true`, `yes` and `1`.
#[must_use]
pub fn is_truthy(raw: &str) -> bool {
    matches!(raw, "true" | "yes" | "1")
}
