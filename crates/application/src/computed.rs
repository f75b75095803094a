//! Computed variables: values composed from the raw values of the others.

use std::collections::HashMap;

use tplkit_domain::{Transform, Variable};

use crate::error::ResolveError;
use crate::expression;

/// Returns the compose expression that drives `variable`, if any.
///
/// Only a computed variable whose transform carries a non-empty `compose`
/// is evaluated here; everything else goes through the regular transform
/// path.
#[must_use]
pub fn compose_rule<'a>(variable: &Variable, transform: Option<&'a Transform>) -> Option<&'a str> {
    if !variable.computed {
        return None;
    }
    transform
        .map(|t| t.compose.as_str())
        .filter(|compose| !compose.is_empty())
}

/// Renders `compose` against every raw value.
///
/// Raw values are used as supplied: the transformed values of other
/// variables are never visible to a compose rule.
///
/// # Errors
///
/// Returns [`ResolveError::ComposeTemplate`] if the rule fails to parse or
/// render.
pub fn evaluate_computed(
    variable: &Variable,
    compose: &str,
    raw_values: &HashMap<String, String>,
) -> Result<String, ResolveError> {
    expression::render(compose, raw_values).map_err(|source| ResolveError::ComposeTemplate {
        variable: variable.name.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn compose_rule_requires_computed_flag() {
        let transform = Transform::compose("{{.a}}");
        let plain = Variable::new("x");
        let computed = Variable::new("x").computed();

        assert_eq!(compose_rule(&plain, Some(&transform)), None);
        assert_eq!(compose_rule(&computed, Some(&transform)), Some("{{.a}}"));
        assert_eq!(compose_rule(&computed, Some(&Transform::default())), None);
        assert_eq!(compose_rule(&computed, None), None);
    }

    #[test]
    fn composes_from_raw_values() {
        let variable = Variable::new("resource").computed();
        let value = evaluate_computed(
            &variable,
            "{{.resource_type}}/{{.resource_name}}",
            &raw(&[("resource_type", "pod"), ("resource_name", "my-pod")]),
        )
        .unwrap();
        assert_eq!(value, "pod/my-pod");
    }

    #[test]
    fn failure_names_the_variable() {
        let variable = Variable::new("resource").computed();
        let err = evaluate_computed(&variable, "{{.a", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ResolveError::ComposeTemplate { ref variable, .. } if variable == "resource"));
    }
}
