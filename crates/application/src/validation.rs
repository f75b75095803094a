//! Validation of candidate values.
//!
//! Two layers run in sequence: the variable's own rules, then the rules of
//! its type. The layers are never merged, so enum short-circuiting in one
//! layer cannot hide a rule of the other.

use regex::Regex;
use tplkit_domain::{Config, Validation, Variable, VariableKind};

use crate::error::ValidationError;

/// Checks `value` against the variable's `required` flag and inline rules.
///
/// Rule order: required, then enum (which short-circuits everything else),
/// then range, then pattern. An empty value passes range and pattern.
///
/// # Errors
///
/// Returns the first rule the value breaks.
pub fn validate(variable: &Variable, value: &str) -> Result<(), ValidationError> {
    if variable.required && value.is_empty() {
        return Err(ValidationError::RequiredMissing {
            variable: variable.name.clone(),
        });
    }

    match &variable.validation {
        Some(rules) => check_rules(&variable.name, rules, value),
        None => Ok(()),
    }
}

/// Runs [`validate`], then the type-specific layer.
///
/// A `regex` typed variable must hold a compilable regular expression and
/// skips the type lookup. Any other type name found in `config`, `boolean`
/// included, contributes its own validation rules as a second, independent
/// pass. Empty values skip
/// the type layer.
///
/// # Errors
///
/// Returns the first rule the value breaks.
pub fn validate_with_config(
    variable: &Variable,
    value: &str,
    config: &Config,
) -> Result<(), ValidationError> {
    validate(variable, value)?;

    if value.is_empty() {
        return Ok(());
    }

    match variable.kind() {
        VariableKind::Regex => Regex::new(value).map(|_| ()).map_err(|e| {
            ValidationError::InvalidRegexValue {
                variable: variable.name.clone(),
                message: e.to_string(),
            }
        }),
        VariableKind::Boolean | VariableKind::Named(_) => match config
            .variable_type(&variable.type_name)
            .and_then(|t| t.validation.as_ref())
        {
            Some(rules) => check_rules(&variable.name, rules, value),
            None => Ok(()),
        },
        VariableKind::Text => Ok(()),
    }
}

fn check_rules(name: &str, rules: &Validation, value: &str) -> Result<(), ValidationError> {
    if !rules.options.is_empty() {
        if rules.options.iter().any(|allowed| allowed == value) {
            return Ok(());
        }
        return Err(ValidationError::EnumMismatch {
            variable: name.to_string(),
            allowed: rules.options.clone(),
        });
    }

    if value.is_empty() {
        return Ok(());
    }

    if let Some((min, max)) = rules.bounds() {
        let number: i64 = value.parse().map_err(|_| ValidationError::NotANumber {
            variable: name.to_string(),
            value: value.to_string(),
        })?;
        if number < min || number > max {
            return Err(ValidationError::RangeInvalid {
                variable: name.to_string(),
                min,
                max,
                value: number,
            });
        }
    }

    if !rules.pattern.is_empty() {
        let regex = Regex::new(&rules.pattern).map_err(|e| ValidationError::InvalidPatternRule {
            variable: name.to_string(),
            pattern: rules.pattern.clone(),
            message: e.to_string(),
        })?;
        if !regex.is_match(value) {
            return Err(ValidationError::PatternMismatch {
                variable: name.to_string(),
                pattern: rules.pattern.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tplkit_domain::VariableType;

    fn port_config() -> Config {
        let mut config = Config::default();
        config.variable_types.insert(
            "test_port".to_string(),
            VariableType::with_validation(Validation::range(1, 65535)),
        );
        config.variable_types.insert(
            "env".to_string(),
            VariableType::with_validation(Validation::one_of(["dev", "prod"])),
        );
        config
    }

    #[test]
    fn required_rejects_empty() {
        let variable = Variable::new("name").required();
        assert_eq!(
            validate(&variable, ""),
            Err(ValidationError::RequiredMissing {
                variable: "name".to_string()
            })
        );
        assert!(validate(&variable, "Bob").is_ok());
    }

    #[test]
    fn optional_empty_passes_range_and_pattern() {
        let mut rules = Validation::range(1, 10);
        rules.pattern = "^x$".to_string();
        let variable = Variable::new("n").with_validation(rules);
        assert!(validate(&variable, "").is_ok());
    }

    #[test]
    fn enum_rejects_unknown_values() {
        let variable = Variable::new("format").with_validation(Validation::one_of(["json", "yaml"]));
        assert!(validate(&variable, "json").is_ok());
        assert!(matches!(
            validate(&variable, "xml"),
            Err(ValidationError::EnumMismatch { .. })
        ));
        // Empty is not in the list either.
        assert!(matches!(
            validate(&variable, ""),
            Err(ValidationError::EnumMismatch { .. })
        ));
    }

    #[test]
    fn enum_short_circuits_range_and_pattern() {
        let rules = Validation {
            pattern: "^[0-9]+$".to_string(),
            options: vec!["abc".to_string()],
            range: vec![1, 5],
        };
        let variable = Variable::new("v").with_validation(rules);

        // Allowed by enum, although it breaks both range and pattern.
        assert!(validate(&variable, "abc").is_ok());
        // Rejected only as an enum mismatch.
        assert!(matches!(
            validate(&variable, "99"),
            Err(ValidationError::EnumMismatch { .. })
        ));
    }

    #[test]
    fn range_checks() {
        let variable = Variable::new("port").with_validation(Validation::range(1, 65535));
        assert!(validate(&variable, "1").is_ok());
        assert!(validate(&variable, "65535").is_ok());
        assert_eq!(
            validate(&variable, "0"),
            Err(ValidationError::RangeInvalid {
                variable: "port".to_string(),
                min: 1,
                max: 65535,
                value: 0,
            })
        );
        assert!(matches!(
            validate(&variable, "80abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate(&variable, "8.5"),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn range_ignored_unless_two_elements() {
        let mut rules = Validation::default();
        rules.range = vec![1];
        let variable = Variable::new("n").with_validation(rules);
        assert!(validate(&variable, "not a number").is_ok());
    }

    #[test]
    fn pattern_is_unanchored() {
        let variable = Variable::new("tag").with_validation(Validation::pattern("v[0-9]+"));
        assert!(validate(&variable, "release-v12").is_ok());
        assert_eq!(
            validate(&variable, "latest"),
            Err(ValidationError::PatternMismatch {
                variable: "tag".to_string(),
                pattern: "v[0-9]+".to_string(),
            })
        );
    }

    #[test]
    fn broken_pattern_rule_is_reported() {
        let variable = Variable::new("x").with_validation(Validation::pattern("("));
        assert!(matches!(
            validate(&variable, "anything"),
            Err(ValidationError::InvalidPatternRule { .. })
        ));
    }

    #[test]
    fn type_rules_are_a_second_pass() {
        let config = port_config();
        let variable = Variable::new("port").with_type("test_port");

        assert!(matches!(
            validate_with_config(&variable, "99999", &config),
            Err(ValidationError::RangeInvalid { .. })
        ));
        assert!(validate_with_config(&variable, "8080", &config).is_ok());
    }

    #[test]
    fn both_layers_must_pass() {
        let config = port_config();
        // The variable's own enum allows "staging", the type's enum does not.
        let variable = Variable::new("env")
            .with_type("env")
            .with_validation(Validation::one_of(["staging", "prod"]));

        assert!(validate_with_config(&variable, "prod", &config).is_ok());
        assert!(matches!(
            validate_with_config(&variable, "staging", &config),
            Err(ValidationError::EnumMismatch { allowed, .. }) if allowed == vec!["dev", "prod"]
        ));
        assert!(matches!(
            validate_with_config(&variable, "dev", &config),
            Err(ValidationError::EnumMismatch { allowed, .. }) if allowed == vec!["staging", "prod"]
        ));
    }

    #[test]
    fn unknown_type_adds_nothing() {
        let variable = Variable::new("x").with_type("nonexistent");
        assert!(validate_with_config(&variable, "anything", &Config::default()).is_ok());
    }

    #[test]
    fn regex_type_requires_compilable_value() {
        let variable = Variable::new("filter").with_type("regex");
        let config = Config::default();

        assert!(validate_with_config(&variable, "^app-[a-z]+$", &config).is_ok());
        assert!(matches!(
            validate_with_config(&variable, "[unclosed", &config),
            Err(ValidationError::InvalidRegexValue { .. })
        ));
    }

    #[test]
    fn regex_type_skips_type_lookup() {
        let mut config = Config::default();
        config.variable_types.insert(
            "regex".to_string(),
            VariableType::with_validation(Validation::one_of(["never"])),
        );
        let variable = Variable::new("filter").with_type("regex");

        assert!(validate_with_config(&variable, "a+", &config).is_ok());
    }

    #[test]
    fn boolean_type_is_looked_up_like_named_types() {
        let mut config = Config::default();
        config.variable_types.insert(
            "boolean".to_string(),
            VariableType::with_validation(Validation::one_of(["true", "false"])),
        );
        let variable = Variable::new("verbose").with_type("boolean");

        assert!(validate_with_config(&variable, "true", &config).is_ok());
        assert_eq!(
            validate_with_config(&variable, "maybe", &config),
            Err(ValidationError::EnumMismatch {
                variable: "verbose".to_string(),
                allowed: vec!["true".to_string(), "false".to_string()],
            })
        );
    }

    #[test]
    fn boolean_type_without_config_entry_passes() {
        let variable = Variable::new("verbose").with_type("boolean");
        assert!(validate_with_config(&variable, "maybe", &Config::default()).is_ok());
    }

    #[test]
    fn type_layer_skipped_for_empty_value() {
        let config = port_config();
        let variable = Variable::new("env").with_type("env");
        assert!(validate_with_config(&variable, "", &config).is_ok());
    }
}
