//! Expression language for value patterns and compose rules.
//!
//! A narrow, sandboxed subset of the `{{ }}` template syntax:
//!
//! - `{{.name}}` looks up a field in a string map (missing fields are empty)
//! - `"text"` and `` `text` `` are literals, `true` / `false` are booleans
//! - `eq`, `ne`, `not`, `and`, `or` are the only functions
//! - `{{if}}`, `{{else if}}`, `{{else}}`, `{{end}}` select between branches
//! - `{{-` and `-}}` trim whitespace, `{{/* ... */}}` is a comment
//!
//! There are no loops, so rendering always terminates.
//!
//! ```
//! use std::collections::HashMap;
//! use tplkit_application::expression::Expression;
//!
//! let expr = Expression::parse(r#"{{if eq .Value "all"}}-A{{else}}-n {{.Value}}{{end}}"#).unwrap();
//! let values = HashMap::from([("Value".to_string(), "default".to_string())]);
//! assert_eq!(expr.render(&values).unwrap(), "-n default");
//! ```

mod evaluator;
mod parser;

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use parser::{Expr, Node};

/// Errors raised while parsing or rendering an expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The template text is malformed.
    #[error("syntax error at byte {position}: {message}")]
    Syntax {
        /// Byte offset into the template source.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The template parsed but could not be evaluated.
    #[error("render error: {0}")]
    Render(String),
}

impl ExpressionError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// A parsed expression template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    nodes: Vec<Node>,
}

impl Expression {
    /// Parses template source.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::Syntax`] if the source is malformed.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            nodes: parser::parse(source)?,
        })
    }

    /// Renders the template against a map of named values.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::Render`] if a function receives the wrong
    /// number of arguments or compares a string with a boolean.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, ExpressionError> {
        let mut out = String::new();
        evaluator::render_nodes(&self.nodes, values, &mut out)?;
        Ok(out)
    }

    /// Returns the names of every field the template reads.
    #[must_use]
    pub fn fields(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        collect_node_fields(&self.nodes, &mut fields);
        fields
    }
}

/// Parses and renders in one step.
///
/// # Errors
///
/// Returns an error if the source fails to parse or render.
pub fn render(source: &str, values: &HashMap<String, String>) -> Result<String, ExpressionError> {
    Expression::parse(source)?.render(values)
}

fn collect_node_fields(nodes: &[Node], fields: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Output(expr) => collect_expr_fields(expr, fields),
            Node::If {
                branches,
                otherwise,
            } => {
                for (condition, body) in branches {
                    collect_expr_fields(condition, fields);
                    collect_node_fields(body, fields);
                }
                collect_node_fields(otherwise, fields);
            }
        }
    }
}

fn collect_expr_fields(expr: &Expr, fields: &mut BTreeSet<String>) {
    match expr {
        Expr::Field(name) => {
            fields.insert(name.clone());
        }
        Expr::Call { args, .. } => {
            for arg in args {
                collect_expr_fields(arg, fields);
            }
        }
        Expr::Literal(_) | Expr::Bool(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn render_field_lookup() {
        let vals = values(&[("resource_type", "pod"), ("resource_name", "my-pod")]);
        assert_eq!(
            render("{{.resource_type}}/{{.resource_name}}", &vals).unwrap(),
            "pod/my-pod"
        );
    }

    #[test]
    fn missing_field_is_empty() {
        assert_eq!(render("[{{.nope}}]", &HashMap::new()).unwrap(), "[]");
    }

    #[test]
    fn namespace_pattern() {
        let pattern = r#"{{if eq .Value "all"}}-A{{else}}-n {{.Value}}{{end}}"#;
        assert_eq!(render(pattern, &values(&[("Value", "all")])).unwrap(), "-A");
        assert_eq!(
            render(pattern, &values(&[("Value", "kube-system")])).unwrap(),
            "-n kube-system"
        );
    }

    #[test]
    fn conditional_on_presence() {
        let compose = "{{.host_port}}:{{if .container_port}}{{.container_port}}{{else}}{{.host_port}}{{end}}";
        assert_eq!(
            render(compose, &values(&[("host_port", "8080")])).unwrap(),
            "8080:8080"
        );
        assert_eq!(
            render(
                compose,
                &values(&[("host_port", "8080"), ("container_port", "80")])
            )
            .unwrap(),
            "8080:80"
        );
    }

    #[test]
    fn else_if_chain() {
        let template = r#"{{if eq .f "json"}}-o json{{else if eq .f "yaml"}}-o yaml{{else}}-o wide{{end}}"#;
        assert_eq!(render(template, &values(&[("f", "yaml")])).unwrap(), "-o yaml");
        assert_eq!(render(template, &values(&[("f", "")])).unwrap(), "-o wide");
    }

    #[test]
    fn eq_matches_any_later_argument() {
        let template = r#"{{if eq .env "prod" "production"}}!{{end}}"#;
        assert_eq!(render(template, &values(&[("env", "production")])).unwrap(), "!");
        assert_eq!(render(template, &values(&[("env", "dev")])).unwrap(), "");
    }

    #[test]
    fn logic_functions() {
        let vals = values(&[("a", "x"), ("b", "")]);
        assert_eq!(render("{{and .a .b}}", &vals).unwrap(), "");
        assert_eq!(render("{{or .b .a}}", &vals).unwrap(), "x");
        assert_eq!(render("{{not .b}}", &vals).unwrap(), "true");
        assert_eq!(render(r#"{{ne .a "y"}}"#, &vals).unwrap(), "true");
        assert_eq!(
            render(r#"{{if and .a (not .b)}}yes{{end}}"#, &vals).unwrap(),
            "yes"
        );
    }

    #[test]
    fn trim_markers() {
        let template = "--flag\n  {{- if .v }} {{ .v }}{{ end -}}\n";
        assert_eq!(render(template, &values(&[("v", "1")])).unwrap(), "--flag 1");
    }

    #[test]
    fn render_errors() {
        assert!(matches!(
            render("{{eq .a}}", &HashMap::new()),
            Err(ExpressionError::Render(_))
        ));
        assert!(matches!(
            render("{{not .a .b}}", &HashMap::new()),
            Err(ExpressionError::Render(_))
        ));
        assert!(matches!(
            render("{{eq .a true}}", &HashMap::new()),
            Err(ExpressionError::Render(_))
        ));
    }

    #[test]
    fn unused_branch_errors_are_not_raised() {
        // Only the taken branch is evaluated.
        assert_eq!(
            render("{{if true}}ok{{else}}{{eq .a}}{{end}}", &HashMap::new()).unwrap(),
            "ok"
        );
    }

    #[test]
    fn fields_lists_every_reference() {
        let expr = Expression::parse(
            r#"{{.a}}{{if eq .b "x"}}{{.c}}{{else if .d}}{{end}}{{or .e "f"}}"#,
        )
        .unwrap();
        let fields: Vec<_> = expr.fields().into_iter().collect();
        assert_eq!(fields, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let expr = Expression::parse("{{.x}}-{{.y}}").unwrap();
        let vals = values(&[("x", "1"), ("y", "2")]);
        assert_eq!(expr.render(&vals).unwrap(), expr.render(&vals).unwrap());
    }
}
