//! Placeholder parser for `<name>` syntax
//!
//! Finds placeholder references in a snippet command with their positions.

use std::ops::Range;

/// A `<name>` reference found in a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReference {
    /// The placeholder name (without `<` `>`).
    pub name: String,

    /// Byte range in the original string, brackets included.
    pub span: Range<usize>,
}

impl PlaceholderReference {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a command and extracts every placeholder reference.
///
/// Only well-formed names count, so shell syntax such as `a < b > c` or
/// `2>&1` is left alone.
///
/// # Examples
///
/// ```
/// use tplkit_application::variable_resolver::parser::parse_placeholders;
///
/// let refs = parse_placeholders("kubectl logs <pod> -n <namespace> 2>&1");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "pod");
/// assert_eq!(refs[1].name, "namespace");
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<PlaceholderReference> {
    let mut references = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = input[search_from..].find('<') {
        let start = search_from + offset;
        let rest = &input[start + 1..];

        // A nested '<' restarts the candidate from there.
        let Some(close) = rest.find(['>', '<']) else {
            break;
        };
        if rest.as_bytes()[close] == b'<' {
            search_from = start + 1 + close;
            continue;
        }

        let name = &rest[..close];
        let end = start + close + 2;
        if is_valid_placeholder_name(name) {
            references.push(PlaceholderReference::new(name, start..end));
            search_from = end;
        } else {
            search_from = start + 1;
        }
    }

    references
}

/// Validates a placeholder name.
/// Valid names start with a letter or underscore and continue with
/// alphanumerics, underscores or hyphens.
#[must_use]
pub fn is_valid_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns true if the input contains any placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    !parse_placeholders(input).is_empty()
}

/// Extracts placeholder names in order of first appearance, without duplicates.
#[must_use]
pub fn extract_placeholder_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for reference in parse_placeholders(input) {
        if !names.contains(&reference.name) {
            names.push(reference.name);
        }
    }
    names
}
