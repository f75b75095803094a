//! List snippets use case.

use tplkit_domain::{Config, Snippet, SnippetSource};

/// A snippet together with the name it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetEntry<'a> {
    /// Config key.
    pub key: &'a str,
    /// The snippet.
    pub snippet: &'a Snippet,
}

/// Input for listing snippets.
#[derive(Debug, Clone, Default)]
pub struct ListSnippetsInput {
    /// Keep snippets carrying any of these tags. Empty keeps all.
    pub tags: Vec<String>,
    /// Keep snippets from this source only.
    pub source: Option<SnippetSource>,
}

/// Use case for listing the configured snippets.
pub struct ListSnippets<'a> {
    config: &'a Config,
}

impl<'a> ListSnippets<'a> {
    /// Creates a new `ListSnippets` use case.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Returns the matching snippets sorted by name.
    #[must_use]
    pub fn execute(&self, input: &ListSnippetsInput) -> Vec<SnippetEntry<'a>> {
        self.config
            .snippets
            .iter()
            .filter(|(_, snippet)| input.tags.is_empty() || snippet.has_any_tag(&input.tags))
            .filter(|(_, snippet)| input.source.is_none_or(|source| snippet.source == source))
            .map(|(key, snippet)| SnippetEntry { key, snippet })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        let mut config = Config::default();
        config.snippets.insert(
            "get-pods".to_string(),
            Snippet::new("get-pods", "kubectl get pods").with_tag("k8s"),
        );
        config.snippets.insert(
            "docker-ps".to_string(),
            Snippet::new("docker-ps", "docker ps").with_tag("Docker"),
        );
        let mut local = Snippet::new("build", "make build").with_tag("make");
        local.source = SnippetSource::Local;
        config.snippets.insert("build".to_string(), local);
        config
    }

    fn keys(entries: &[SnippetEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.key.to_string()).collect()
    }

    #[test]
    fn test_list_all_sorted() {
        let config = config();
        let entries = ListSnippets::new(&config).execute(&ListSnippetsInput::default());
        assert_eq!(keys(&entries), vec!["build", "docker-ps", "get-pods"]);
    }

    #[test]
    fn test_filter_by_tags_case_insensitive() {
        let config = config();
        let input = ListSnippetsInput {
            tags: vec!["docker".to_string(), "K8S".to_string()],
            source: None,
        };
        let entries = ListSnippets::new(&config).execute(&input);
        assert_eq!(keys(&entries), vec!["docker-ps", "get-pods"]);
    }

    #[test]
    fn test_filter_by_source() {
        let config = config();
        let local = ListSnippetsInput {
            tags: Vec::new(),
            source: Some(SnippetSource::Local),
        };
        assert_eq!(keys(&ListSnippets::new(&config).execute(&local)), vec!["build"]);

        let global = ListSnippetsInput {
            tags: vec!["make".to_string()],
            source: Some(SnippetSource::Global),
        };
        assert!(ListSnippets::new(&config).execute(&global).is_empty());
    }
}
