//! Search snippets use case.

use tplkit_domain::Config;

use super::list_snippets::SnippetEntry;

/// Use case for free-text snippet search.
pub struct SearchSnippets<'a> {
    config: &'a Config,
}

impl<'a> SearchSnippets<'a> {
    /// Creates a new `SearchSnippets` use case.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Returns snippets whose key, name, description, command or tags
    /// contain `query`, ignoring case. Results are sorted by name.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn execute(&self, query: &str) -> Vec<SnippetEntry<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        self.config
            .snippets
            .iter()
            .filter(|(key, snippet)| snippet.matches_query(key, query))
            .map(|(key, snippet)| SnippetEntry { key, snippet })
            .collect()
    }
}
