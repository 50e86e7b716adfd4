use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::source::Node;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of nodes whose name (or id) fuzzily matches `query`.
/// `None` when the query is blank.
pub fn matching_nodes(nodes: &[Node], query: &str) -> Option<HashSet<usize>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    let matches = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            fuzzy_match_score(&matcher, &node.name, query).is_some()
                || fuzzy_match_score(&matcher, &node.id, query).is_some()
        })
        .map(|(index, _)| index)
        .collect();
    Some(matches)
}

/// Caches the last query's matches so typing doesn't rescan every frame.
#[derive(Default)]
pub struct SearchState {
    pub query: String,
    cached_query: String,
    matches: Option<HashSet<usize>>,
}

impl SearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn matches(&mut self, nodes: &[Node]) -> Option<&HashSet<usize>> {
        if self.cached_query != self.query {
            self.matches = matching_nodes(nodes, &self.query);
            self.cached_query.clone_from(&self.query);
        }
        self.matches.as_ref()
    }
}
