//! Product search with query expansion.
//!
//! Visitors type dish names in whatever script they like ("ladoo", "लाडू").
//! A [`QueryExpander`] turns one term into its alternative spellings; results
//! are cached per normalized term so each term reaches the provider at most
//! once per TTL.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::TtlCache;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Query expansion failed: {0}")]
    Expansion(String),
}

#[async_trait]
pub trait QueryExpander: Send + Sync {
    /// Alternative spellings of `term`. May or may not include `term`.
    async fn expand(&self, term: &str) -> Result<Vec<String>, SearchError>;
}

pub struct SmartSearch {
    expander: Option<Arc<dyn QueryExpander>>,
    cache: TtlCache<String, Vec<String>>,
}

impl SmartSearch {
    pub fn new(expander: Option<Arc<dyn QueryExpander>>, cache: TtlCache<String, Vec<String>>) -> Self {
        Self { expander, cache }
    }

    /// Literal matching only.
    pub fn literal() -> Self {
        Self::new(None, TtlCache::default())
    }

    /// Search terms for `query`: the normalized query first, then any
    /// expansions. Empty for a blank query. Provider failures fall back to
    /// the literal term and are not cached.
    pub async fn terms(&self, query: &str) -> Vec<String> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        let Some(expander) = &self.expander else {
            return vec![term];
        };
        if let Some(terms) = self.cache.get(&term) {
            tracing::debug!(term = %term, "Search expansion cache hit");
            return terms;
        }

        match expander.expand(&term).await {
            Ok(expansions) => {
                let terms = merge_terms(&term, expansions);
                tracing::debug!(term = %term, expansions = terms.len() - 1, "Expanded search term");
                self.cache.insert(term, terms.clone());
                terms
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Search expansion failed, using literal term");
                vec![term]
            }
        }
    }
}

fn merge_terms(term: &str, expansions: Vec<String>) -> Vec<String> {
    let mut terms = vec![term.to_string()];
    for expansion in expansions {
        let expansion = expansion.trim().to_lowercase();
        if !expansion.is_empty() && !terms.contains(&expansion) {
            terms.push(expansion);
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingExpander {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl QueryExpander for CountingExpander {
        async fn expand(&self, term: &str) -> Result<Vec<String>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::Expansion("provider down".into()));
            }
            Ok(vec![term.to_string(), "लाडू".into(), " Laddu ".into()])
        }
    }

    fn search(fail: bool) -> (Arc<CountingExpander>, SmartSearch) {
        let expander = Arc::new(CountingExpander {
            calls: AtomicUsize::new(0),
            fail,
        });
        let provider: Arc<dyn QueryExpander> = expander.clone();
        let search = SmartSearch::new(Some(provider), TtlCache::new(Duration::from_secs(60), 16));
        (expander, search)
    }

    #[tokio::test]
    async fn expansions_are_deduplicated_and_cached() {
        let (expander, search) = search(false);
        let terms = search.terms("  Ladoo ").await;
        assert_eq!(terms, vec!["ladoo", "लाडू", "laddu"]);

        let again = search.terms("LADOO").await;
        assert_eq!(again, terms);
        assert_eq!(expander.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_falls_back_to_literal_and_is_not_cached() {
        let (expander, search) = search(true);
        assert_eq!(search.terms("modak").await, vec!["modak"]);
        assert_eq!(search.terms("modak").await, vec!["modak"]);
        assert_eq!(expander.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_query_has_no_terms() {
        assert!(SmartSearch::literal().terms("   ").await.is_empty());
        assert_eq!(SmartSearch::literal().terms("Poha").await, vec!["poha"]);
    }
}
