use crate::agents::Searcher;
use crate::research::gather::{best_effort_gather, GatherOptions};
use crate::types::{ResearchError, SearchPlan};
use std::sync::Arc;
use tracing::info;

/// Runs every planned search concurrently and keeps the summaries that succeed
pub struct SearchExecutor {
    searcher: Arc<dyn Searcher>,
    options: GatherOptions,
}

impl SearchExecutor {
    pub fn new(searcher: Arc<dyn Searcher>) -> Self {
        Self {
            searcher,
            options: GatherOptions::unbounded(),
        }
    }

    pub fn with_options(mut self, options: GatherOptions) -> Self {
        self.options = options;
        self
    }

    /// Summaries in completion order. Failed searches are omitted, so the
    /// result may be shorter than the plan, or empty.
    pub async fn execute_searches(&self, plan: &SearchPlan) -> Vec<String> {
        if plan.is_empty() {
            info!("No searches planned");
            return Vec::new();
        }

        info!(searches = plan.len(), "Searching...");

        let tasks: Vec<_> = plan
            .searches
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| {
                let searcher = self.searcher.clone();
                async move {
                    searcher
                        .search(&item)
                        .await
                        .map_err(|e| ResearchError::SearchTask {
                            index,
                            reason: format!("'{}': {}", item.search_term, e),
                        })
                }
            })
            .collect();

        let results = best_effort_gather(tasks, self.options).await;

        info!(
            succeeded = results.len(),
            attempted = plan.len(),
            "Finished searching"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Result, SearchItem};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakySearcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Searcher for FlakySearcher {
        async fn search(&self, item: &SearchItem) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if item.search_term.starts_with("bad") {
                Err(ResearchError::LLM("backend unavailable".to_string()))
            } else {
                Ok(format!("summary of {}", item.search_term))
            }
        }
    }

    fn plan(terms: &[&str]) -> SearchPlan {
        SearchPlan {
            searches: terms
                .iter()
                .map(|t| SearchItem {
                    search_term: t.to_string(),
                    rationale: "because".to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_partial_failures_are_omitted() {
        let searcher = Arc::new(FlakySearcher {
            calls: AtomicUsize::new(0),
        });
        let executor = SearchExecutor::new(searcher.clone());

        let mut results = executor
            .execute_searches(&plan(&["a", "bad-1", "b", "bad-2", "c"]))
            .await;
        results.sort();

        assert_eq!(searcher.calls.load(Ordering::SeqCst), 5);
        assert_eq!(
            results,
            vec!["summary of a", "summary of b", "summary of c"]
        );
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty() {
        let executor = SearchExecutor::new(Arc::new(FlakySearcher {
            calls: AtomicUsize::new(0),
        }));
        assert!(executor
            .execute_searches(&plan(&["bad-1", "bad-2"]))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_makes_no_calls() {
        let searcher = Arc::new(FlakySearcher {
            calls: AtomicUsize::new(0),
        });
        let executor = SearchExecutor::new(searcher.clone());

        assert!(executor.execute_searches(&plan(&[])).await.is_empty());
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    }
}
