//! Web lookup for search tasks
//!
//! Search tasks can ground their summaries on live web results. The
//! [`DuckDuckGoLookup`] implementation uses the daedra crate, which queries
//! DuckDuckGo.

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One web search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Fetches raw web hits for a search term
#[async_trait]
pub trait WebLookup: Send + Sync {
    async fn lookup(&self, term: &str, limit: usize) -> Result<Vec<WebHit>>;
}

/// Web lookup powered by daedra
#[cfg(feature = "web-search")]
pub struct DuckDuckGoLookup;

#[cfg(feature = "web-search")]
impl DuckDuckGoLookup {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "web-search")]
impl Default for DuckDuckGoLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "web-search")]
#[async_trait]
impl WebLookup for DuckDuckGoLookup {
    async fn lookup(&self, term: &str, limit: usize) -> Result<Vec<WebHit>> {
        use crate::types::ResearchError;

        if term.trim().is_empty() {
            return Err(ResearchError::InvalidInput(
                "Search term must not be empty".to_string(),
            ));
        }

        let search_args = daedra::SearchArgs {
            query: term.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: limit,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| ResearchError::Internal(format!("Search failed: {}", e)))?;

        Ok(response
            .data
            .iter()
            .take(limit)
            .map(|r| WebHit {
                title: r.title.clone(),
                url: r.url.clone(),
                description: r.description.clone(),
            })
            .collect())
    }
}
