use crate::agents::AgentSpec;
use crate::llm::LLMClient;
use crate::tools::search::{WebHit, WebLookup};
use crate::types::{ResearchError, Result, SearchItem};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs a single planned search and returns its summary
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, item: &SearchItem) -> Result<String>;
}

/// Searcher backed by the search agent, optionally grounded on live web hits
pub struct LlmSearcher {
    llm: Arc<dyn LLMClient>,
    web: Option<Arc<dyn WebLookup>>,
    web_results: usize,
}

impl LlmSearcher {
    pub const NAME: &'static str = "SearchAgent";

    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            llm,
            web: None,
            web_results: 0,
        }
    }

    /// Fetch `web_results` hits per term before summarizing
    pub fn with_web_lookup(mut self, web: Arc<dyn WebLookup>, web_results: usize) -> Self {
        self.web = Some(web);
        self.web_results = web_results;
        self
    }

    pub fn spec() -> AgentSpec {
        AgentSpec::new(
            Self::NAME,
            "You are a research assistant. Given a search term, you search the web for that term \
             and produce a concise summary of the results. The summary must be 2-3 paragraphs \
             and less than 300 words. Capture the main points. Write succinctly; complete \
             sentences and good grammar are not required. This will be consumed by someone \
             synthesizing a report, so capture the essence and ignore any fluff. Do not include \
             any additional commentary other than the summary itself.",
        )
    }

    fn render_input(item: &SearchItem, hits: &[WebHit]) -> String {
        let mut input = format!(
            "Search term: {}\nReason for searching: {}",
            item.search_term, item.rationale
        );
        if !hits.is_empty() {
            input.push_str("\n\nWeb results:");
            for (i, hit) in hits.iter().enumerate() {
                input.push_str(&format!(
                    "\n{}. {} ({})\n   {}",
                    i + 1,
                    hit.title,
                    hit.url,
                    hit.description
                ));
            }
        }
        input
    }
}

#[async_trait]
impl Searcher for LlmSearcher {
    async fn search(&self, item: &SearchItem) -> Result<String> {
        let hits = match &self.web {
            Some(web) => web.lookup(&item.search_term, self.web_results).await?,
            None => Vec::new(),
        };

        let summary = self
            .llm
            .generate_with_system(&Self::spec().instructions, &Self::render_input(item, &hits))
            .await?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ResearchError::LLM(format!(
                "empty summary for '{}'",
                item.search_term
            )));
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct EchoLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LLMClient for EchoLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok(format!("  summary of {}  ", prompt.lines().next().unwrap_or("")))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct FixedLookup(Vec<WebHit>);

    #[async_trait]
    impl WebLookup for FixedLookup {
        async fn lookup(&self, _term: &str, limit: usize) -> Result<Vec<WebHit>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct BrokenLookup;

    #[async_trait]
    impl WebLookup for BrokenLookup {
        async fn lookup(&self, _term: &str, _limit: usize) -> Result<Vec<WebHit>> {
            Err(ResearchError::Internal("Search failed: offline".to_string()))
        }
    }

    fn item() -> SearchItem {
        SearchItem {
            search_term: "remote work housing prices".to_string(),
            rationale: "price trends".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_without_web_lookup() {
        let llm = Arc::new(EchoLlm {
            prompts: Mutex::new(vec![]),
        });
        let searcher = LlmSearcher::new(llm.clone());

        let summary = searcher.search(&item()).await.unwrap();
        assert_eq!(summary, "summary of Search term: remote work housing prices");
        assert_eq!(
            llm.prompts.lock()[0],
            "Search term: remote work housing prices\nReason for searching: price trends"
        );
    }

    #[tokio::test]
    async fn test_web_hits_are_included_in_prompt() {
        let llm = Arc::new(EchoLlm {
            prompts: Mutex::new(vec![]),
        });
        let hits = vec![
            WebHit {
                title: "Housing report".to_string(),
                url: "https://example.com/a".to_string(),
                description: "Prices fell".to_string(),
            },
            WebHit {
                title: "Ignored".to_string(),
                url: "https://example.com/b".to_string(),
                description: "Over the limit".to_string(),
            },
        ];
        let searcher =
            LlmSearcher::new(llm.clone()).with_web_lookup(Arc::new(FixedLookup(hits)), 1);

        searcher.search(&item()).await.unwrap();
        let prompt = llm.prompts.lock()[0].clone();
        assert!(prompt.contains("1. Housing report (https://example.com/a)"));
        assert!(!prompt.contains("Ignored"));
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_the_task() {
        let llm = Arc::new(EchoLlm {
            prompts: Mutex::new(vec![]),
        });
        let searcher = LlmSearcher::new(llm.clone()).with_web_lookup(Arc::new(BrokenLookup), 3);

        assert!(searcher.search(&item()).await.is_err());
        assert!(llm.prompts.lock().is_empty());
    }
}
