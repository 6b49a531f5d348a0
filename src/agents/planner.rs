use crate::agents::AgentSpec;
use crate::llm::{generate_structured, LLMClient};
use crate::types::{Result, SearchPlan, Stage};
use std::sync::Arc;
use tracing::info;

/// Default number of searches the planner is asked for
pub const DEFAULT_SEARCHES_PER_PLAN: usize = 5;

/// Turns a (possibly enhanced) query into a list of web searches
pub struct PlannerAgent {
    llm: Arc<dyn LLMClient>,
    searches_per_plan: usize,
}

impl PlannerAgent {
    pub const NAME: &'static str = "PlannerAgent";

    pub fn new(llm: Arc<dyn LLMClient>, searches_per_plan: usize) -> Self {
        Self {
            llm,
            searches_per_plan,
        }
    }

    pub fn spec(&self) -> AgentSpec {
        AgentSpec::new(
            Self::NAME,
            format!(
                "You are a helpful research assistant. Given a query, come up with a set of web \
                 searches to perform to best answer the query. Output {} terms to query for, \
                 each with the reason it matters to the query.",
                self.searches_per_plan
            ),
        )
    }

    /// Plan the searches for `query`.
    ///
    /// The plan length is whatever the model returns; an empty plan is valid.
    pub async fn plan_searches(&self, query: &str) -> Result<SearchPlan> {
        info!("Planning searches...");
        let plan: SearchPlan =
            generate_structured(self.llm.as_ref(), &self.spec(), &format!("Query: {}", query))
                .await
                .map_err(|e| e.in_stage(Stage::Planning))?;

        info!("Will perform {} searches", plan.len());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResearchError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingLlm {
        reply: Result<String>,
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LLMClient for RecordingLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.generate_with_system("", prompt).await
        }

        async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
            self.inputs.lock().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(e) => Err(ResearchError::LLM(e.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_plan_searches_prefixes_query() {
        let llm = Arc::new(RecordingLlm {
            reply: Ok(r#"{"searches":[{"search_term":"a","rationale":"b"}]}"#.to_string()),
            inputs: Mutex::new(vec![]),
        });
        let planner = PlannerAgent::new(llm.clone(), 5);

        let plan = planner.plan_searches("housing").await.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(llm.inputs.lock().as_slice(), ["Query: housing".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_plan_is_legal() {
        let llm = Arc::new(RecordingLlm {
            reply: Ok(r#"{"searches":[]}"#.to_string()),
            inputs: Mutex::new(vec![]),
        });
        let plan = PlannerAgent::new(llm, 5).plan_searches("q").await.unwrap();
        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_names_planning_stage() {
        let llm = Arc::new(RecordingLlm {
            reply: Err(ResearchError::LLM("timeout".to_string())),
            inputs: Mutex::new(vec![]),
        });
        let err = PlannerAgent::new(llm, 5).plan_searches("q").await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Planning));
    }
}
