use crate::agents::AgentSpec;
use crate::llm::{generate_structured, LLMClient};
use crate::types::{ClarificationPlan, ResearchError, Result, Stage};
use std::sync::Arc;
use tracing::info;

/// Default number of clarification questions per workflow
pub const DEFAULT_CLARIFICATION_QUESTIONS: usize = 3;

/// Produces the clarification questions asked before research begins
pub struct ClarificationAgent {
    llm: Arc<dyn LLMClient>,
}

impl ClarificationAgent {
    pub const NAME: &'static str = "ClarificationAgent";

    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn spec(count: usize) -> AgentSpec {
        AgentSpec::new(
            Self::NAME,
            format!(
                "You are a clarification agent. Given a research query, write exactly {count} \
                 clarification questions whose answers would most improve a deep web search for \
                 the query. Pair each question with a search term to query for."
            ),
        )
    }

    /// Generate exactly `count` clarification pairs for `query`.
    ///
    /// A reply with fewer than `count` items is a generation failure; extra
    /// items are dropped.
    pub async fn generate_clarifications(
        &self,
        query: &str,
        count: usize,
    ) -> Result<ClarificationPlan> {
        if count == 0 {
            return Ok(ClarificationPlan::default());
        }

        info!("Generating {} clarification questions", count);
        let mut plan: ClarificationPlan = generate_structured(
            self.llm.as_ref(),
            &Self::spec(count),
            &format!("Query: {}", query),
        )
        .await
        .map_err(|e| e.in_stage(Stage::Clarification))?;

        if plan.len() < count {
            return Err(ResearchError::Parse(format!(
                "expected {} clarification questions, model returned {}",
                count,
                plan.len()
            ))
            .in_stage(Stage::Clarification));
        }
        plan.items.truncate(count);

        Ok(plan)
    }
}
