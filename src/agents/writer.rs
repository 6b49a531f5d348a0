use crate::agents::AgentSpec;
use crate::llm::{generate_structured, LLMClient};
use crate::types::{Report, Result, Stage};
use std::sync::Arc;
use tracing::info;

/// Synthesizes the final report from the collected search summaries
pub struct WriterAgent {
    llm: Arc<dyn LLMClient>,
}

impl WriterAgent {
    pub const NAME: &'static str = "WriterAgent";

    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn spec() -> AgentSpec {
        AgentSpec::new(
            Self::NAME,
            "You are a senior researcher tasked with writing a cohesive report for a research \
             query. You will be provided with the original query, any clarifications from the \
             user, and some initial research done by a research assistant. First come up with an \
             outline for the report that describes its structure and flow. Then generate the \
             report and return it as your final output. The report should be in markdown, \
             lengthy and detailed: aim for 5-10 pages of content, at least 1000 words. Also \
             provide a 2-3 sentence summary and a list of suggested follow-up research topics.",
        )
    }

    /// Build the single synthesis prompt
    pub fn render_input(
        query: &str,
        clarification_context: Option<&[String]>,
        search_results: &[String],
    ) -> String {
        let mut parts = vec![format!("Original query: {}", query)];
        if let Some(context) = clarification_context.filter(|c| !c.is_empty()) {
            parts.push(format!("User clarifications: {:?}", context));
        }
        parts.push(format!("Summarized search results: {:?}", search_results));
        parts.join("\n")
    }

    /// Write the report in one backend call; no partial report is ever returned
    pub async fn synthesize(
        &self,
        query: &str,
        clarification_context: Option<&[String]>,
        search_results: &[String],
    ) -> Result<Report> {
        info!(
            results = search_results.len(),
            with_clarifications = clarification_context.is_some_and(|c| !c.is_empty()),
            "Thinking about report..."
        );

        let input = Self::render_input(query, clarification_context, search_results);
        let report: Report = generate_structured(self.llm.as_ref(), &Self::spec(), &input)
            .await
            .map_err(|e| e.in_stage(Stage::Synthesis))?;

        info!("Finished writing report");
        Ok(report)
    }
}
