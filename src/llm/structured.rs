//! Structured generation
//!
//! Every stage asks the same backend for a different output shape. The shape
//! is the Rust type itself: its JSON schema (via `schemars`) is appended to
//! the agent instructions, and the reply is parsed back into the type.
//!
//! ```rust,ignore
//! let plan: SearchPlan = generate_structured(llm.as_ref(), &PLANNER, "Query: rust async").await?;
//! ```

use crate::agents::AgentSpec;
use crate::llm::client::LLMClient;
use crate::types::{ResearchError, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// A value a backend can be asked to produce
pub trait OutputShape: DeserializeOwned + JsonSchema {}

impl<T: DeserializeOwned + JsonSchema> OutputShape for T {}

/// JSON schema text describing `T`
pub fn shape_descriptor<T: OutputShape>() -> Result<String> {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| ResearchError::Internal(format!("Failed to render output schema: {}", e)))
}

/// Run `agent` over `input` and parse the reply as `T`
pub async fn generate_structured<T: OutputShape>(
    llm: &dyn LLMClient,
    agent: &AgentSpec,
    input: &str,
) -> Result<T> {
    let system = format!(
        "{}\n\nRespond with a single JSON object that conforms to this JSON schema. \
         Do not include any other text.\n{}",
        agent.instructions,
        shape_descriptor::<T>()?
    );

    tracing::debug!(agent = agent.name, model = llm.model_name(), "Requesting structured output");
    let raw = llm.generate_with_system(&system, input).await?;
    parse_structured(&raw)
}

/// Parse a model reply into `T`, tolerating markdown code fences and
/// surrounding prose.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<T>(cleaned) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // Fall back to the outermost JSON object embedded in prose
            let embedded = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if start < end => &cleaned[start..=end],
                _ => return Err(ResearchError::Parse(first_err.to_string())),
            };
            serde_json::from_str::<T>(embedded)
                .map_err(|e| ResearchError::Parse(e.to_string()))
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.trim_end_matches("```").trim()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Report, SearchPlan};

    #[test]
    fn test_parse_plain_json() {
        let plan: SearchPlan = parse_structured(
            r#"{"searches":[{"search_term":"rust","rationale":"language"}]}"#,
        )
        .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.searches[0].search_term, "rust");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"summary\":\"s\",\"narrative\":\"n\",\"follow_ups\":[\"a\"]}\n```";
        let report: Report = parse_structured(raw).unwrap();
        assert_eq!(report.narrative, "n");
        assert_eq!(report.follow_ups, vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let raw = "Here is the plan:\n{\"searches\":[]}\nLet me know!";
        let plan: SearchPlan = parse_structured(raw).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_parse_wrong_shape_is_error() {
        let result = parse_structured::<Report>(r#"{"searches":[]}"#);
        assert!(matches!(result, Err(ResearchError::Parse(_))));

        let result = parse_structured::<Report>("I could not do that.");
        assert!(matches!(result, Err(ResearchError::Parse(_))));
    }

    #[test]
    fn test_shape_descriptor_names_fields() {
        let schema = shape_descriptor::<SearchPlan>().unwrap();
        assert!(schema.contains("searches"));
        assert!(schema.contains("search_term"));
        assert!(schema.contains("rationale"));
    }
}
