//! Merging clarification answers into the research query

use crate::types::ClarificationPlan;

/// Header line separating the original query from the clarifications
pub const CLARIFICATIONS_HEADER: &str = "\nUser provided clarifications:";

/// Combine the original query with every non-blank answer, in plan order.
///
/// With no usable answers the result is the original query plus the header.
pub fn build_enhanced_query(
    original: &str,
    plan: &ClarificationPlan,
    answers: &[String],
) -> String {
    let mut parts = vec![
        format!("Original Query: {}", original),
        CLARIFICATIONS_HEADER.to_string(),
    ];
    parts.extend(
        answered(plan, answers).map(|(question, answer)| format!("- {}: {}", question, answer)),
    );
    parts.join("\n")
}

/// `"<question>: <answer>"` lines handed to the report writer
pub fn clarification_context(plan: &ClarificationPlan, answers: &[String]) -> Vec<String> {
    answered(plan, answers)
        .map(|(question, answer)| format!("{}: {}", question, answer))
        .collect()
}

/// Zero-based indices of plan entries without a non-blank answer
pub fn missing_answers(plan: &ClarificationPlan, answers: &[String]) -> Vec<usize> {
    (0..plan.len())
        .filter(|&i| answers.get(i).is_none_or(|a| a.trim().is_empty()))
        .collect()
}

fn answered<'a>(
    plan: &'a ClarificationPlan,
    answers: &'a [String],
) -> impl Iterator<Item = (&'a str, &'a str)> {
    plan.items
        .iter()
        .zip(answers)
        .filter(|(_, answer)| !answer.trim().is_empty())
        .map(|(item, answer)| (item.question.as_str(), answer.as_str()))
}
