//! Research agents
//!
//! One agent per backend call site. Each agent pairs a name and a set of
//! instructions with the output shape it expects back from the model:
//!
//! | Agent | Output shape |
//! |-------|--------------|
//! | [`ClarificationAgent`] | [`ClarificationPlan`](crate::types::ClarificationPlan) |
//! | [`PlannerAgent`] | [`SearchPlan`](crate::types::SearchPlan) |
//! | [`LlmSearcher`] | free text summary |
//! | [`WriterAgent`] | [`Report`](crate::types::Report) |

pub mod clarifier;
pub mod planner;
pub mod searcher;
pub mod writer;

pub use clarifier::ClarificationAgent;
pub use planner::PlannerAgent;
pub use searcher::{LlmSearcher, Searcher};
pub use writer::WriterAgent;

/// Name and instructions for one model call site
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: &'static str,
    pub instructions: String,
}

impl AgentSpec {
    pub fn new(name: &'static str, instructions: impl Into<String>) -> Self {
        Self {
            name,
            instructions: instructions.into(),
        }
    }
}
