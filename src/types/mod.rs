use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============= Correlation =============

/// Opaque identifier linking every call of one logical research workflow.
///
/// Generated once by [`ResearchCoordinator::start`](crate::research::ResearchCoordinator::start)
/// and carried verbatim through the suspend/resume boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh identifier (`trace_` followed by 32 hex digits)
    pub fn generate() -> Self {
        Self(format!("trace_{}", Uuid::new_v4().simple()))
    }

    /// Wrap an identifier received from a caller
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============= Clarification Types =============

/// A single clarification question and the search term it suggests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarificationItem {
    /// Your clarification question for an optimized deep search of the query.
    pub question: String,
    /// The search term to use for the web search.
    pub search_term: String,
}

/// Fixed-size, ordered list of clarifications produced once per workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarificationPlan {
    /// Clarification questions to ask before researching the query.
    pub items: Vec<ClarificationItem>,
}

impl ClarificationPlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.question.as_str())
    }
}

// ============= Search Types =============

/// A single planned web search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    /// The search term to use for the web search.
    pub search_term: String,
    /// Your reasoning for why this search is important to the query.
    pub rationale: String,
}

/// Ordered list of searches derived from a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchPlan {
    /// A list of web searches to perform to best answer the query.
    pub searches: Vec<SearchItem>,
}

impl SearchPlan {
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

// ============= Report Types =============

/// The terminal artifact of a research workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// A short 2-3 sentence summary of the findings.
    pub summary: String,
    /// The final report in markdown.
    pub narrative: String,
    /// Suggested topics to research further.
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

// ============= Workflow State =============

/// The minimal state handed back to the caller when the workflow suspends
/// for clarification answers.
///
/// The coordinator keeps nothing between calls: the caller must supply this
/// value back unchanged to [`resume`](crate::research::ResearchCoordinator::resume).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub correlation_id: CorrelationId,
    pub original_query: String,
    pub clarification_plan: ClarificationPlan,
    pub started_at: DateTime<Utc>,
}

/// Full state of one workflow instance, advanced by value through each stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub correlation_id: CorrelationId,
    pub original_query: String,
    #[serde(default)]
    pub clarification_plan: ClarificationPlan,
    /// Aligned by index with `clarification_plan`
    #[serde(default)]
    pub user_answers: Vec<String>,
    #[serde(default)]
    pub search_plan: SearchPlan,
    /// Completion order, not plan order
    #[serde(default)]
    pub search_results: Vec<String>,
    #[serde(default)]
    pub report: Option<Report>,
}

impl WorkflowState {
    /// Rebuild the working state from a snapshot and the collected answers
    pub fn from_snapshot(snapshot: WorkflowSnapshot, user_answers: Vec<String>) -> Self {
        Self {
            correlation_id: snapshot.correlation_id,
            original_query: snapshot.original_query,
            clarification_plan: snapshot.clarification_plan,
            user_answers,
            search_plan: SearchPlan::default(),
            search_results: Vec::new(),
            report: None,
        }
    }

    /// State for the direct path, which has no clarification step
    pub fn direct(correlation_id: CorrelationId, query: &str) -> Self {
        Self {
            correlation_id,
            original_query: query.to_string(),
            clarification_plan: ClarificationPlan::default(),
            user_answers: Vec::new(),
            search_plan: SearchPlan::default(),
            search_results: Vec::new(),
            report: None,
        }
    }
}

// ============= Progress Events =============

/// Milestones yielded while a workflow advances.
///
/// The last event of a successful run is always [`ProgressEvent::Completed`],
/// whose display form is the report narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    EnhancedQueryBuilt { answered: usize },
    PlanningSearches,
    SearchesPlanned { count: usize },
    SearchesComplete { succeeded: usize, attempted: usize },
    ReportWritten,
    NotificationSent,
    /// Notification failed; the report is still delivered
    NotificationFailed { reason: String },
    Completed(Box<WorkflowState>),
}

impl ProgressEvent {
    /// The report carried by the terminal event
    pub fn report(&self) -> Option<&Report> {
        match self {
            ProgressEvent::Completed(state) => state.report.as_ref(),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Completed(_))
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::EnhancedQueryBuilt { answered } => write!(
                f,
                "Enhanced query created with {} clarification answers",
                answered
            ),
            ProgressEvent::PlanningSearches => f.write_str("Planning searches..."),
            ProgressEvent::SearchesPlanned { count } => {
                write!(f, "{} searches planned, starting to search...", count)
            }
            ProgressEvent::SearchesComplete {
                succeeded,
                attempted,
            } => write!(
                f,
                "Searches complete ({}/{} succeeded), writing report...",
                succeeded, attempted
            ),
            ProgressEvent::ReportWritten => f.write_str("Report written, sending notification..."),
            ProgressEvent::NotificationSent => f.write_str("Notification sent, research complete"),
            ProgressEvent::NotificationFailed { reason } => write!(
                f,
                "Notification failed ({}), research complete",
                reason
            ),
            ProgressEvent::Completed(state) => match &state.report {
                Some(report) => f.write_str(&report.narrative),
                None => Ok(()),
            },
        }
    }
}

// ============= Error Types =============

/// Workflow stage, attached to generation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Clarification,
    Planning,
    Search,
    Synthesis,
    Notification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clarification => "clarification",
            Stage::Planning => "planning",
            Stage::Search => "search",
            Stage::Synthesis => "synthesis",
            Stage::Notification => "notification",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `missing` holds zero-based indices into the clarification plan
    #[error("Please answer all questions. Missing answers for question(s): {}", one_based(.missing))]
    IncompleteAnswers { missing: Vec<usize> },

    #[error("{stage} stage failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: Box<ResearchError>,
    },

    #[error("Search task {index} failed: {reason}")]
    SearchTask { index: usize, reason: String },

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Could not parse model output: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResearchError {
    /// Attribute a backend failure to the stage that requested it.
    ///
    /// Errors that already carry a stage, and pre-stage validation errors,
    /// pass through unchanged.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            ResearchError::LLM(_) | ResearchError::Parse(_) | ResearchError::Internal(_) => {
                ResearchError::Generation {
                    stage,
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }

    /// The stage a generation failure belongs to
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ResearchError::Generation { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn one_based(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| (i + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ResearchError>;
