//! Research workflow coordination
//!
//! A workflow turns a free-text query into a report in two phases:
//!
//! 1. **Start** - generate clarification questions, then suspend and hand the
//!    caller a [`WorkflowSnapshot`](crate::types::WorkflowSnapshot)
//! 2. **Resume** - validate the answers, build the enhanced query, then plan,
//!    search concurrently, synthesize and notify, yielding a progress event
//!    per stage
//!
//! The direct path ([`ResearchCoordinator::run_direct`]) skips clarification
//! and plans from the raw query.
//!
//! # Usage
//!
//! ```ignore
//! use deep_research::research::ResearchCoordinator;
//! use futures::StreamExt;
//!
//! let coordinator = ResearchCoordinator::new(llm);
//!
//! let snapshot = coordinator.start("Impact of remote work on urban housing").await?;
//! for question in snapshot.clarification_plan.questions() {
//!     println!("{}", question);
//! }
//!
//! let mut events = coordinator.resume(snapshot, answers)?;
//! while let Some(event) = events.next().await {
//!     println!("{}", event?);
//! }
//! ```

/// Workflow coordinator and its builder.
pub mod coordinator;
/// Enhanced query construction from clarification answers.
pub mod enhance;
/// Search stage execution.
pub mod execution;
/// Best-effort concurrent gather.
pub mod gather;
/// Correlation scopes for diagnostics.
pub mod scope;

pub use coordinator::{ProgressStream, ResearchCoordinator, ResearchCoordinatorBuilder};
pub use execution::SearchExecutor;
pub use gather::{best_effort_gather, GatherOptions};
pub use scope::{CorrelationSink, ScopeGuard, ScopeKey, TracingSink};
