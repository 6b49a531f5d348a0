//! # deep-research
//!
//! A research workflow coordinator that turns a free-text query into a
//! synthesized markdown report. Every stage is driven by a text-generation
//! backend behind the [`LLMClient`] trait.
//!
//! ## Overview
//!
//! deep-research can be used in two ways:
//!
//! 1. **As a CLI** - Run the `deep-research` binary
//! 2. **As a library** - Embed the [`ResearchCoordinator`] in your own service
//!
//! The interactive workflow is split into two calls so it can span a
//! request/response boundary:
//!
//! - [`ResearchCoordinator::start`] asks clarification questions and returns
//!   a serializable [`WorkflowSnapshot`]
//! - [`ResearchCoordinator::resume`] takes the snapshot back with the user's
//!   answers and streams [`ProgressEvent`]s until the report is ready
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use deep_research::{Provider, ResearchCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::Ollama {
//!         base_url: "http://localhost:11434".to_string(),
//!         model: "llama3.2".to_string(),
//!     };
//!
//!     let coordinator = ResearchCoordinator::new(provider.create_client().await?);
//!     let report = coordinator
//!         .run_direct("Impact of remote work on urban housing")
//!         .await?;
//!
//!     println!("{}", report.narrative);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API support |
//! | `web-search` | DuckDuckGo lookup for search tasks (default) |
//!
//! ## Modules
//!
//! - [`agents`] - One agent per backend call site
//! - [`cli`] - Command-line parsing and output
//! - [`llm`] - LLM client implementations and structured generation
//! - [`notify`] - Report delivery
//! - [`research`] - Workflow coordinator, concurrent search, correlation scopes
//! - [`tools`] - Web lookup
//! - [`types`] - Data model and error handling
//! - [`utils`] - `research.toml` configuration

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Research agents (clarification, planning, search, writing).
pub mod agents;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Report notification transports.
pub mod notify;
/// Research workflow coordination.
pub mod research;
/// Built-in tools (web search).
pub mod tools;
/// Core types (workflow state, progress events, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use agents::{ClarificationAgent, LlmSearcher, PlannerAgent, Searcher, WriterAgent};
pub use llm::{LLMClient, LLMClientFactory, Provider};
pub use notify::{Notification, NotificationTransport, Notifier};
pub use research::{
    CorrelationSink, GatherOptions, ProgressStream, ResearchCoordinator,
    ResearchCoordinatorBuilder, ScopeKey,
};
pub use types::{
    ClarificationPlan, CorrelationId, ProgressEvent, Report, ResearchError, Result, SearchPlan,
    WorkflowSnapshot, WorkflowState,
};
pub use utils::toml_config::{ConfigError, ResearchConfig};
