//! Mock implementations for testing.
//!
//! This module provides a scripted LLM client plus recording notification
//! and correlation sinks that can be used across different test files
//! without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use deep_research::notify::{Notification, NotificationTransport};
use deep_research::research::{CorrelationSink, ScopeKey};
use deep_research::{LLMClient, Report, ResearchError, Result};
use parking_lot::Mutex;
use serde_json::json;

/// Which stage a backend call came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    Clarification,
    Planning,
    Search,
    Synthesis,
    Unknown,
}

impl CallSite {
    fn classify(system: &str, prompt: &str) -> Self {
        if prompt.starts_with("Search term:") {
            CallSite::Search
        } else if prompt.starts_with("Original query:") {
            CallSite::Synthesis
        } else if system.contains("clarification agent") {
            CallSite::Clarification
        } else if system.contains("web searches to perform") {
            CallSite::Planning
        } else {
            CallSite::Unknown
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub site: CallSite,
    pub system: String,
    pub prompt: String,
}

/// LLM client that answers each stage from a script and records every call.
///
/// # Examples
///
/// ```ignore
/// let llm = ScriptedLlm::new()
///     .with_clarifications(&[("Which city?", "city housing")])
///     .with_searches(&["rents", "commutes"])
///     .failing_search("commutes");
/// ```
pub struct ScriptedLlm {
    clarifications: Vec<(String, String)>,
    searches: Vec<String>,
    failing_terms: Vec<String>,
    failing_sites: Vec<CallSite>,
    report: Report,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            clarifications: vec![
                ("Which region?".to_string(), "region housing".to_string()),
                ("Which time period?".to_string(), "housing since 2020".to_string()),
                ("Rentals or ownership?".to_string(), "rent vs own".to_string()),
            ],
            searches: vec!["housing prices".to_string(), "remote work".to_string()],
            failing_terms: Vec::new(),
            failing_sites: Vec::new(),
            report: sample_report(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_clarifications(mut self, items: &[(&str, &str)]) -> Self {
        self.clarifications = items
            .iter()
            .map(|(q, t)| (q.to_string(), t.to_string()))
            .collect();
        self
    }

    pub fn with_searches(mut self, terms: &[&str]) -> Self {
        self.searches = terms.iter().map(|t| t.to_string()).collect();
        self
    }

    /// The search task for `term` fails
    pub fn failing_search(mut self, term: &str) -> Self {
        self.failing_terms.push(term.to_string());
        self
    }

    /// Every call from `site` fails
    pub fn failing_at(mut self, site: CallSite) -> Self {
        self.failing_sites.push(site);
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, site: CallSite) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.site == site)
            .cloned()
            .collect()
    }

    pub fn count(&self, site: CallSite) -> usize {
        self.calls_to(site).len()
    }

    fn respond(&self, site: CallSite, prompt: &str) -> Result<String> {
        if self.failing_sites.contains(&site) {
            return Err(ResearchError::LLM(format!("{:?} backend unavailable", site)));
        }

        match site {
            CallSite::Clarification => Ok(json!({
                "items": self.clarifications.iter().map(|(q, t)| json!({
                    "question": q,
                    "search_term": t,
                })).collect::<Vec<_>>()
            })
            .to_string()),
            CallSite::Planning => Ok(format!(
                "```json\n{}\n```",
                json!({
                    "searches": self.searches.iter().map(|t| json!({
                        "search_term": t,
                        "rationale": format!("Needed to understand {}", t),
                    })).collect::<Vec<_>>()
                })
            )),
            CallSite::Search => {
                let term = prompt
                    .lines()
                    .next()
                    .and_then(|line| line.strip_prefix("Search term: "))
                    .unwrap_or_default();
                if self.failing_terms.iter().any(|t| t == term) {
                    Err(ResearchError::LLM(format!("search for '{}' failed", term)))
                } else {
                    Ok(format!("Summary for {}", term))
                }
            }
            CallSite::Synthesis => Ok(serde_json::to_string(&self.report)
                .map_err(|e| ResearchError::Internal(e.to_string()))?),
            CallSite::Unknown => Err(ResearchError::LLM("unscripted call".to_string())),
        }
    }
}

#[async_trait]
impl LLMClient for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let site = CallSite::classify(system, prompt);
        self.calls.lock().push(RecordedCall {
            site,
            system: system.to_string(),
            prompt: prompt.to_string(),
        });
        self.respond(site, prompt)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn sample_report() -> Report {
    Report {
        summary: "Remote work pushed demand out of city centers.\nRents followed.".to_string(),
        narrative: "# Remote work and urban housing\n\nDemand moved to the suburbs.".to_string(),
        follow_ups: vec!["Office conversions".to_string()],
    }
}

/// Notification transport that records what it delivers
#[derive(Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.delivered.lock().push(notification.clone());
        if self.fail {
            return Err(ResearchError::Notification("mailbox full".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEvent {
    Open(ScopeKey),
    Close(ScopeKey),
}

/// Correlation sink that records every scope boundary
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ScopeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScopeEvent> {
        self.events.lock().clone()
    }

    pub fn opened(&self) -> Vec<ScopeKey> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ScopeEvent::Open(key) => Some(key.clone()),
                ScopeEvent::Close(_) => None,
            })
            .collect()
    }
}

impl CorrelationSink for RecordingSink {
    fn open(&self, key: &ScopeKey) -> Result<()> {
        self.events.lock().push(ScopeEvent::Open(key.clone()));
        Ok(())
    }

    fn close(&self, key: &ScopeKey) -> Result<()> {
        self.events.lock().push(ScopeEvent::Close(key.clone()));
        Ok(())
    }
}
