//! Diagnostic correlation scopes
//!
//! Every phase of a workflow (start, resume, direct run) runs inside a scope
//! keyed by its phase name and the workflow's [`CorrelationId`]. A scope key
//! is a pure function of those two values, so resuming the same workflow
//! twice opens the same scope twice.
//!
//! Sinks are observability only: a failing sink is logged and otherwise
//! ignored.

use crate::types::{CorrelationId, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Span};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub name: &'static str,
    pub correlation_id: CorrelationId,
}

impl ScopeKey {
    pub const START: &'static str = "Interactive Research Workflow";
    pub const RESUME: &'static str = "Research continuation";
    pub const DIRECT: &'static str = "Research trace";

    pub fn start(id: &CorrelationId) -> Self {
        Self::new(Self::START, id)
    }

    pub fn resume(id: &CorrelationId) -> Self {
        Self::new(Self::RESUME, id)
    }

    pub fn direct(id: &CorrelationId) -> Self {
        Self::new(Self::DIRECT, id)
    }

    fn new(name: &'static str, id: &CorrelationId) -> Self {
        Self {
            name,
            correlation_id: id.clone(),
        }
    }

    /// Tracing span tagging everything logged inside the scope
    pub fn span(&self) -> Span {
        info_span!(
            "research",
            scope = self.name,
            correlation_id = %self.correlation_id
        )
    }
}

/// Receives the start and end of each traceable region
pub trait CorrelationSink: Send + Sync {
    fn open(&self, key: &ScopeKey) -> Result<()>;
    fn close(&self, key: &ScopeKey) -> Result<()>;
}

/// Default sink: logs scope boundaries and durations through `tracing`.
///
/// The same key may be open more than once (concurrent resumes of one
/// workflow); each close pairs with the most recent open.
#[derive(Default)]
pub struct TracingSink {
    opened: Mutex<HashMap<ScopeKey, Vec<Instant>>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes currently open
    pub fn open_scopes(&self) -> usize {
        self.opened.lock().values().map(Vec::len).sum()
    }
}

impl CorrelationSink for TracingSink {
    fn open(&self, key: &ScopeKey) -> Result<()> {
        self.opened
            .lock()
            .entry(key.clone())
            .or_default()
            .push(Instant::now());
        info!(
            scope = key.name,
            correlation_id = %key.correlation_id,
            "Opened trace scope"
        );
        Ok(())
    }

    fn close(&self, key: &ScopeKey) -> Result<()> {
        let started = {
            let mut opened = self.opened.lock();
            let started = opened.get_mut(key).and_then(Vec::pop);
            if opened.get(key).is_some_and(Vec::is_empty) {
                opened.remove(key);
            }
            started
        };
        let elapsed = started.map(|t| t.elapsed());
        info!(
            scope = key.name,
            correlation_id = %key.correlation_id,
            elapsed_ms = elapsed.map(|d| d.as_millis() as u64),
            "Closed trace scope"
        );
        Ok(())
    }
}

/// Keeps a scope open until dropped
pub struct ScopeGuard {
    sink: Arc<dyn CorrelationSink>,
    key: ScopeKey,
    span: Span,
}

impl ScopeGuard {
    pub fn open(sink: Arc<dyn CorrelationSink>, key: ScopeKey) -> Self {
        if let Err(e) = sink.open(&key) {
            warn!(scope = key.name, "Correlation sink failed to open scope: {}", e);
        }
        let span = key.span();
        Self { sink, key, span }
    }

    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Err(e) = self.sink.close(&self.key) {
            warn!(scope = self.key.name, "Correlation sink failed to close scope: {}", e);
        }
    }
}
