//! Report delivery
//!
//! After synthesis the report is handed to a [`Notifier`], which renders it
//! into a [`Notification`] and passes it to a pluggable transport:
//!
//! - [`LogTransport`] - writes the notification to the log (default)
//! - [`SendGridTransport`] - sends an email through the SendGrid v3 API
//!
//! Delivery failures are reported as
//! [`ResearchError::Notification`]; the coordinator treats them as non-fatal.

pub mod sendgrid;

pub use sendgrid::SendGridTransport;

use crate::types::{Report, ResearchError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Longest subject line, in characters
pub const MAX_SUBJECT_CHARS: usize = 120;

/// A rendered report ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Subject is the first line of the summary, body is the narrative
    pub fn from_report(report: &Report) -> Self {
        let first_line = report.summary.lines().next().unwrap_or_default().trim();
        let subject = if first_line.is_empty() {
            "Research report".to_string()
        } else {
            first_line.chars().take(MAX_SUBJECT_CHARS).collect()
        };

        Self {
            subject,
            body: report.narrative.clone(),
        }
    }
}

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Delivers a finished report through its transport
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn NotificationTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self { transport }
    }

    /// Notifier backed by [`LogTransport`]
    pub fn log() -> Self {
        Self::new(Arc::new(LogTransport))
    }

    pub async fn notify(&self, report: &Report) -> Result<()> {
        let notification = Notification::from_report(report);
        info!(transport = self.transport.name(), subject = %notification.subject, "Sending notification");

        self.transport
            .deliver(&notification)
            .await
            .map_err(|e| match e {
                ResearchError::Notification(_) => e,
                other => ResearchError::Notification(other.to_string()),
            })?;

        info!(transport = self.transport.name(), "Notification sent");
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them anywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        info!(
            subject = %notification.subject,
            body_chars = notification.body.chars().count(),
            "Report ready"
        );
        Ok(())
    }
}
