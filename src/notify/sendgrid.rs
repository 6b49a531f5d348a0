use crate::notify::{Notification, NotificationTransport};
use crate::types::{ResearchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Email delivery through the SendGrid v3 mail API
#[derive(Clone, Debug)]
pub struct SendGridTransport {
    http: Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl SendGridTransport {
    pub fn new(
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "SendGrid api key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            http: Client::new(),
            endpoint: SENDGRID_ENDPOINT.to_string(),
            api_key,
            from: from.into(),
            to: to.into(),
        })
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint).map_err(|e| {
            ResearchError::Configuration(format!("invalid SendGrid endpoint: {}", e))
        })?;
        self.endpoint = endpoint;
        Ok(self)
    }

    fn payload(&self, notification: &Notification) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.from },
            "subject": notification.subject,
            "content": [{ "type": "text/plain", "value": notification.body }]
        })
    }
}

#[async_trait]
impl NotificationTransport for SendGridTransport {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(notification))
            .send()
            .await
            .map_err(|e| ResearchError::Notification(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ResearchError::Notification(format!(
            "SendGrid returned {}: {}",
            status, body
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification() -> Notification {
        Notification {
            subject: "Housing report".to_string(),
            body: "narrative".to_string(),
        }
    }

    async fn transport(server: &MockServer) -> SendGridTransport {
        SendGridTransport::new("sg-key", "bot@example.com", "me@example.com")
            .unwrap()
            .with_endpoint(format!("{}/v3/mail/send", server.uri()))
            .unwrap()
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(SendGridTransport::new(" ", "a@b.c", "d@e.f").is_err());
    }

    #[tokio::test]
    async fn test_delivers_mail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer sg-key"))
            .and(body_partial_json(json!({
                "subject": "Housing report",
                "from": { "email": "bot@example.com" }
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server).await.deliver(&notification()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_mail_is_notification_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .deliver(&notification())
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::Notification(ref m) if m.contains("401")));
    }
}
