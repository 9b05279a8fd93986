//! Resend transactional email client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::traits::{Mailer, OutboundEmail, SentEmail};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Resend API client.
pub struct ResendClient {
    api_key: Option<String>,
    from_email: Option<String>,
    client: Client,
    base_url: String,
}

/// `POST /emails` request body.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// `POST /emails` response body.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Error body returned by the Resend API.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl ResendClient {
    /// Create a new client from configuration.
    pub fn new(config: &CollabConfig) -> CollabResult<Self> {
        Ok(Self {
            api_key: config.resend_api_key.clone(),
            from_email: config.resend_from_email.clone(),
            client: Client::builder().timeout(config.request_timeout).build()?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendClient {
    async fn send(&self, email: OutboundEmail) -> CollabResult<SentEmail> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CollabError::config("Resend API key not configured"))?;
        let from = self
            .from_email
            .as_deref()
            .ok_or_else(|| CollabError::config("Resend sender address not configured"))?;

        let request = SendRequest {
            from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        debug!(to = %email.to, subject = %email.subject, "Dispatching email");
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("status {}", status));
            return Err(CollabError::api(format!("Resend API error: {}", message)));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| CollabError::malformed(format!("Resend response: {}", e)))?;

        Ok(SentEmail { id: sent.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn configured() -> CollabConfig {
        CollabConfig {
            resend_api_key: Some("re_key".to_string()),
            resend_from_email: Some("titles@titledoctor.dev".to_string()),
            ..CollabConfig::default()
        }
    }

    fn sample_email() -> OutboundEmail {
        OutboundEmail {
            to: "a@b.com".into(),
            subject: "Improved YouTube Titles for \"My Channel\"".into(),
            text: "report body".into(),
        }
    }

    #[tokio::test]
    async fn test_send_returns_provider_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_key"))
            .and(body_partial_json(json!({
                "from": "titles@titledoctor.dev",
                "to": "a@b.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "re_123" })))
            .mount(&server)
            .await;

        let client = ResendClient::new(&configured())
            .unwrap()
            .with_base_url(server.uri());

        let sent = client.send(sample_email()).await.unwrap();
        assert_eq!(sent.id, "re_123");
    }

    #[tokio::test]
    async fn test_send_error_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Invalid `to` address"
            })))
            .mount(&server)
            .await;

        let client = ResendClient::new(&configured())
            .unwrap()
            .with_base_url(server.uri());

        let err = client.send(sample_email()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid `to` address"));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_fault() {
        let client = ResendClient::new(&CollabConfig::default()).unwrap();
        let err = client.send(sample_email()).await.unwrap_err();
        assert!(matches!(err, CollabError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_sender_is_config_fault() {
        let config = CollabConfig {
            resend_api_key: Some("re_key".to_string()),
            ..CollabConfig::default()
        };
        let client = ResendClient::new(&config).unwrap();
        let err = client.send(sample_email()).await.unwrap_err();
        assert!(matches!(err, CollabError::Config(_)));
    }
}
