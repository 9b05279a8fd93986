//! Gemini generateContent client.
//!
//! The client is deliberately thin: prompt in, raw model text out. The
//! pipeline owns prompt construction and validation of the JSON the model
//! returns.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::traits::TitleGenerator;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str =
    "You are a YouTube SEO and engagement expert who helps creators write better video titles";

/// Gemini API client.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    client: Client,
    base_url: String,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    temperature: f32,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiClient {
    /// Create a new client from configuration.
    pub fn new(config: &CollabConfig) -> CollabResult<Self> {
        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
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
impl TitleGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> CollabResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CollabError::config("Gemini API key not configured"))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        );

        let request = GeminiRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.7,
            },
        };

        debug!(model = %self.model, "Calling Gemini generateContent");
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollabError::api(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| CollabError::malformed(format!("Gemini response envelope: {}", e)))?;

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| CollabError::malformed("No content in Gemini response"))
    }
}
