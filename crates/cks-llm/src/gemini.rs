//! Gemini HTTP client (`generateContent` endpoint).
//!
//! Default endpoint: `https://generativelanguage.googleapis.com/v1beta`,
//! authenticated with the API key as a query parameter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{LlmError, TextGenerator};

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<u32>,
    message: String,
    status: Option<String>,
}

/// Map a Gemini error payload to a typed error.
fn classify_error(error: ErrorDetail, http_status: u16) -> LlmError {
    let code = error.code.unwrap_or(http_status as u32);
    let status = error.status.as_deref().unwrap_or("");

    if code == 401 || code == 403 || status == "UNAUTHENTICATED" || status == "PERMISSION_DENIED" {
        return LlmError::AuthFailed(error.message);
    }
    if code == 429 || status == "RESOURCE_EXHAUSTED" {
        warn!(message = %error.message, "text-generation service reported quota exhaustion");
        return LlmError::ApiError(format!("service limit reached: {}", error.message));
    }
    LlmError::ApiError(error.message)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, instruction: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(instruction.to_string()),
                }],
            }],
        };

        debug!(model = %self.model, chars = instruction.len(), "requesting text generation");

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let http_status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !http_status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<GenerateResponse>(&body) {
                if let Some(error) = parsed.error {
                    return Err(classify_error(error, http_status.as_u16()));
                }
            }
            return Err(LlmError::ApiError(format!(
                "service error ({http_status}): {body}"
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::ApiError(format!("malformed reply: {e}")))?;

        let text: String = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.0-flash",
            "test-key",
        )
    }

    #[test]
    fn test_generate_url_embeds_model_and_key() {
        let url = test_client().generate_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some("hello".to_string()),
                }],
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"contents":[{"role":"user","parts":[{"text":"hello"}]}]}"#
        );
    }

    #[test]
    fn test_parse_reply_concatenates_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello"}, {"text": ", world"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        let text: String = parsed
            .candidates
            .unwrap()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap();
        assert_eq!(text, "Hello, world");
    }

    #[test]
    fn test_classify_unauthenticated() {
        let err = classify_error(
            ErrorDetail {
                code: Some(401),
                message: "invalid key".into(),
                status: Some("UNAUTHENTICATED".into()),
            },
            401,
        );
        assert!(matches!(err, LlmError::AuthFailed(_)));
    }

    #[test]
    fn test_classify_quota() {
        let err = classify_error(
            ErrorDetail {
                code: None,
                message: "quota exceeded".into(),
                status: Some("RESOURCE_EXHAUSTED".into()),
            },
            429,
        );
        match err {
            LlmError::ApiError(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_generic_error() {
        let err = classify_error(
            ErrorDetail {
                code: Some(500),
                message: "boom".into(),
                status: None,
            },
            500,
        );
        assert!(matches!(err, LlmError::ApiError(_)));
    }
}
