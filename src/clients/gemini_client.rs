//! Cliente HTTP para Gemini (Google Generative Language API)
//!
//! Una sola llamada `generateContent` por petición, con o sin la herramienta
//! de búsqueda web (grounding). No hay reintentos aquí; el fallback sin
//! grounding lo decide `GenerationService`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ContentGenerator, GenerationRequest};
use crate::config::ProviderConfig;
use crate::utils::errors::GenerationError;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Cliente para Gemini
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| {
                GenerationError::NotConfigured("GEMINI_API_KEY is not set".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        let tools = if request.grounded {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            tools,
        }
    }

    /// Unir las partes de texto del primer candidato
    fn extract_text(response: GenerateContentResponse) -> Option<String> {
        let text = response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[async_trait::async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        info!(
            "🤖 Llamando a Gemini (modelo: {}, grounding: {})",
            self.model, request.grounded
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await?;

        let status = response.status();
        debug!("📡 Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Gemini falló con status {}: {}", status, body);
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = Self::extract_text(parsed).ok_or(GenerationError::EmptyResponse)?;

        info!("✅ Gemini devolvió {} caracteres", text.len());
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            api_key: Some("test-key".to_string()),
            base_url: "https://example.test/".to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        let result = GeminiClient::new(&ProviderConfig::default());
        assert!(matches!(result, Err(GenerationError::NotConfigured(_))));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let client = GeminiClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_grounded_body_includes_search_tool() {
        let grounded = GeminiClient::build_body(&GenerationRequest::grounded("hello"));
        let value = serde_json::to_value(&grounded).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value["tools"][0]["google_search"].is_object());

        let plain = GeminiClient::build_body(&GenerationRequest::ungrounded("hello"));
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Sunny skies " }, { "text": "in town today." }] }
            }]
        }))
        .unwrap();

        assert_eq!(
            GeminiClient::extract_text(response),
            Some("Sunny skies in town today.".to_string())
        );
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert_eq!(GeminiClient::extract_text(response), None);
    }
}
