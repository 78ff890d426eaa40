//! Clients - HTTP Clients for External APIs
//!
//! This module contains the text generation provider client and the
//! `ContentGenerator` seam the generation gate depends on.

pub mod gemini_client;

pub use gemini_client::GeminiClient;

use crate::utils::errors::GenerationError;

/// One request to the text generation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Enable the provider's web search tool
    pub grounded: bool,
}

impl GenerationRequest {
    pub fn grounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: true,
        }
    }

    pub fn ungrounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: false,
        }
    }
}

/// Text generation capability: `generate(prompt) -> text`, may fail
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    fn provider_name(&self) -> &'static str;
}

/// Generator used when no provider API key is configured
///
/// Every call fails, so the gate serves cached content or placeholders.
pub struct UnconfiguredGenerator {
    reason: String,
}

impl UnconfiguredGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContentGenerator for UnconfiguredGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured(self.reason.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "unconfigured"
    }
}
