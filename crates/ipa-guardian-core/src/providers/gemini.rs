// Gemini provider - bridges the API client with the ContentGenerator trait
use async_trait::async_trait;
use ipa_guardian_api::{GeminiClient, Schema};
use std::time::Duration;

use crate::{config::GeminiConfig, service::ContentGenerator, Error, Result};

/// Wrapper around GeminiClient that implements ContentGenerator
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Build the provider from config, failing fast when the API key is missing
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = GeminiClient::with_base_url(
            api_key,
            config.model.clone(),
            config.api_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
        .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl ContentGenerator for GeminiProvider {
    async fn generate_json(&self, prompt: &str, schema: &Schema) -> Result<String> {
        self.client
            .generate_content(prompt, schema)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_fails_at_construction() {
        let config = GeminiConfig::default();
        assert!(matches!(
            GeminiProvider::from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_provider_uses_configured_model() {
        let config = GeminiConfig {
            api_key: Some("fake-key".to_string()),
            model: "gemini-2.5-pro".to_string(),
            ..GeminiConfig::default()
        };
        let provider = GeminiProvider::from_config(&config).unwrap();
        assert_eq!(provider.model(), "gemini-2.5-pro");
    }
}
