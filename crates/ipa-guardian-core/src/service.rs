use ipa_guardian_api::Schema;

use crate::Result;

/// The generation service as the pipeline sees it
///
/// Production code talks to Gemini through `GeminiProvider`; tests swap in a
/// mock so no request leaves the process.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Send `prompt` and `schema`, returning the raw JSON text the service produced
    async fn generate_json(&self, prompt: &str, schema: &Schema) -> Result<String>;
}
