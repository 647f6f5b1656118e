use anyhow::Result;
use async_trait::async_trait;
use shared::settings::ModelSettings;

/// Tunables forwarded to the generation backend. Unset fields fall back to
/// the backend's own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Creativity control, 0.0..=1.0.
    pub temperature: Option<f32>,
    /// Upper bound on reply length.
    pub max_output_tokens: Option<u32>,
}

impl From<&ModelSettings> for GenerationOptions {
    fn from(settings: &ModelSettings) -> Self {
        Self {
            temperature: Some(settings.temperature),
            max_output_tokens: Some(settings.max_output_tokens),
        }
    }
}

/// The external text-generation capability: one prompt in, one text out.
/// Constructed once at startup and injected wherever generation is needed,
/// so tests can substitute their own implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}
