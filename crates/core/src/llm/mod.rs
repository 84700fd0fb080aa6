pub mod error;
pub mod gemini;
pub mod json;
pub mod mock;
pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Mock,
}

/// What the caller expects the model to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// A text-generation service: prompt in, text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate(&self, prompt: &str, format: ResponseFormat) -> anyhow::Result<String>;
}
