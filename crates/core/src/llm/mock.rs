//! Mock generator for tests.

use crate::llm::{Provider, ResponseFormat, TextGenerator};
use std::sync::Mutex;

/// Answers every prompt with a canned result and records what it was asked.
#[derive(Debug)]
pub struct MockGenerator {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, ResponseFormat)>>,
}

impl MockGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            reply: Ok(response.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn calls(&self) -> Vec<(String, ResponseFormat)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    fn provider(&self) -> Provider {
        Provider::Mock
    }

    async fn generate(&self, prompt: &str, format: ResponseFormat) -> anyhow::Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), format));
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
