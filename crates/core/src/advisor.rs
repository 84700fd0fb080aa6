use crate::domain::error::PredictionError;
use crate::domain::portfolio::{validate_features, PortfolioPrediction, StockFeature};
use crate::llm::json::parse_prediction;
use crate::llm::prompt::portfolio_prompt;
use crate::llm::{ResponseFormat, TextGenerator};
use std::sync::Arc;

/// Runs portfolio predictions and chat relays against a text generator.
#[derive(Clone)]
pub struct PortfolioAdvisor {
    llm: Arc<dyn TextGenerator>,
}

impl PortfolioAdvisor {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Ask the model for weights over `features` and return them as a distribution.
    ///
    /// Contract violations come back as [`PredictionError`] inside the
    /// `anyhow::Error`; transport failures as `LlmDiagnosticsError`.
    pub async fn predict(&self, features: &[StockFeature]) -> anyhow::Result<PortfolioPrediction> {
        validate_features(features)?;

        let prompt = portfolio_prompt(features);
        let text = self.llm.generate(&prompt, ResponseFormat::Json).await?;

        let prediction = match parse_prediction(&text, features.len()) {
            Ok(prediction) => prediction,
            Err(err) => {
                tracing::warn!(
                    provider = ?self.llm.provider(),
                    stocks = features.len(),
                    error = %err,
                    "LLM prediction violated the response contract"
                );
                return Err(err.into());
            }
        };

        tracing::info!(
            provider = ?self.llm.provider(),
            stocks = features.len(),
            response_len = text.len(),
            "portfolio prediction ready"
        );
        Ok(prediction)
    }

    /// Relay a free-text message and return the model's answer untouched.
    pub async fn chat(&self, message: &str) -> anyhow::Result<String> {
        if message.trim().is_empty() {
            return Err(PredictionError::EmptyMessage.into());
        }

        let reply = self.llm.generate(message, ResponseFormat::Text).await?;
        tracing::info!(
            provider = ?self.llm.provider(),
            message_len = message.len(),
            reply_len = reply.len(),
            "chat reply ready"
        );
        Ok(reply)
    }
}

impl std::fmt::Debug for PortfolioAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioAdvisor")
            .field("provider", &self.llm.provider())
            .finish()
    }
}
