use crate::domain::contract::LlmPortfolioPrediction;
use crate::domain::error::PredictionError;
use crate::domain::portfolio::PortfolioPrediction;

/// Pull the JSON object out of model text that may be fenced or wrapped in prose.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Drop the opening fence line (```json or ```) and the closing fence.
        let mut inner = trimmed
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or("");
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim());
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim())
}

/// Decode model text into the raw prediction shape without any contract checks.
pub fn decode_prediction(text: &str) -> Result<LlmPortfolioPrediction, PredictionError> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim());
    serde_json::from_str::<LlmPortfolioPrediction>(json_str)
        .map_err(|e| PredictionError::MalformedUpstream(format!("{e}: {json_str}")))
}

/// Decode model text into a prediction and enforce shape and normalization.
pub fn parse_prediction(
    text: &str,
    feature_count: usize,
) -> Result<PortfolioPrediction, PredictionError> {
    decode_prediction(text)?.validate_and_into_prediction(feature_count)
}
