use crate::domain::error::PredictionError;
use crate::domain::normalize::enforce_contract;
use crate::domain::portfolio::PortfolioPrediction;
use serde::{Deserialize, Serialize};

/// Prediction exactly as the model emitted it, before any checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmPortfolioPrediction {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub analysis: String,
}

impl LlmPortfolioPrediction {
    pub fn validate_and_into_prediction(
        self,
        feature_count: usize,
    ) -> Result<PortfolioPrediction, PredictionError> {
        let prediction = PortfolioPrediction {
            weights: self.weights,
            analysis: self.analysis,
        };
        enforce_contract(prediction, feature_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_analysis_and_normalizes() {
        let raw = LlmPortfolioPrediction {
            weights: vec![1.0, 1.0, 2.0],
            analysis: "Balanced toward stock 3.".to_string(),
        };
        let out = raw.validate_and_into_prediction(3).unwrap();
        assert_eq!(out.weights, vec![0.25, 0.25, 0.5]);
        assert_eq!(out.analysis, "Balanced toward stock 3.");
    }

    #[test]
    fn wrong_length_is_invalid_shape() {
        let raw = LlmPortfolioPrediction {
            weights: vec![0.5, 0.5],
            analysis: String::new(),
        };
        let err = raw.validate_and_into_prediction(3).unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidShape {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn missing_analysis_defaults_to_empty() {
        let raw: LlmPortfolioPrediction =
            serde_json::from_str(r#"{"weights":[0.4,0.6]}"#).unwrap();
        assert_eq!(raw.analysis, "");
    }
}
