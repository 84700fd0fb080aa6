use crate::domain::error::PredictionError;
use serde::{Deserialize, Serialize};

/// One stock's summary statistics as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFeature {
    pub returns: f64,
    pub risk: f64,
    pub sharpe_ratio: f64,
}

/// Allocation suggested for a list of stocks, one weight per stock in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPrediction {
    pub weights: Vec<f64>,
    pub analysis: String,
}

impl StockFeature {
    pub fn new(returns: f64, risk: f64, sharpe_ratio: f64) -> Self {
        Self {
            returns,
            risk,
            sharpe_ratio,
        }
    }
}

pub fn validate_features(features: &[StockFeature]) -> Result<(), PredictionError> {
    if features.is_empty() {
        return Err(PredictionError::InvalidFeatures(
            "features must not be empty".to_string(),
        ));
    }

    for (i, f) in features.iter().enumerate() {
        let fields = [
            ("returns", f.returns),
            ("risk", f.risk),
            ("sharpeRatio", f.sharpe_ratio),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictionError::InvalidFeatures(format!(
                "stock {} has non-finite {name}: {value}",
                i + 1
            )));
        }
    }

    Ok(())
}
