use thiserror::Error;

/// Ways a portfolio prediction can fail its contract.
///
/// These travel inside `anyhow::Error` and are recovered with `downcast_ref`
/// by the callers that need to tell them apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("weights length {actual} does not match features length {expected}")]
    InvalidShape { expected: usize, actual: usize },

    #[error("weights sum to zero; cannot normalize")]
    DegenerateSum,

    #[error("weight at index {index} is not a valid allocation: {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("LLM output does not match the prediction schema: {0}")]
    MalformedUpstream(String),

    #[error("invalid features: {0}")]
    InvalidFeatures(String),

    #[error("message is required")]
    EmptyMessage,
}

impl PredictionError {
    /// True when the fault lies with the model output rather than the caller.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape { .. }
                | Self::DegenerateSum
                | Self::InvalidWeight { .. }
                | Self::MalformedUpstream(_)
        )
    }
}
