//! Weight-vector repair for model-produced portfolio predictions.
//!
//! A model asked for weights that "sum to 1" usually gets close but not exact.
//! Vectors within [`WEIGHT_SUM_TOLERANCE`] of 1 are returned untouched; anything
//! further off is rescaled by its sum so relative proportions survive.

use crate::domain::error::PredictionError;
use crate::domain::portfolio::PortfolioPrediction;

/// Maximum distance of `sum(weights)` from 1 that is accepted as-is.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Check that the prediction has one weight per feature, then normalize it.
pub fn enforce_contract(
    prediction: PortfolioPrediction,
    feature_count: usize,
) -> Result<PortfolioPrediction, PredictionError> {
    if prediction.weights.len() != feature_count {
        return Err(PredictionError::InvalidShape {
            expected: feature_count,
            actual: prediction.weights.len(),
        });
    }
    normalize(prediction)
}

/// Make `weights` a probability distribution.
///
/// Negative or non-finite weights are rejected, as is a zero sum (which covers
/// the empty vector). Finite weights whose sum overflows are first scaled by
/// the largest weight. The `analysis` text is never modified.
pub fn normalize(
    mut prediction: PortfolioPrediction,
) -> Result<PortfolioPrediction, PredictionError> {
    for (index, &value) in prediction.weights.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(PredictionError::InvalidWeight { index, value });
        }
    }

    let mut sum: f64 = prediction.weights.iter().sum();
    if sum == 0.0 {
        return Err(PredictionError::DegenerateSum);
    }

    if sum.is_infinite() {
        let max = prediction.weights.iter().copied().fold(0.0, f64::max);
        for w in &mut prediction.weights {
            *w /= max;
        }
        sum = prediction.weights.iter().sum();
    }

    if needs_rescale(sum) {
        for w in &mut prediction.weights {
            *w /= sum;
        }
    }

    Ok(prediction)
}

/// Whether a vector with this sum would be rescaled by [`normalize`].
pub fn needs_rescale(sum: f64) -> bool {
    (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn prediction(weights: Vec<f64>) -> PortfolioPrediction {
        PortfolioPrediction {
            weights,
            analysis: "Stock 1 carries the best Sharpe ratio.".to_string(),
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn rescales_vector_summing_above_tolerance() {
        let out = normalize(prediction(vec![0.5, 0.3, 0.3])).unwrap();
        let sum: f64 = out.weights.iter().sum();
        assert_close(sum, 1.0);
        assert_close(out.weights[0], 0.5 / 1.1);
        assert_close(out.weights[1], 0.3 / 1.1);
        assert_close(out.weights[2], 0.3 / 1.1);
        assert_eq!(out.analysis, "Stock 1 carries the best Sharpe ratio.");
    }

    #[test]
    fn keeps_vector_within_tolerance_unchanged() {
        let input = prediction(vec![0.33, 0.33, 0.34]);
        let out = normalize(input.clone()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn keeps_vector_at_tolerance_edge_unchanged() {
        let input = prediction(vec![0.5, 0.505]);
        let out = normalize(input.clone()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn all_zero_vector_is_degenerate() {
        let err = normalize(prediction(vec![0.0, 0.0, 0.0])).unwrap_err();
        assert_eq!(err, PredictionError::DegenerateSum);
    }

    #[test]
    fn empty_vector_is_degenerate() {
        let err = normalize(prediction(vec![])).unwrap_err();
        assert_eq!(err, PredictionError::DegenerateSum);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = normalize(prediction(vec![0.6, -0.1, 0.5])).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidWeight { index: 1, .. }));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let err = normalize(prediction(vec![0.6, f64::NAN])).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidWeight { index: 1, .. }));
    }

    #[test]
    fn overflowing_sum_still_yields_distribution() {
        let out = normalize(prediction(vec![1e308, 1e308, 1e308])).unwrap();
        let sum: f64 = out.weights.iter().sum();
        assert_close(sum, 1.0);
        for w in &out.weights {
            assert_close(*w, 1.0 / 3.0);
        }
    }

    #[test]
    fn overflowing_sum_keeps_proportions() {
        let out = normalize(prediction(vec![f64::MAX, f64::MAX / 2.0])).unwrap();
        assert_close(out.weights[0], 2.0 / 3.0);
        assert_close(out.weights[1], 1.0 / 3.0);
    }

    #[test]
    fn shape_mismatch_is_reported_not_repaired() {
        let err = enforce_contract(prediction(vec![0.5, 0.5]), 3).unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidShape {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn shape_is_checked_before_sum() {
        let err = enforce_contract(prediction(vec![0.0, 0.0]), 3).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidShape { .. }));
    }

    #[test]
    fn contract_passes_matching_shape_through_normalize() {
        let out = enforce_contract(prediction(vec![2.0, 2.0]), 2).unwrap();
        assert_eq!(out.weights, vec![0.5, 0.5]);
    }

    proptest! {
        #[test]
        fn rescaled_vectors_sum_to_one_and_keep_proportions(
            weights in prop::collection::vec(0.0f64..10.0, 1..12)
        ) {
            let sum: f64 = weights.iter().sum();
            prop_assume!(sum > 1e-6 && needs_rescale(sum));

            let out = normalize(prediction(weights.clone())).unwrap();
            let out_sum: f64 = out.weights.iter().sum();
            prop_assert!((out_sum - 1.0).abs() < 1e-9);

            for i in 0..weights.len() {
                for j in 0..weights.len() {
                    if weights[j] > 1e-9 {
                        let before = weights[i] / weights[j];
                        let after = out.weights[i] / out.weights[j];
                        prop_assert!((before - after).abs() <= 1e-9 * before.abs().max(1.0));
                    }
                }
            }
        }

        #[test]
        fn vectors_within_tolerance_are_untouched(
            raw in prop::collection::vec(0.01f64..1.0, 1..12),
            scale in 0.995f64..1.005,
        ) {
            let raw_sum: f64 = raw.iter().sum();
            let weights: Vec<f64> = raw.iter().map(|w| w / raw_sum * scale).collect();
            let sum: f64 = weights.iter().sum();
            prop_assert!(!needs_rescale(sum));

            let out = normalize(prediction(weights.clone())).unwrap();
            prop_assert_eq!(out.weights, weights);
        }

        #[test]
        fn huge_weights_normalize_to_one(
            weights in prop::collection::vec(1e306f64..1.7e308, 2..12)
        ) {
            let out = normalize(prediction(weights)).unwrap();
            let out_sum: f64 = out.weights.iter().sum();
            prop_assert!((out_sum - 1.0).abs() < 1e-9);
            prop_assert!(out.weights.iter().all(|w| w.is_finite() && *w > 0.0));
        }

        #[test]
        fn normalize_is_idempotent(
            weights in prop::collection::vec(0.0f64..10.0, 1..12)
        ) {
            let sum: f64 = weights.iter().sum();
            prop_assume!(sum > 1e-6);

            let once = normalize(prediction(weights)).unwrap();
            let twice = normalize(once.clone()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
