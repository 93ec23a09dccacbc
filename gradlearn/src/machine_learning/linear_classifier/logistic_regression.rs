// logistic_regression.rs
use itertools::izip;

use super::{
    augment_with_bias, check_len, dot, l2_norm,
    regressor::{RegressionObjective, Regressor},
    training_parameters::RegressorConfig,
};
use crate::machine_learning::regression_error::{RegressionError, Result};

/// Predictions are clipped to `[CLIP, 1 - CLIP]` before taking logarithms.
const CLIP: f64 = 1e-9;

/// Binary logistic regression with an L2 penalty on the weights.
///
/// The loss adds `reg_param / (2n) * ||W||` (the norm, not its square) while the gradient adds
/// `2 * reg_param * W`, and the gradient is computed from the rounded labels rather than the
/// probabilities. Both are kept as is so results stay comparable with earlier runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logistic;

pub type LogisticRegressor = Regressor<Logistic>;

impl Logistic {
    pub fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    pub fn probabilities(weights: &[f64], x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let x = augment_with_bias(x, num_features(weights)?)?;
        Ok(x.iter()
            .map(|features| Self::sigmoid(dot(features, weights)))
            .collect())
    }
}

fn num_features(weights: &[f64]) -> Result<usize> {
    weights
        .len()
        .checked_sub(1)
        .ok_or_else(|| RegressionError::dimension_mismatch("weights", 1, 0))
}

impl RegressionObjective for Logistic {
    type Prediction = u8;

    /// Hard labels. Probabilities of exactly 0.5 round to even, i.e. to 0.
    fn predict(&self, weights: &[f64], x: &[Vec<f64>]) -> Result<Vec<u8>> {
        Ok(Self::probabilities(weights, x)?
            .into_iter()
            .map(|p| p.round_ties_even() as u8)
            .collect())
    }

    fn loss(&self, weights: &[f64], y_true: &[f64], y_pred: &[f64], reg_param: f64) -> Result<f64> {
        check_len("loss", y_true.len(), y_pred.len())?;
        if y_true.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }
        let n = y_true.len() as f64;
        let log_likelihood = y_true
            .iter()
            .zip(y_pred)
            .map(|(y, p)| {
                let p = p.clamp(CLIP, 1.0 - CLIP);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>()
            / n;
        let regularization = reg_param / (2.0 * n) * l2_norm(weights);
        Ok(-log_likelihood + regularization)
    }

    fn gradient(
        &self,
        weights: &[f64],
        y_true: &[f64],
        x: &[Vec<f64>],
        reg_param: f64,
    ) -> Result<Vec<f64>> {
        check_len("gradient", x.len(), y_true.len())?;
        if y_true.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }
        let x = augment_with_bias(x, num_features(weights)?)?;
        let y_pred = self.predict(weights, &x)?;

        let n = y_true.len() as f64;
        let mut cost_grad = vec![0.0; weights.len()];
        for (features, y, pred) in izip!(&x, y_true, &y_pred) {
            let error = y - f64::from(*pred);
            for (grad, feature) in cost_grad.iter_mut().zip(features) {
                *grad += feature * error;
            }
        }
        Ok(cost_grad
            .into_iter()
            .zip(weights)
            .map(|(grad, weight)| -grad / n + 2.0 * reg_param * weight)
            .collect())
    }
}

impl Regressor<Logistic> {
    pub fn logistic(config: RegressorConfig) -> Result<Self> {
        Self::new(Logistic, config)
    }

    /// Probabilities of the positive class at the current weights.
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        Logistic::probabilities(self.weights(), x)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::{ApproxEq, F64Margin};

    use super::*;
    use crate::machine_learning::{
        compare_outputs,
        dataset::{Blob, Dataset},
        linear_classifier::weight_initialization::WeightInitialization,
    };

    const TOY_X: [f64; 10] = [-2.2, -1.4, -0.8, 0.2, 0.4, 0.8, 1.2, 2.2, 2.9, 4.6];
    const TOY_Y: [f64; 10] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    // slope and bias close to what an unregularized fit of the toy data gives
    const TOY_WEIGHTS: [f64; 2] = [1.43, 0.21];

    fn margin() -> F64Margin {
        F64Margin {
            epsilon: 1e-12,
            ulps: 8,
        }
    }

    fn toy_regressor() -> LogisticRegressor {
        let mut config = RegressorConfig::new(1);
        config.seed = Some(16);
        Regressor::with_weights(Logistic, config, TOY_WEIGHTS.to_vec()).unwrap()
    }

    fn toy_x() -> Vec<Vec<f64>> {
        TOY_X.iter().map(|x| vec![*x]).collect()
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(Logistic::sigmoid(0.0), 0.5);
        assert!(Logistic::sigmoid(40.0) > 0.999_999);
        assert!(Logistic::sigmoid(-40.0) < 1e-6);
    }

    #[test]
    fn test_prediction() {
        let regressor = toy_regressor();
        let labels = regressor.predict(&toy_x()).unwrap();
        let expected = TOY_X
            .iter()
            .map(|x| if TOY_WEIGHTS[0] * x + TOY_WEIGHTS[1] > 0.0 { 1 } else { 0 })
            .collect::<Vec<u8>>();
        assert_eq!(labels, expected);
        assert!(labels.iter().all(|label| *label <= 1));

        // pre-augmented rows give the same labels
        let augmented = TOY_X.iter().map(|x| vec![*x, 1.0]).collect::<Vec<_>>();
        assert_eq!(regressor.predict(&augmented).unwrap(), labels);
    }

    #[test]
    fn test_prediction_tie_rounds_to_zero() {
        // sigmoid(0) is exactly 0.5, which rounds half to even
        let mut config = RegressorConfig::new(2);
        config.initialization = WeightInitialization::Zeros;
        let regressor = LogisticRegressor::logistic(config).unwrap();
        let x = vec![vec![1.0, -3.0], vec![0.0, 0.0]];
        assert_eq!(regressor.predict_proba(&x).unwrap(), vec![0.5, 0.5]);
        assert_eq!(regressor.predict(&x).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_prediction_wrong_width() {
        let regressor = toy_regressor();
        let x = vec![vec![1.0, 2.0, 3.0]];
        assert!(matches!(
            regressor.predict(&x),
            Err(RegressionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_loss_function() {
        let regressor = toy_regressor();
        let y_pred = regressor.predict_proba(&toy_x()).unwrap();

        // reference binary cross entropy
        let reference = -TOY_Y
            .iter()
            .zip(&y_pred)
            .map(|(y, p)| if *y == 1.0 { p.ln() } else { (1.0 - p).ln() })
            .sum::<f64>()
            / TOY_Y.len() as f64;
        let loss = regressor.loss(&TOY_Y, &y_pred, 0.0).unwrap();
        assert!(loss.approx_eq(reference, margin()), "{loss} != {reference}");

        // the penalty is the plain norm of the weights, scaled by reg / 2n
        let regularized = regressor.loss(&TOY_Y, &y_pred, 0.5).unwrap();
        let norm = (TOY_WEIGHTS[0].powi(2) + TOY_WEIGHTS[1].powi(2)).sqrt();
        let penalty = 0.5 / 20.0 * norm;
        assert!((regularized - loss - penalty).abs() < 1e-12);
    }

    #[test]
    fn test_loss_clips_hard_labels() {
        let regressor = toy_regressor();
        let loss = regressor.loss(&[0.0, 1.0], &[0.0, 1.0], 0.0).unwrap();
        assert!(loss.is_finite());
        assert!(loss < 1e-8);

        let wrong = regressor.loss(&[1.0, 0.0], &[0.0, 1.0], 0.0).unwrap();
        assert!((wrong - -(1e-9f64).ln()).abs() < 1e-6);
    }

    #[test]
    fn test_loss_shape_errors() {
        let regressor = toy_regressor();
        assert!(matches!(
            regressor.loss(&[1.0, 0.0], &[1.0], 0.0),
            Err(RegressionError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            regressor.loss(&[], &[], 0.0),
            Err(RegressionError::EmptyDataset)
        ));
    }

    #[test]
    fn test_gradient() {
        let regressor = toy_regressor();
        let x = toy_x();
        let labels = regressor.predict(&x).unwrap();

        // reference gradient, written out per example
        let n = TOY_Y.len() as f64;
        let mut reference = [0.0; 2];
        for i in 0..TOY_Y.len() {
            let error = TOY_Y[i] - labels[i] as f64;
            reference[0] -= TOY_X[i] * error / n;
            reference[1] -= error / n;
        }
        let gradient = regressor.gradient(&TOY_Y, &x, 0.0).unwrap();
        assert_eq!(gradient.len(), regressor.weights().len());
        assert!((gradient[0] - reference[0]).abs() < 1e-12);
        assert!((gradient[1] - reference[1]).abs() < 1e-12);

        // the penalty adds 2 * reg * W
        let regularized = regressor.gradient(&TOY_Y, &x, 0.5).unwrap();
        let expected = gradient
            .iter()
            .zip(&TOY_WEIGHTS)
            .map(|(g, w)| g + w)
            .collect::<Vec<_>>();
        assert!(compare_outputs(&regularized, &expected));
    }

    #[test]
    fn test_gradient_uses_rounded_labels() {
        // with every example classified correctly the data term vanishes
        let regressor = toy_regressor();
        let x = vec![vec![-3.0], vec![3.0]];
        let gradient = regressor.gradient(&[0.0, 1.0], &x, 0.0).unwrap();
        assert_eq!(gradient, vec![0.0, 0.0]);
    }

    #[test]
    fn test_training() {
        let dataset = Dataset::gaussian_blobs(
            60,
            Blob::new((-1.5, -1.0), (0.6, 0.6)),
            Blob::new((1.5, 1.0), (0.6, 0.6)),
            16,
        )
        .unwrap();
        let (train, test) = dataset.random_split(0.8, 16).unwrap();

        let mut config = RegressorConfig::new(2);
        config.learning_rate = 0.001;
        config.max_iterations = 1000;
        config.regularization_param = 0.25;
        config.seed = Some(16);
        let mut regressor = LogisticRegressor::logistic(config).unwrap();
        let before = regressor.weights().to_vec();
        regressor
            .train(train.features(), train.labels(), test.features(), test.labels())
            .unwrap();

        assert_eq!(regressor.weights().len(), 3);
        assert!(before
            .iter()
            .zip(regressor.weights())
            .any(|(before, after)| before != after));
        let history = regressor.loss_history();
        assert!(!history.is_empty());
        assert_eq!(history.train().len(), history.validation().len());
        assert!(history.curves().is_ok());
        let labels = regressor.predict(test.features()).unwrap();
        assert!(labels.iter().all(|label| *label == 0 || *label == 1));

        regressor.reset();
        assert_eq!(regressor.weights().len(), 3);
        assert!(regressor.loss_history().is_empty());
        assert!(matches!(
            regressor.loss_history().curves(),
            Err(RegressionError::NoHistory)
        ));
    }

    #[test]
    fn test_training_separates_blobs() {
        let dataset = Dataset::gaussian_blobs(
            100,
            Blob::new((-2.0, -2.0), (0.5, 0.5)),
            Blob::new((2.0, 2.0), (0.5, 0.5)),
            7,
        )
        .unwrap();
        let (train, test) = dataset.random_split(0.8, 7).unwrap();

        let mut config = RegressorConfig::new(2);
        config.learning_rate = 0.1;
        config.max_iterations = 1000;
        config.regularization_param = 0.0;
        config.seed = Some(7);
        let mut regressor = LogisticRegressor::logistic(config).unwrap();
        regressor
            .train(train.features(), train.labels(), test.features(), test.labels())
            .unwrap();
        let accuracy = regressor.accuracy(test.features(), test.labels()).unwrap();
        assert!(accuracy > 0.95, "accuracy was {accuracy}");
    }
}
