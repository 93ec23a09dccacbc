// regressor.rs
use itertools::izip;
use rand::seq::SliceRandom;
use rand_xorshift::XorShiftRng;
use tracing::{debug, info};

use super::{
    append_bias, check_len, loss_history::LossHistory, training_parameters::RegressorConfig,
};
use crate::machine_learning::{
    regression_error::{RegressionError, Result},
    seeded_rng,
};

/// The model specific part of a regressor. The weights are owned by the [`Regressor`] and lent
/// to the objective on every call. Operations an objective doesn't override fail with
/// [`RegressionError::NotImplemented`].
pub trait RegressionObjective {
    type Prediction: Copy + Into<f64>;

    fn predict(&self, _weights: &[f64], _x: &[Vec<f64>]) -> Result<Vec<Self::Prediction>> {
        Err(RegressionError::NotImplemented("predict".to_string()))
    }

    fn loss(
        &self,
        _weights: &[f64],
        _y_true: &[f64],
        _y_pred: &[f64],
        _reg_param: f64,
    ) -> Result<f64> {
        Err(RegressionError::NotImplemented("loss".to_string()))
    }

    fn gradient(
        &self,
        _weights: &[f64],
        _y_true: &[f64],
        _x: &[Vec<f64>],
        _reg_param: f64,
    ) -> Result<Vec<f64>> {
        Err(RegressionError::NotImplemented("gradient".to_string()))
    }
}

/// Mini-batch gradient descent trainer generic over the objective.
pub struct Regressor<O: RegressionObjective> {
    objective: O,
    config: RegressorConfig,
    weights: Vec<f64>,
    history: LossHistory,
    rng: XorShiftRng,
}

impl<O: RegressionObjective> Regressor<O> {
    pub fn new(objective: O, config: RegressorConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let weights = config
            .initialization
            .initialize(config.num_features + 1, &mut rng);
        Ok(Self {
            objective,
            config,
            weights,
            history: LossHistory::new(),
            rng,
        })
    }

    pub fn with_weights(objective: O, config: RegressorConfig, weights: Vec<f64>) -> Result<Self> {
        config.validate()?;
        check_len("with_weights", config.num_features + 1, weights.len())?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            objective,
            config,
            weights,
            history: LossHistory::new(),
            rng,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn config(&self) -> &RegressorConfig {
        &self.config
    }

    pub fn loss_history(&self) -> &LossHistory {
        &self.history
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<O::Prediction>> {
        self.objective.predict(&self.weights, x)
    }

    pub fn loss(&self, y_true: &[f64], y_pred: &[f64], reg_param: f64) -> Result<f64> {
        self.objective.loss(&self.weights, y_true, y_pred, reg_param)
    }

    pub fn gradient(&self, y_true: &[f64], x: &[Vec<f64>], reg_param: f64) -> Result<Vec<f64>> {
        self.objective.gradient(&self.weights, y_true, x, reg_param)
    }

    /// Fraction of the predictions that equal the labels.
    pub fn accuracy(&self, x: &[Vec<f64>], y: &[f64]) -> Result<f64> {
        check_len("accuracy", x.len(), y.len())?;
        if y.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }
        let predictions = self.predict(x)?;
        let correct = predictions
            .into_iter()
            .zip(y)
            .filter(|(prediction, gt)| Into::<f64>::into(*prediction) == **gt)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }

    /// Draws fresh weights and forgets the loss history.
    pub fn reset(&mut self) {
        self.weights = self
            .config
            .initialization
            .initialize(self.config.num_features + 1, &mut self.rng);
        self.history.clear();
    }

    /// Trains until the mean absolute weight update of an epoch is at most `tolerance` or the
    /// iteration count reaches `max_iterations`. Running out of iterations is not an error.
    pub fn train(
        &mut self,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        x_val: &[Vec<f64>],
        y_val: &[f64],
    ) -> Result<()> {
        check_len("train", x_train.len(), y_train.len())?;
        check_len("train validation", x_val.len(), y_val.len())?;
        if x_train.is_empty() || x_val.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }
        let x_train = append_bias(x_train, self.config.num_features)?;
        let x_val = append_bias(x_val, self.config.num_features)?;

        let learning_rate = self.config.learning_rate;
        let reg_param = self.config.regularization_param;
        let num_batches = x_train.len() / self.config.batch_size + 1;
        let mut order = (0..x_train.len()).collect::<Vec<_>>();

        let mut update_size = 1.0;
        let mut iteration = 1;
        while update_size > self.config.tolerance && iteration < self.config.max_iterations {
            order.shuffle(&mut self.rng);

            let mut update_total = 0.0;
            let mut update_count = 0usize;
            for batch in split_batches(&order, num_batches)
                .into_iter()
                .filter(|batch| !batch.is_empty())
            {
                let batch_x = batch
                    .iter()
                    .map(|&i| x_train[i].clone())
                    .collect::<Vec<_>>();
                let batch_y = batch.iter().map(|&i| y_train[i]).collect::<Vec<_>>();

                let y_pred = as_f64(self.objective.predict(&self.weights, &batch_x)?);
                let train_loss = self
                    .objective
                    .loss(&self.weights, &batch_y, &y_pred, reg_param)?;

                let gradient = self
                    .objective
                    .gradient(&self.weights, &batch_y, &batch_x, reg_param)?;
                check_len("gradient", self.weights.len(), gradient.len())?;
                for (weight, grad) in izip!(self.weights.iter_mut(), gradient.iter()) {
                    let previous = *weight;
                    *weight = previous - learning_rate * grad;
                    update_total += (*weight - previous).abs();
                    update_count += 1;
                }

                let val_pred = as_f64(self.objective.predict(&self.weights, &x_val)?);
                let val_loss = self
                    .objective
                    .loss(&self.weights, y_val, &val_pred, reg_param)?;
                self.history.push(train_loss, val_loss);
            }

            update_size = update_total / update_count as f64;
            if let Some(last) = self.history.last() {
                debug!("epoch: {iteration}, update size: {update_size}, {last}");
            }
            iteration += 1;
        }

        if update_size <= self.config.tolerance {
            info!(
                "Converged after {} epochs with update size {update_size}.",
                iteration - 1
            );
        } else {
            info!(
                "Stopped after {} epochs without converging, update size {update_size}.",
                iteration - 1
            );
        }
        Ok(())
    }
}

fn as_f64<P: Into<f64>>(predictions: Vec<P>) -> Vec<f64> {
    predictions.into_iter().map(Into::into).collect()
}

/// Splits `items` into `sections` contiguous parts whose sizes differ by at most one, larger
/// parts first. Parts are empty when there are fewer items than sections.
pub fn split_batches<T>(items: &[T], sections: usize) -> Vec<&[T]> {
    if sections == 0 {
        return Vec::new();
    }
    let base = items.len() / sections;
    let extra = items.len() % sections;
    let mut batches = Vec::with_capacity(sections);
    let mut start = 0;
    for section in 0..sections {
        let size = if section < extra { base + 1 } else { base };
        batches.push(&items[start..start + size]);
        start += size;
    }
    batches
}
