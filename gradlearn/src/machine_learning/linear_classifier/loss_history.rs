use std::{fs::File, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::machine_learning::regression_error::{RegressionError, Result};

/// Training and validation losses, one entry per processed mini-batch.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LossHistory {
    train: Vec<f64>,
    validation: Vec<f64>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, train_loss: f64, validation_loss: f64) {
        self.train.push(train_loss);
        self.validation.push(validation_loss);
    }

    pub fn clear(&mut self) {
        self.train.clear();
        self.validation.clear();
    }

    pub fn len(&self) -> usize {
        self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    pub fn train(&self) -> &[f64] {
        &self.train
    }

    pub fn validation(&self) -> &[f64] {
        &self.validation
    }

    pub fn last(&self) -> Option<StepLoss> {
        let train = *self.train.last()?;
        let validation = *self.validation.last()?;
        Some(StepLoss { train, validation })
    }

    /// Plot-ready series of both histories. Fails when no training step has run.
    pub fn curves(&self) -> Result<LossCurves> {
        if self.is_empty() {
            return Err(RegressionError::NoHistory);
        }
        let series = |losses: &[f64]| losses.iter().copied().enumerate().collect::<Vec<_>>();
        Ok(LossCurves {
            training: series(&self.train),
            validation: series(&self.validation),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepLoss {
    pub train: f64,
    pub validation: f64,
}

impl std::fmt::Display for StepLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "train loss: {}, validation loss: {}", self.train, self.validation)
    }
}

/// `(step, loss)` points for an external plotting tool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LossCurves {
    pub training: Vec<(usize, f64)>,
    pub validation: Vec<(usize, f64)>,
}

impl LossCurves {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let curves_str = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(curves_str.as_bytes())?;
        Ok(())
    }
}
