use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::weight_initialization::WeightInitialization;
use crate::machine_learning::regression_error::{RegressionError, Result};

/// Hyperparameters of a regressor. Fixed once the regressor is constructed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegressorConfig {
    pub num_features: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_regularization_param")]
    pub regularization_param: f64,
    #[serde(default)]
    pub initialization: WeightInitialization,
    /// `None` seeds the regressor's generator from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_learning_rate() -> f64 {
    0.01
}

fn default_tolerance() -> f64 {
    0.001
}

fn default_max_iterations() -> usize {
    100
}

fn default_batch_size() -> usize {
    10
}

fn default_regularization_param() -> f64 {
    0.5
}

impl RegressorConfig {
    pub fn new(num_features: usize) -> Self {
        Self {
            num_features,
            learning_rate: default_learning_rate(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            batch_size: default_batch_size(),
            regularization_param: default_regularization_param(),
            initialization: WeightInitialization::default(),
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(RegressionError::invalid_hyperparameter(
                "batch_size",
                self.batch_size,
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RegressionError::invalid_hyperparameter(
                "learning_rate",
                self.learning_rate,
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RegressionError::invalid_hyperparameter(
                "tolerance",
                self.tolerance,
            ));
        }
        if !self.regularization_param.is_finite() || self.regularization_param < 0.0 {
            return Err(RegressionError::invalid_hyperparameter(
                "regularization_param",
                self.regularization_param,
            ));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut config_str = String::new();
        file.read_to_string(&mut config_str)?;
        let config: RegressorConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }
}
