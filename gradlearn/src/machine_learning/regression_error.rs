use serde_json::Error as SerdeError;
use std::io::Error as IOError;

#[derive(thiserror::Error, Debug)]
pub enum RegressionError {
    #[error("The method: {0} is not implemented.")]
    NotImplemented(String),
    #[error("No loss history yet, run training before plotting the loss history.")]
    NoHistory,
    #[error("Dimension mismatch in `{operation}`. Expected {expected} but received {received}.")]
    DimensionMismatch {
        operation: String,
        expected: usize,
        received: usize,
    },
    #[error("Empty dataset.")]
    EmptyDataset,
    #[error("Invalid value for hyperparameter `{name}`: {value}.")]
    InvalidHyperparameter { name: String, value: String },
    #[error("Couldn't (de)serialize the value.")]
    Serialization(#[from] SerdeError),
    #[error("IO error")]
    IOError(#[from] IOError),
}

impl RegressionError {
    pub(crate) fn dimension_mismatch(operation: &str, expected: usize, received: usize) -> Self {
        Self::DimensionMismatch {
            operation: operation.to_string(),
            expected,
            received,
        }
    }

    pub(crate) fn invalid_hyperparameter(name: &str, value: impl ToString) -> Self {
        Self::InvalidHyperparameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegressionError>;
