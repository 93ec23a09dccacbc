// linear_classifier.rs
pub mod logistic_regression;
pub mod loss_history;
pub mod regressor;
pub mod training_parameters;
pub mod weight_initialization;

use super::regression_error::{RegressionError, Result};

/// Returns a copy of `x` where every row carries the constant bias feature as its last column.
/// Rows that already have `num_features + 1` columns are taken as augmented.
pub fn augment_with_bias(x: &[Vec<f64>], num_features: usize) -> Result<Vec<Vec<f64>>> {
    x.iter()
        .map(|row| match row.len() {
            len if len == num_features => {
                let mut augmented = Vec::with_capacity(num_features + 1);
                augmented.extend_from_slice(row);
                augmented.push(1.0);
                Ok(augmented)
            }
            len if len == num_features + 1 => Ok(row.clone()),
            len => Err(RegressionError::dimension_mismatch(
                "augment_with_bias",
                num_features,
                len,
            )),
        })
        .collect()
}

/// Appends the constant bias feature to every row. Every row must have exactly `num_features`
/// columns.
pub fn append_bias(x: &[Vec<f64>], num_features: usize) -> Result<Vec<Vec<f64>>> {
    x.iter()
        .map(|row| {
            check_len("append_bias", num_features, row.len())?;
            let mut augmented = Vec::with_capacity(num_features + 1);
            augmented.extend_from_slice(row);
            augmented.push(1.0);
            Ok(augmented)
        })
        .collect()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

pub(crate) fn check_len(operation: &str, expected: usize, received: usize) -> Result<()> {
    if expected != received {
        return Err(RegressionError::dimension_mismatch(
            operation, expected, received,
        ));
    }
    Ok(())
}
