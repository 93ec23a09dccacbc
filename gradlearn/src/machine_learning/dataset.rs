// dataset.rs
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};

use super::{
    regression_error::{RegressionError, Result},
    seeded_rng,
};

/// Feature rows and their binary labels, kept in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

/// Parameters of a two dimensional normal distribution with independent axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub mean: (f64, f64),
    pub std: (f64, f64),
}

impl Blob {
    pub fn new(mean: (f64, f64), std: (f64, f64)) -> Self {
        Self { mean, std }
    }

    fn sample(&self, points: usize, seed: u64) -> Result<Vec<Vec<f64>>> {
        let normal = |mean: f64, std: f64| {
            if std < 0.0 {
                return Err(RegressionError::invalid_hyperparameter("std", std));
            }
            Normal::new(mean, std).map_err(|_| RegressionError::invalid_hyperparameter("std", std))
        };
        let norm_dist_x = normal(self.mean.0, self.std.0)?;
        let norm_dist_y = normal(self.mean.1, self.std.1)?;
        let mut rng = seeded_rng(Some(seed));
        Ok((0..points)
            .map(|_| vec![norm_dist_x.sample(&mut rng), norm_dist_y.sample(&mut rng)])
            .collect())
    }
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<f64>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(RegressionError::dimension_mismatch(
                "dataset labels",
                features.len(),
                labels.len(),
            ));
        }
        if let Some(first) = features.first() {
            if let Some(row) = features.iter().find(|row| row.len() != first.len()) {
                return Err(RegressionError::dimension_mismatch(
                    "dataset features",
                    first.len(),
                    row.len(),
                ));
            }
        }
        Ok(Self { features, labels })
    }

    /// Two classes drawn from `negative` (label 0) and `positive` (label 1), shuffled.
    pub fn gaussian_blobs(
        points_per_class: usize,
        negative: Blob,
        positive: Blob,
        seed: u64,
    ) -> Result<Self> {
        let mut rows = negative
            .sample(points_per_class, seed)?
            .into_iter()
            .map(|features| (features, 0.0))
            .chain(
                positive
                    .sample(points_per_class, seed.wrapping_add(1))?
                    .into_iter()
                    .map(|features| (features, 1.0)),
            )
            .collect::<Vec<_>>();
        rows.shuffle(&mut seeded_rng(Some(seed)));

        let (features, labels): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        Ok(Self { features, labels })
    }

    /// Shuffles the rows with `seed` and puts the first `fraction` of them in the first split.
    pub fn random_split(&self, fraction: f64, seed: u64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(RegressionError::invalid_hyperparameter(
                "split_fraction",
                fraction,
            ));
        }
        let mut indices = (0..self.len()).collect::<Vec<_>>();
        indices.shuffle(&mut seeded_rng(Some(seed)));
        let split_index = (fraction * indices.len() as f64) as usize;

        let subset = |indices: &[usize]| Self {
            features: indices.iter().map(|i| self.features[*i].clone()).collect(),
            labels: indices.iter().map(|i| self.labels[*i]).collect(),
        };
        Ok((
            subset(&indices[..split_index]),
            subset(&indices[split_index..]),
        ))
    }

    pub fn num_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }
}
