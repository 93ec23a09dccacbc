use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeightInitialization {
    #[default]
    StandardNormal,
    LecunUniform,
    Zeros,
}

impl WeightInitialization {
    pub fn initialize<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<f64> {
        match self {
            WeightInitialization::StandardNormal => standard_normal(size, rng),
            WeightInitialization::LecunUniform => lecun_uniform(size, rng),
            WeightInitialization::Zeros => vec![0.0; size],
        }
    }
}

pub fn standard_normal<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<f64> {
    (0..size).map(|_| StandardNormal.sample(rng)).collect()
}

pub fn lecun_uniform<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<f64> {
    let limit = (1.0 / size.max(1) as f64).sqrt(); // LeCun uniform limit
    let between = Uniform::from(-limit..limit);

    (0..size).map(|_| between.sample(rng)).collect()
}
