// machine_learning.rs
pub mod dataset;
pub mod linear_classifier;
pub mod regression_error;

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

/// Seeded generator when a seed is given, otherwise seeded from the OS.
pub fn seeded_rng(seed: Option<u64>) -> XorShiftRng {
    match seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    }
}

#[cfg(test)]
fn compare_outputs(a: &[f64], b: &[f64]) -> bool {
    use float_cmp::{ApproxEq, F64Margin};

    if a.len() != b.len() {
        return false;
    }
    let margin = F64Margin {
        epsilon: 1e-12,
        ulps: 8,
    };
    for (&a, &b) in a.iter().zip(b) {
        if !a.approx_eq(b, margin) {
            return false;
        }
    }
    true
}

pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    if num == 0 {
        return Vec::new();
    }
    let step = if num == 1 {
        0.0
    } else {
        (end - start) / (num - 1) as f64
    };
    (0..num).map(|i| start + step * i as f64).collect()
}
