use crate::domain::errors::{ForecastError, ForecastResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Train and hold-out partitions of a feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutSplit {
    pub train_x: Vec<Vec<f64>>,
    pub train_y: Vec<f64>,
    pub test_x: Vec<Vec<f64>>,
    pub test_y: Vec<f64>,
}

/// Seeded shuffle split. The test partition gets `ceil(test_fraction * n)` rows.
pub fn train_test_split(
    x: &[Vec<f64>],
    y: &[f64],
    test_fraction: f64,
    seed: u64,
) -> ForecastResult<HoldoutSplit> {
    if x.len() != y.len() {
        return Err(ForecastError::Shape {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ForecastError::invalid_parameter(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n = x.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ForecastError::InsufficientData {
            required: 2,
            available: n,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(HoldoutSplit {
        train_x: train_idx.iter().map(|&i| x[i].clone()).collect(),
        train_y: train_idx.iter().map(|&i| y[i]).collect(),
        test_x: test_idx.iter().map(|&i| x[i].clone()).collect(),
        test_y: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
