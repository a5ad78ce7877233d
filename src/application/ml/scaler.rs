use crate::domain::errors::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};

/// Per-column linear rescaling onto [0, 1], fitted once on training rows.
///
/// Constant columns keep a unit scale and map to `x - min`. Rows outside the
/// fitted range extrapolate linearly; the transform is never refitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    scales: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(rows: &[Vec<f64>]) -> ForecastResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| ForecastError::data("cannot fit scaler on zero rows"))?;
        let width = first.len();

        let mut mins = vec![f64::INFINITY; width];
        let mut maxs = vec![f64::NEG_INFINITY; width];
        for row in rows {
            if row.len() != width {
                return Err(ForecastError::Shape {
                    expected: width,
                    actual: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                mins[j] = mins[j].min(v);
                maxs[j] = maxs[j].max(v);
            }
        }

        let scales = mins
            .iter()
            .zip(maxs.iter())
            .map(|(lo, hi)| {
                let range = hi - lo;
                if range > 0.0 { 1.0 / range } else { 1.0 }
            })
            .collect();

        Ok(Self { mins, scales })
    }

    pub fn n_features(&self) -> usize {
        self.mins.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> ForecastResult<Vec<f64>> {
        if row.len() != self.mins.len() {
            return Err(ForecastError::Shape {
                expected: self.mins.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mins.iter().zip(self.scales.iter()))
            .map(|(v, (lo, scale))| (v - lo) * scale)
            .collect())
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> ForecastResult<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_maps_training_range_to_unit_interval() {
        let rows = vec![vec![10.0, 1.0], vec![20.0, 3.0], vec![15.0, 2.0]];
        let scaler = MinMaxScaler::fit(&rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();
        assert_eq!(scaled[0], vec![0.0, 0.0]);
        assert_eq!(scaled[1], vec![1.0, 1.0]);
        assert!((scaled[2][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_shifted_only() {
        let scaler = MinMaxScaler::fit(&[vec![5.0], vec![5.0]]).unwrap();
        assert_eq!(scaler.transform_row(&[7.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        let scaler = MinMaxScaler::fit(&[vec![0.0], vec![10.0]]).unwrap();
        assert!((scaler.transform_row(&[15.0]).unwrap()[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_width_mismatch_is_shape_error() {
        let scaler = MinMaxScaler::fit(&[vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            scaler.transform_row(&[1.0]),
            Err(ForecastError::Shape {
                expected: 2,
                actual: 1
            })
        ));
        assert!(MinMaxScaler::fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(MinMaxScaler::fit(&[]).is_err());
    }
}
