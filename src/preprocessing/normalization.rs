//! Стандартизация числовых признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Приводит каждый признак к нулевому среднему и единичной дисперсии.
/// Статистики считаются только на данных, переданных в `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PrepError::EmptyDataset("cannot fit scaler on 0 rows".to_string()));
        }

        // Среднее и стандартное отклонение (ddof = 0) по каждому признаку
        self.mean = Some(
            X.mean_axis(Axis(0))
                .ok_or_else(|| PrepError::EmptyDataset("failed to compute mean".to_string()))?,
        );
        let mut std = X.std_axis(Axis(0), 0.0);

        // Избегаем деления на ноль
        for val in std.iter_mut() {
            if *val < 1e-10 {
                *val = 1.0;
            }
        }
        self.std = Some(std);

        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) if self.is_fitted => (mean, std),
            _ => return Err(PrepError::NotFitted("StandardScaler")),
        };

        if X.ncols() != mean.len() {
            return Err(PrepError::ShapeMismatch {
                expected: mean.len(),
                actual: X.ncols(),
            });
        }

        // (X - mean) / std
        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / std[i];
            }
        }

        Ok(normalized)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.std.as_ref()
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_zero_mean_unit_variance() {
        let X = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let mut scaler = StandardScaler::new();
        let Z = scaler.fit_transform(&X).unwrap();

        for col in Z.columns() {
            let mean = col.mean().unwrap();
            let var = col.mapv(|v| (v - mean).powi(2)).mean().unwrap();
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column() {
        let X = array![[5.0], [5.0], [5.0]];
        let mut scaler = StandardScaler::new();
        let Z = scaler.fit_transform(&X).unwrap();
        assert!(Z.iter().all(|&v| v == 0.0));
        assert_eq!(scaler.scale().unwrap()[0], 1.0);
    }

    #[test]
    fn test_transform_uses_fit_statistics() {
        let train = array![[0.0], [2.0]];
        let test = array![[4.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).unwrap();

        // mean = 1, std = 1
        let Z = scaler.transform(&test).unwrap();
        assert!((Z[[0, 0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors() {
        let scaler = StandardScaler::new();
        assert!(scaler.transform(&array![[1.0]]).is_err());

        let mut scaler = StandardScaler::new();
        assert!(scaler.fit(&Array2::zeros((0, 2))).is_err());

        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(scaler.transform(&array![[1.0]]).is_err());
    }
}
