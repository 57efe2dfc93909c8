//! One-hot кодирование категориальных признаков

#![allow(non_snake_case)]

use std::collections::BTreeSet;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Для каждой колонки запоминает отсортированный словарь категорий.
/// Неизвестная при `transform` категория дает нулевой блок индикаторов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self { categories: None }
    }

    pub fn fit(&mut self, X: &Array2<String>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PrepError::EmptyDataset("cannot fit encoder on 0 rows".to_string()));
        }

        let categories: Vec<Vec<String>> = X
            .axis_iter(Axis(1))
            .map(|col| {
                col.iter()
                    .cloned()
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .collect();

        self.categories = Some(categories);
        Ok(())
    }

    pub fn transform(&self, X: &Array2<String>) -> Result<Array2<f64>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(PrepError::NotFitted("OneHotEncoder"))?;

        if X.ncols() != categories.len() {
            return Err(PrepError::ShapeMismatch {
                expected: categories.len(),
                actual: X.ncols(),
            });
        }

        let mut encoded = Array2::zeros((X.nrows(), self.n_features_out()));
        for (i, row) in X.axis_iter(Axis(0)).enumerate() {
            let mut offset = 0;
            for (value, vocab) in row.iter().zip(categories) {
                if let Ok(pos) = vocab.binary_search(value) {
                    encoded[[i, offset + pos]] = 1.0;
                }
                offset += vocab.len();
            }
        }

        Ok(encoded)
    }

    pub fn fit_transform(&mut self, X: &Array2<String>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn categories(&self) -> Option<&[Vec<String>]> {
        self.categories.as_deref()
    }

    pub fn n_features_out(&self) -> usize {
        self.categories
            .as_ref()
            .map(|c| c.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Имена выходных признаков: `<колонка>_<категория>`
    pub fn feature_names(&self, input_names: &[String]) -> Result<Vec<String>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(PrepError::NotFitted("OneHotEncoder"))?;

        if input_names.len() != categories.len() {
            return Err(PrepError::ShapeMismatch {
                expected: categories.len(),
                actual: input_names.len(),
            });
        }

        Ok(input_names
            .iter()
            .zip(categories)
            .flat_map(|(name, vocab)| vocab.iter().map(move |cat| format!("{}_{}", name, cat)))
            .collect())
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}
