//! Преобразование по колонкам: масштабирование, one-hot и passthrough

#![allow(non_snake_case)]

use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::preprocessing::encoding::OneHotEncoder;
use crate::preprocessing::normalization::StandardScaler;
use crate::types::Table;

const NUM_PREFIX: &str = "num";
const CAT_PREFIX: &str = "cat";
const REMAINDER_PREFIX: &str = "remainder";

/// Описание преобразования: какие колонки масштабировать, какие кодировать.
/// Остальные колонки проходят без изменений.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric: Vec<String>,
    categorical: Vec<String>,
}

impl ColumnTransformer {
    pub fn new(numeric: Vec<String>, categorical: Vec<String>) -> Self {
        Self {
            numeric,
            categorical,
        }
    }

    /// Обучает преобразование. Передавать только обучающую выборку.
    pub fn fit(&self, X: &Table) -> Result<FittedColumnTransformer> {
        if X.is_empty() {
            return Err(PrepError::EmptyDataset(
                "cannot fit column transformer on 0 rows".to_string(),
            ));
        }

        for name in self.numeric.iter().chain(&self.categorical) {
            X.column_index(name)?;
        }

        let remainder = X
            .headers
            .iter()
            .filter(|&h| !self.numeric.contains(h) && !self.categorical.contains(h))
            .cloned()
            .collect();

        let mut scaler = StandardScaler::new();
        scaler.fit(&numeric_block(X, &self.numeric)?)?;

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&categorical_block(X, &self.categorical)?)?;

        tracing::debug!(
            numeric = self.numeric.len(),
            categorical = self.categorical.len(),
            one_hot_features = encoder.n_features_out(),
            "Column transformer fitted"
        );

        Ok(FittedColumnTransformer {
            input_columns: X.headers.clone(),
            numeric: self.numeric.clone(),
            categorical: self.categorical.clone(),
            remainder,
            scaler,
            encoder,
        })
    }
}

/// Обученное преобразование. После `fit` не изменяется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumnTransformer {
    input_columns: Vec<String>,
    numeric: Vec<String>,
    categorical: Vec<String>,
    remainder: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl FittedColumnTransformer {
    /// Числовая часть результата: масштабированные колонки и one-hot блок
    pub fn transform_numeric(&self, X: &Table) -> Result<Array2<f64>> {
        self.check_columns(X)?;

        let scaled = self.scaler.transform(&numeric_block(X, &self.numeric)?)?;
        let encoded = self
            .encoder
            .transform(&categorical_block(X, &self.categorical)?)?;

        Ok(concatenate(Axis(1), &[scaled.view(), encoded.view()])?)
    }

    /// Полный результат в виде таблицы с именами из `feature_names_out`.
    /// Индекс строк сохраняется.
    pub fn transform(&self, X: &Table) -> Result<Table> {
        let values = self.transform_numeric(X)?;
        let passthrough = self
            .remainder
            .iter()
            .map(|name| X.column_index(name))
            .collect::<Result<Vec<_>>>()?;

        let mut out = Table::new(self.feature_names_out()?);
        for (i, (row, &original)) in X.rows.iter().zip(&X.index).enumerate() {
            let mut cells: Vec<Option<String>> =
                values.row(i).iter().map(|&v| Some(format_float(v))).collect();
            cells.extend(passthrough.iter().map(|&p| row[p].clone()));
            out.push_row(original, cells)?;
        }

        Ok(out)
    }

    pub fn feature_names_out(&self) -> Result<Vec<String>> {
        let cat_names = self.encoder.feature_names(&self.categorical)?;

        let names = self
            .numeric
            .iter()
            .map(|c| format!("{}__{}", NUM_PREFIX, c))
            .chain(cat_names.into_iter().map(|n| format!("{}__{}", CAT_PREFIX, n)))
            .chain(
                self.remainder
                    .iter()
                    .map(|c| format!("{}__{}", REMAINDER_PREFIX, c)),
            )
            .collect();
        Ok(names)
    }

    /// Колонки должны совпадать с `fit` по составу и порядку
    fn check_columns(&self, X: &Table) -> Result<()> {
        if X.headers == self.input_columns {
            return Ok(());
        }
        if let Some(missing) = self.input_columns.iter().find(|c| !X.has_column(c)) {
            return Err(PrepError::MissingColumn(missing.clone()));
        }
        Err(PrepError::ColumnMismatch {
            expected: self.input_columns.clone(),
            actual: X.headers.clone(),
        })
    }

    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }
}

/// Форматирует число так, чтобы целые значения сохраняли `.0`
pub fn format_float(v: f64) -> String {
    format!("{:?}", v)
}

fn numeric_block(X: &Table, columns: &[String]) -> Result<Array2<f64>> {
    let indices = columns
        .iter()
        .map(|c| X.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut block = Array2::zeros((X.n_rows(), indices.len()));
    for (i, row) in X.rows.iter().enumerate() {
        for (j, (&idx, name)) in indices.iter().zip(columns).enumerate() {
            let raw = row[idx].as_deref().ok_or_else(|| PrepError::MissingValue {
                column: name.clone(),
                row: X.index[i],
            })?;
            block[[i, j]] = raw.trim().parse::<f64>().map_err(|_| PrepError::InvalidNumber {
                column: name.clone(),
                row: X.index[i],
                value: raw.to_string(),
            })?;
        }
    }

    Ok(block)
}

fn categorical_block(X: &Table, columns: &[String]) -> Result<Array2<String>> {
    let indices = columns
        .iter()
        .map(|c| X.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut flat = Vec::with_capacity(X.n_rows() * indices.len());
    for (i, row) in X.rows.iter().enumerate() {
        for (&idx, name) in indices.iter().zip(columns) {
            let value = row[idx].clone().ok_or_else(|| PrepError::MissingValue {
                column: name.clone(),
                row: X.index[i],
            })?;
            flat.push(value);
        }
    }

    Ok(Array2::from_shape_vec((X.n_rows(), indices.len()), flat)?)
}
