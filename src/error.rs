//! Ошибки предобработки

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    /// Источник не найден или не читается
    #[error("cannot read source '{source_name}': {reason}")]
    SourceUnreadable { source_name: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("column '{0}' not found in table")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}', row {row}: missing value")]
    MissingValue { column: String, row: usize },

    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    #[error("shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("columns {actual:?} do not match the columns seen at fit {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("row index mismatch: tables with {left} and {right} rows are not aligned")]
    IndexMismatch { left: usize, right: usize },

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for PrepError {
    fn from(err: bincode::Error) -> Self {
        PrepError::Artifact(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
