//! Tabular Prep - очистка и предобработка табличных данных

pub mod artifact;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod preprocessing;
pub mod split;
pub mod types;

pub use error::{PrepError, Result};
pub use types::*;
pub use preprocessing::*;

// Re-export для удобства
pub use config::{CatalogCleanConfig, PipelineConfig};
pub use pipeline::{clean_catalog, preprocess, PreprocessOutput};
