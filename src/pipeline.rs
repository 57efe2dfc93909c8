//! Процедуры предобработки целиком

#![allow(non_snake_case)]

use std::path::{Path, PathBuf};

use crate::artifact;
use crate::cleaning::{CleanSummary, CleaningPolicy};
use crate::config::{CatalogCleanConfig, PipelineConfig};
use crate::error::{PrepError, Result};
use crate::io;
use crate::preprocessing::{ColumnTransformer, FittedColumnTransformer};
use crate::split::train_test_split;
use crate::types::ProcessedData;

/// Результат полного конвейера
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    pub train: ProcessedData,
    pub test: ProcessedData,
    pub transformer: FittedColumnTransformer,
    pub artifact_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

/// Загрузка, строгая очистка, разбиение 80/20, обучение преобразования
/// на обучающей части и сохранение результатов в `output_dir`.
pub fn preprocess(
    raw_source: &str,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<PreprocessOutput> {
    config.validate()?;

    tracing::info!(source = raw_source, "Loading data");
    let raw = io::load_table(raw_source)?;

    let (cleaned, summary) = CleaningPolicy::Strict.apply(&raw)?;
    let (rows, cols) = cleaned.shape();
    tracing::info!(
        rows,
        cols,
        dropped = summary.rows_dropped(),
        "Cleaned data shape"
    );

    let (features, target) = cleaned.split_off_column(&config.target)?;
    let split = train_test_split(features.n_rows(), config.test_size, config.seed)?;

    let X_train = features.take(&split.train);
    let X_test = features.take(&split.test);
    let y_train = target.take(&split.train);
    let y_test = target.take(&split.test);
    tracing::info!(
        train = X_train.n_rows(),
        test = X_test.n_rows(),
        seed = config.seed,
        "Split done"
    );

    tracing::info!("Fitting and transforming data");
    let transformer = ColumnTransformer::new(
        config.numeric_features.clone(),
        config.categorical_features.clone(),
    )
    .fit(&X_train)?;

    let train = ProcessedData {
        features: transformer.transform(&X_train)?,
        target: y_train,
    };
    let test = ProcessedData {
        features: transformer.transform(&X_test)?,
        target: y_test,
    };

    io::ensure_dir(output_dir)?;
    let artifact_path = output_dir.join(&config.artifact_file);
    let train_path = output_dir.join(&config.train_file);
    let test_path = output_dir.join(&config.test_file);

    artifact::save_transformer(&artifact_path, &transformer)?;
    io::write_table(&train.to_table()?, &train_path)?;
    io::write_table(&test.to_table()?, &test_path)?;

    tracing::info!(output_dir = %output_dir.display(), "Preprocessing finished, artifacts saved");

    Ok(PreprocessOutput {
        train,
        test,
        transformer,
        artifact_path,
        train_path,
        test_path,
    })
}

/// Очистка каталога: заполнение пропусков и удаление неполных строк.
/// Наличие всех колонок проверяется до записи, при ошибке файл не создается.
pub fn clean_catalog(input: &Path, output: &Path, config: &CatalogCleanConfig) -> Result<CleanSummary> {
    let source = input.to_string_lossy();
    tracing::info!(source = %source, "Loading data");
    let raw = io::load_table(&source)?;

    if let Some(missing) = config.required_columns().find(|c| !raw.has_column(c)) {
        return Err(PrepError::MissingColumn(missing.clone()));
    }

    let (cleaned, summary) = config.policy().apply(&raw)?;
    tracing::info!(
        rows_in = summary.rows_in,
        rows_out = summary.rows_out,
        filled = summary.cells_filled,
        "Missing values handled"
    );

    io::write_table(&cleaned, output)?;
    tracing::info!(path = %output.display(), "Cleaned data saved");

    Ok(summary)
}
