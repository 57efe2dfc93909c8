//! Настройки обеих процедур

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cleaning::CleaningPolicy;
use crate::error::{PrepError, Result};

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/Nuno-Hadianto/Eksperimen_SML_Mohammed-Noeno-Hadianto/refs/heads/main/Software_Professional_Salaries.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "preprocessing/namadataset_preprocessing";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Полный конвейер: очистка, разбиение, масштабирование и кодирование
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub target: String,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub test_size: f64,
    pub seed: u64,
    pub artifact_file: String,
    pub train_file: String,
    pub test_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target: "Salary".to_string(),
            numeric_features: strings(&["Rating", "Salaries Reported"]),
            categorical_features: strings(&["Company Name", "Job Title", "Location"]),
            test_size: 0.2,
            seed: 42,
            artifact_file: "preprocessor.bin".to_string(),
            train_file: "train_processed.csv".to_string(),
            test_file: "test_processed.csv".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PrepError::InvalidConfig(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self
            .numeric_features
            .iter()
            .chain(&self.categorical_features)
            .any(|c| *c == self.target)
        {
            return Err(PrepError::InvalidConfig(format!(
                "target '{}' cannot also be a feature",
                self.target
            )));
        }
        if let Some(dup) = self
            .numeric_features
            .iter()
            .find(|&c| self.categorical_features.contains(c))
        {
            return Err(PrepError::InvalidConfig(format!(
                "column '{}' is both numeric and categorical",
                dup
            )));
        }
        Ok(())
    }
}

/// Очистка каталога: заполнение одних колонок и удаление строк по другим
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogCleanConfig {
    pub fill_columns: Vec<String>,
    pub drop_columns: Vec<String>,
    pub placeholder: String,
}

impl Default for CatalogCleanConfig {
    fn default() -> Self {
        Self {
            fill_columns: strings(&["director", "cast", "country"]),
            drop_columns: strings(&["date_added", "rating", "duration"]),
            placeholder: "Unknown".to_string(),
        }
    }
}

impl CatalogCleanConfig {
    pub fn required_columns(&self) -> impl Iterator<Item = &String> {
        self.fill_columns.iter().chain(&self.drop_columns)
    }

    pub fn policy(&self) -> CleaningPolicy {
        CleaningPolicy::Selective {
            fill_columns: self.fill_columns.clone(),
            drop_columns: self.drop_columns.clone(),
            placeholder: self.placeholder.clone(),
        }
    }
}

/// Читает настройки из JSON; отсутствующие поля берутся по умолчанию
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| PrepError::SourceUnreadable {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| PrepError::InvalidConfig(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.target, "Salary");
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());

        let catalog = CatalogCleanConfig::default();
        assert_eq!(catalog.placeholder, "Unknown");
        assert_eq!(catalog.required_columns().count(), 6);
    }

    #[test]
    fn test_validate() {
        let mut config = PipelineConfig::default();
        config.test_size = 1.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.numeric_features.push("Salary".to_string());
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.categorical_features.push("Rating".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"target": "Pay", "seed": 7}}"#).unwrap();

        let config: PipelineConfig = load_json(file.path()).unwrap();
        assert_eq!(config.target, "Pay");
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_size, 0.2);
    }

    #[test]
    fn test_load_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let result: Result<CatalogCleanConfig> = load_json(file.path());
        assert!(matches!(result, Err(PrepError::InvalidConfig(_))));
    }
}
