//! Сохранение обученного преобразования на диск

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::preprocessing::FittedColumnTransformer;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    crate_version: String,
    transformer: FittedColumnTransformer,
}

/// Пишет преобразование в бинарный файл (bincode), существующий файл перезаписывается
pub fn save_transformer(path: &Path, transformer: &FittedColumnTransformer) -> Result<()> {
    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        crate_version: env!("CARGO_PKG_VERSION").to_string(),
        transformer: transformer.clone(),
    };

    let file = File::create(path).map_err(|e| PrepError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &envelope)?;
    writer.flush().map_err(|e| PrepError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Transformer saved");
    Ok(())
}

pub fn load_transformer(path: &Path) -> Result<FittedColumnTransformer> {
    // читаем целиком: длины внутри файла проверяются по размеру буфера
    let bytes = fs::read(path).map_err(|e| PrepError::SourceUnreadable {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let envelope: Envelope = bincode::deserialize(&bytes)?;

    if envelope.format_version != FORMAT_VERSION {
        return Err(PrepError::Artifact(format!(
            "unsupported format version {} (written by {}), expected {}",
            envelope.format_version, envelope.crate_version, FORMAT_VERSION
        )));
    }

    Ok(envelope.transformer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::ColumnTransformer;
    use crate::types::Table;
    use tempfile::tempdir;

    fn fitted() -> (FittedColumnTransformer, Table) {
        let table = Table::from_raw(
            vec!["kind".into(), "size".into()],
            vec![
                vec!["a".into(), "1".into()],
                vec!["b".into(), "3".into()],
            ],
        )
        .unwrap();
        let ct = ColumnTransformer::new(vec!["size".into()], vec!["kind".into()]);
        (ct.fit(&table).unwrap(), table)
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preprocessor.bin");
        let (transformer, table) = fitted();

        save_transformer(&path, &transformer).unwrap();
        let loaded = load_transformer(&path).unwrap();

        assert_eq!(loaded, transformer);
        assert_eq!(
            loaded.transform(&table).unwrap(),
            transformer.transform(&table).unwrap()
        );
    }

    #[test]
    fn test_wrong_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.bin");
        let (transformer, _) = fitted();

        let envelope = Envelope {
            format_version: 99,
            crate_version: "0.0.0".to_string(),
            transformer,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        assert!(matches!(load_transformer(&path), Err(PrepError::Artifact(_))));
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"not a transformer").unwrap();
        assert!(load_transformer(&path).is_err());
    }
}
