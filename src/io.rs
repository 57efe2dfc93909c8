//! Чтение и запись CSV

use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{PrepError, Result};
use crate::types::Table;

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Загружает таблицу из файла или по http(s) URL
pub fn load_table(source: &str) -> Result<Table> {
    if is_url(source) {
        let bytes = fetch(source)?;
        read_csv(bytes.as_slice(), source)
    } else {
        let file = File::open(source).map_err(|e| PrepError::SourceUnreadable {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;
        read_csv(file, source)
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::new();
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(PrepError::SourceUnreadable {
            source_name: url.to_string(),
            reason: format!("HTTP status {}", status),
        });
    }

    Ok(response.bytes()?.to_vec())
}

/// Разбирает CSV с заголовком.
/// Короткие строки дополняются пропусками, строки длиннее заголовка отвергаются.
pub fn read_csv<R: Read>(reader: R, source_name: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(PrepError::SourceUnreadable {
            source_name: source_name.to_string(),
            reason: "no header row".to_string(),
        });
    }

    let mut raw_rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(PrepError::SourceUnreadable {
                source_name: source_name.to_string(),
                reason: format!(
                    "line {} has {} fields, header has {}",
                    line,
                    record.len(),
                    headers.len()
                ),
            });
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        raw_rows.push(row);
    }

    let table = Table::from_raw(headers, raw_rows)?;
    tracing::debug!(source = source_name, rows = table.n_rows(), "CSV parsed");
    Ok(table)
}

/// Создает директорию (и родителей), если ее нет
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PrepError::Write {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Записывает таблицу в CSV. Существующий файл перезаписывается.
/// Пропуски пишутся пустыми ячейками.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let file = File::create(path).map_err(|e| PrepError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_writer(BufWriter::new(file));

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }

    wtr.flush().map_err(|e| PrepError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), rows = table.n_rows(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::CleaningPolicy;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn create_test_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,score,city").unwrap();
        writeln!(file, "a,1.5,Paris").unwrap();
        writeln!(file, "b,,Berlin").unwrap();
        writeln!(file, "\"c, jr\",NaN,").unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let table = load_table(file.path().to_str().unwrap()).unwrap();

        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.headers, vec!["name", "score", "city"]);
        assert_eq!(table.rows[2][0].as_deref(), Some("c, jr"));
        assert_eq!(table.total_missing(), 3);
        assert_eq!(table.index, vec![0, 1, 2]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_table("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, PrepError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_short_rows_padded_with_missing() {
        let data = "a,b,c\n1,2,3\n4\n5,6\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();

        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.rows[1], vec![Some("4".to_string()), None, None]);
        assert_eq!(table.rows[2][2], None);
        assert_eq!(table.total_missing(), 3);
    }

    #[test]
    fn test_short_row_dropped_by_strict_cleaning() {
        let data = "a,b\n1,2\n3\n";
        let table = read_csv(data.as_bytes(), "inline").unwrap();
        let (cleaned, _) = CleaningPolicy::Strict.apply(&table).unwrap();
        assert_eq!(cleaned.index, vec![0]);
    }

    #[test]
    fn test_long_rows_rejected() {
        let data = "a,b\n1,2\n3,4,5\n";
        match read_csv(data.as_bytes(), "inline") {
            Err(PrepError::SourceUnreadable { source_name, reason }) => {
                assert_eq!(source_name, "inline");
                assert!(reason.contains("3 fields"), "{}", reason);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_write_creates_dirs_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");

        let table = read_csv("x,y\n1,\n2,b\n".as_bytes(), "inline").unwrap();
        write_table(&table, &path).unwrap();
        write_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "x,y\n1,\n2,b\n");
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/data.csv"));
        assert!(is_url("http://example.com/data.csv"));
        assert!(!is_url("data/raw.csv"));
    }
}
