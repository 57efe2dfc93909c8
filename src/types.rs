/// Типы данных для предобработки

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Маркеры пропущенных значений (как у pandas по умолчанию)
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(raw: &str) -> bool {
    NA_MARKERS.contains(&raw)
}

/// Ячейка таблицы: `None` означает пропуск
pub type Cell = Option<String>;

/// Таблица с именованными колонками.
///
/// `index` хранит номер строки в исходном файле и не меняется при очистке
/// и разбиении, поэтому признаки и целевая колонка остаются выровненными.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub index: Vec<usize>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Строит таблицу из сырых строк, пропуски распознаются по `NA_MARKERS`
    pub fn from_raw(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(headers);
        for (i, raw) in raw_rows.into_iter().enumerate() {
            let row = raw
                .into_iter()
                .map(|v| if is_missing(&v) { None } else { Some(v) })
                .collect();
            table.push_row(i, row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, index: usize, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(PrepError::ShapeMismatch {
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        self.index.push(index);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Значения одной колонки
    pub fn column(&self, name: &str) -> Result<Vec<Cell>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Количество пропусков в колонке
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().filter(|row| row[idx].is_none()).count())
    }

    pub fn total_missing(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| c.is_none()).count())
            .sum()
    }

    /// Отделяет колонку от таблицы: (таблица без колонки, колонка)
    pub fn split_off_column(&self, name: &str) -> Result<(Table, Table)> {
        let idx = self.column_index(name)?;

        let mut rest_headers = self.headers.clone();
        rest_headers.remove(idx);
        let mut rest = Table::new(rest_headers);
        let mut target = Table::new(vec![name.to_string()]);

        for (row, &original) in self.rows.iter().zip(&self.index) {
            let mut features = row.clone();
            let value = features.remove(idx);
            rest.push_row(original, features)?;
            target.push_row(original, vec![value])?;
        }

        Ok((rest, target))
    }

    /// Строки по позициям (не по исходному индексу), в заданном порядке
    pub fn take(&self, positions: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: positions.iter().map(|&p| self.rows[p].clone()).collect(),
            index: positions.iter().map(|&p| self.index[p]).collect(),
        }
    }

    /// Горизонтальное объединение таблиц с одинаковым индексом
    pub fn hconcat(&self, other: &Table) -> Result<Table> {
        if self.index != other.index {
            return Err(PrepError::IndexMismatch {
                left: self.n_rows(),
                right: other.n_rows(),
            });
        }

        let mut headers = self.headers.clone();
        headers.extend(other.headers.iter().cloned());

        let rows = self
            .rows
            .iter()
            .zip(&other.rows)
            .map(|(a, b)| a.iter().chain(b.iter()).cloned().collect())
            .collect();

        Ok(Table {
            headers,
            rows,
            index: self.index.clone(),
        })
    }
}

/// Результат обработки одной партиции: преобразованные признаки + цель
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedData {
    pub features: Table,
    pub target: Table,
}

impl ProcessedData {
    /// Таблица для записи на диск: признаки и целевая колонка
    pub fn to_table(&self) -> Result<Table> {
        self.features.hconcat(&self.target)
    }

    pub fn n_rows(&self) -> usize {
        self.features.n_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_raw(
            vec!["a".into(), "b".into(), "y".into()],
            vec![
                vec!["1".into(), "x".into(), "10".into()],
                vec!["NA".into(), "z".into(), "20".into()],
                vec!["3".into(), "".into(), "30".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_na_markers_become_missing() {
        let table = sample();
        assert_eq!(table.total_missing(), 2);
        assert_eq!(table.missing_count("a").unwrap(), 1);
        assert_eq!(table.missing_count("b").unwrap(), 1);
    }

    #[test]
    fn test_missing_column() {
        let table = sample();
        match table.column_index("nope") {
            Err(PrepError::MissingColumn(name)) => assert_eq!(name, "nope"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_split_off_column_keeps_index() {
        let table = sample();
        let (features, target) = table.split_off_column("y").unwrap();
        assert_eq!(features.headers, vec!["a", "b"]);
        assert_eq!(target.headers, vec!["y"]);
        assert_eq!(features.index, target.index);
        assert_eq!(target.rows[2][0].as_deref(), Some("30"));
    }

    #[test]
    fn test_take_and_hconcat() {
        let table = sample();
        let (features, target) = table.split_off_column("y").unwrap();
        let f = features.take(&[2, 0]);
        let t = target.take(&[2, 0]);
        assert_eq!(f.index, vec![2, 0]);

        let joined = f.hconcat(&t).unwrap();
        assert_eq!(joined.headers, vec!["a", "b", "y"]);
        assert_eq!(joined.rows[0][2].as_deref(), Some("30"));

        let misaligned = target.take(&[0, 2]);
        assert!(f.hconcat(&misaligned).is_err());
    }

    #[test]
    fn test_hconcat_reports_index_mismatch() {
        let table = sample();
        let (features, target) = table.split_off_column("y").unwrap();

        // одинаковое число строк, но другой порядок индекса
        let result = features.take(&[2, 0]).hconcat(&target.take(&[0, 2]));
        assert!(matches!(
            result,
            Err(PrepError::IndexMismatch { left: 2, right: 2 })
        ));

        let result = features.take(&[0]).hconcat(&target.take(&[0, 1]));
        assert!(matches!(
            result,
            Err(PrepError::IndexMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_push_row_shape_mismatch() {
        let mut table = Table::new(vec!["a".into()]);
        assert!(table.push_row(0, vec![None, None]).is_err());
    }
}
