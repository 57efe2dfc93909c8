//! Очистка данных: пропуски и дубликаты

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Cell, Table};

/// Итог очистки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub cells_filled: usize,
}

impl CleanSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Политика обработки пропусков
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CleaningPolicy {
    /// Удалить строки с любым пропуском, затем дубликаты
    Strict,
    /// Заполнить `fill_columns` значением `placeholder`,
    /// удалить строки с пропуском в `drop_columns`
    Selective {
        fill_columns: Vec<String>,
        drop_columns: Vec<String>,
        placeholder: String,
    },
}

impl CleaningPolicy {
    pub fn apply(&self, table: &Table) -> Result<(Table, CleanSummary)> {
        match self {
            CleaningPolicy::Strict => {
                let no_missing = drop_missing(table);
                let deduped = drop_duplicates(&no_missing);
                let summary = CleanSummary {
                    rows_in: table.n_rows(),
                    rows_out: deduped.n_rows(),
                    cells_filled: 0,
                };
                Ok((deduped, summary))
            }
            CleaningPolicy::Selective {
                fill_columns,
                drop_columns,
                placeholder,
            } => {
                let (filled, cells_filled) = fill_missing(table, fill_columns, placeholder)?;
                let cleaned = drop_missing_in(&filled, drop_columns)?;
                let summary = CleanSummary {
                    rows_in: table.n_rows(),
                    rows_out: cleaned.n_rows(),
                    cells_filled,
                };
                Ok((cleaned, summary))
            }
        }
    }
}

fn filter_rows<F>(table: &Table, mut keep: F) -> Table
where
    F: FnMut(&[Cell]) -> bool,
{
    let mut out = Table::new(table.headers.clone());
    for (row, &idx) in table.rows.iter().zip(&table.index) {
        if keep(row.as_slice()) {
            out.rows.push(row.clone());
            out.index.push(idx);
        }
    }
    out
}

/// Удаляет строки, где есть хотя бы один пропуск
pub fn drop_missing(table: &Table) -> Table {
    filter_rows(table, |row| row.iter().all(Option::is_some))
}

/// Удаляет строки с пропуском в любой из указанных колонок
pub fn drop_missing_in(table: &Table, columns: &[String]) -> Result<Table> {
    let indices = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    Ok(filter_rows(table, |row| indices.iter().all(|&i| row[i].is_some())))
}

/// Удаляет дубликаты строк, первая встреча сохраняется.
/// В числовых колонках значения сравниваются как числа (`4` == `4.0`),
/// в остальных как текст.
pub fn drop_duplicates(table: &Table) -> Table {
    let numeric = numeric_columns(table);
    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(table.n_rows());
    filter_rows(table, |row| seen.insert(dedup_key(row, &numeric)))
}

/// Колонка числовая, если каждое непустое значение разбирается как `f64`
fn numeric_columns(table: &Table) -> Vec<bool> {
    (0..table.n_cols())
        .map(|c| {
            table
                .rows
                .iter()
                .filter_map(|row| row[c].as_deref())
                .all(|v| parse_number(v).is_some())
        })
        .collect()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

fn dedup_key(row: &[Cell], numeric: &[bool]) -> Vec<Cell> {
    row.iter()
        .zip(numeric)
        .map(|(cell, &is_numeric)| match cell.as_deref() {
            Some(v) if is_numeric => parse_number(v).map(|x| format!("{:?}", x)),
            _ => cell.clone(),
        })
        .collect()
}

/// Заполняет пропуски в колонках значением `placeholder`.
/// Возвращает таблицу и число заполненных ячеек.
pub fn fill_missing(table: &Table, columns: &[String], placeholder: &str) -> Result<(Table, usize)> {
    let indices = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut out = table.clone();
    let mut filled = 0;
    for row in out.rows.iter_mut() {
        for &i in &indices {
            if row[i].is_none() {
                row[i] = Some(placeholder.to_string());
                filled += 1;
            }
        }
    }

    Ok((out, filled))
}
