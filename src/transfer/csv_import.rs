use anyhow::{Context, Result};
use std::path::Path;

use crate::engine::NewExpense;
use crate::util::parse_decimal;

/// Column positions for `title, amount, category[, date]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub(crate) title: Option<usize>,
    pub(crate) amount: usize,
    pub(crate) category: usize,
    pub(crate) date: Option<usize>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            title: Some(0),
            amount: 1,
            category: 2,
            date: Some(3),
        }
    }
}

impl ColumnMap {
    /// Map columns by header name (case-insensitive). `None` unless both
    /// `amount` and `category` are present.
    pub(crate) fn from_headers(headers: &[String]) -> Option<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        Some(Self {
            title: find(&["title", "description", "name"]),
            amount: find(&["amount", "value"])?,
            category: find(&["category"])?,
            date: find(&["date"]),
        })
    }
}

/// Read expenses from a CSV file. A first row naming `amount` and
/// `category` is taken as a header and locates the columns; otherwise the
/// default column order applies.
pub(crate) fn read_expenses(path: &Path) -> Result<Vec<NewExpense>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    rows.retain(|row| row.iter().any(|field| !field.trim().is_empty()));

    if rows.is_empty() {
        anyhow::bail!("CSV file is empty");
    }

    let columns = match ColumnMap::from_headers(&rows[0]) {
        Some(columns) => {
            rows.remove(0);
            columns
        }
        None => ColumnMap::default(),
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row, &columns).with_context(|| format!("Row {}", i + 1)))
        .collect()
}

fn field(row: &[String], column: Option<usize>) -> Option<String> {
    column
        .and_then(|c| row.get(c))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_row(row: &[String], columns: &ColumnMap) -> Result<NewExpense> {
    let amount = match field(row, Some(columns.amount)) {
        Some(raw) => Some(parse_decimal(&raw)?),
        None => None,
    };
    Ok(NewExpense {
        title: field(row, columns.title).unwrap_or_default(),
        amount,
        category: field(row, Some(columns.category)),
        date: field(row, columns.date),
    })
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
