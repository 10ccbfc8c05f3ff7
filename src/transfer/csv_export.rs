use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Expense;

/// Write expenses as `date,title,amount,category`. The output reads back
/// through `read_expenses`.
pub(crate) fn write_expenses(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(["date", "title", "amount", "category"])?;
    for e in expenses {
        let amount = e.amount.to_string();
        wtr.write_record([
            e.date.as_str(),
            e.title.as_str(),
            amount.as_str(),
            e.category.as_str(),
        ])?;
    }
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(expenses.len())
}
