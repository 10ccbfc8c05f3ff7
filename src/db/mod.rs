mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

/// SQLite-backed store for expenses and budgets. Every query is scoped by
/// owner; nothing here is shared across owners.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to read schema version")?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (owner, title, amount, category, category_key, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                expense.owner,
                expense.title,
                expense.amount.to_string(),
                expense.category,
                expense.category_key(),
                expense.date,
                expense.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn insert_expenses_batch(&mut self, expenses: &[Expense]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for expense in expenses {
            tx.execute(
                "INSERT INTO expenses (owner, title, amount, category, category_key, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    expense.owner,
                    expense.title,
                    expense.amount.to_string(),
                    expense.category,
                    expense.category_key(),
                    expense.date,
                    expense.created_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(expenses.len())
    }

    /// All expenses for `owner`, newest first.
    pub(crate) fn get_expenses(&self, owner: &str) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, title, amount, category, date, created_at
             FROM expenses WHERE owner = ?1
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Expenses for `owner` whose normalized category equals `key`.
    pub(crate) fn get_expenses_in_category(&self, owner: &str, key: &str) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, title, amount, category, date, created_at
             FROM expenses WHERE owner = ?1 AND category_key = ?2
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner, key], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    #[cfg(test)]
    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            "SELECT id, owner, title, amount, category, date, created_at
             FROM expenses WHERE id = ?1",
            params![id],
            row_to_expense,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes only when the expense belongs to `owner`. Returns whether a
    /// row was removed.
    pub(crate) fn delete_expense(&self, owner: &str, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        Ok(deleted > 0)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, category, limit_amount FROM budgets
             WHERE owner = ?1 ORDER BY category",
        )?;
        let rows = stmt.query_map(params![owner], row_to_budget)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// `key` must already be normalized.
    pub(crate) fn get_budget(&self, owner: &str, key: &str) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            "SELECT id, owner, category, limit_amount FROM budgets
             WHERE owner = ?1 AND category = ?2",
            params![owner, key],
            row_to_budget,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or overwrite the limit for (owner, normalized category).
    /// Runs in one immediate transaction so concurrent upserts of the same
    /// category serialize instead of losing an update.
    pub(crate) fn upsert_budget(&mut self, budget: &Budget) -> Result<(Budget, UpsertOutcome)> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM budgets WHERE owner = ?1 AND category = ?2",
                params![budget.owner, budget.category],
                |row| row.get(0),
            )
            .optional()?;

        tx.execute(
            "INSERT INTO budgets (owner, category, limit_amount)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(owner, category) DO UPDATE SET limit_amount = ?3",
            params![budget.owner, budget.category, budget.limit.to_string()],
        )?;

        let id = match existing {
            Some(id) => id,
            None => tx.last_insert_rowid(),
        };
        tx.commit()?;

        let outcome = if existing.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        let saved = Budget {
            id: Some(id),
            ..budget.clone()
        };
        Ok((saved, outcome))
    }

    /// `key` must already be normalized. Expenses in the category are kept.
    pub(crate) fn delete_budget(&self, owner: &str, key: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM budgets WHERE owner = ?1 AND category = ?2",
            params![owner, key],
        )?;
        Ok(deleted > 0)
    }
}

/// Unparsable stored amounts read back as zero.
fn parse_stored_amount(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_default()
}

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(3)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        owner: row.get(1)?,
        title: row.get(2)?,
        amount: parse_stored_amount(&amount_str),
        category: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let limit_str: String = row.get(3)?;
    Ok(Budget {
        id: Some(row.get(0)?),
        owner: row.get(1)?,
        category: row.get(2)?,
        limit: parse_stored_amount(&limit_str),
    })
}
