//! Budget aggregation: matching expenses to budgets by normalized category
//! and deriving spent / remaining / warning state on demand.
//!
//! Nothing here caches. Each call reads the current rows for one owner, so a
//! status reflects whatever expenses exist at the moment of the read.

mod warnings;

pub(crate) use warnings::{classify, generate_warnings, BudgetWarning};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::{normalize_category, Budget, BudgetStatus, Expense, UpsertOutcome};
use crate::util::parse_date;

/// Dashboard view: every budget's status plus the warnings they trigger.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Summary {
    pub(crate) budgets: Vec<BudgetStatus>,
    pub(crate) warnings: Vec<BudgetWarning>,
    pub(crate) total_spent: Decimal,
    pub(crate) total_limit: Decimal,
}

/// Largest expense amount or budget limit accepted on input.
const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn within_max(amount: Decimal) -> bool {
    amount <= Decimal::from(MAX_AMOUNT)
}

fn tally(budget: &Budget, expenses: &[Expense]) -> ApiResult<BudgetStatus> {
    BudgetStatus::tally(budget, expenses).ok_or_else(|| {
        warn!(owner = %budget.owner, category = %budget.category, "budget totals overflowed");
        ApiError::OutOfRange(budget.category.clone())
    })
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> ApiResult<Decimal> {
    amounts
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| ApiError::OutOfRange("summary".into()))
}

/// Expense as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct NewExpense {
    pub(crate) title: String,
    pub(crate) amount: Option<Decimal>,
    pub(crate) category: Option<String>,
    pub(crate) date: Option<String>,
}

// ── Budgets ───────────────────────────────────────────────────

pub(crate) fn compute_status(db: &Database, owner: &str, category: &str) -> ApiResult<BudgetStatus> {
    let key = normalize_category(category);
    let budget = db
        .get_budget(owner, &key)?
        .ok_or_else(|| ApiError::not_found("No budget set for category"))?;
    let expenses = db.get_expenses_in_category(owner, &key)?;
    let status = tally(&budget, &expenses)?;
    debug!(owner, category = %key, spent = %status.spent, "computed budget status");
    Ok(status)
}

/// Status for every budget of `owner`, ordered by category.
pub(crate) fn compute_all_statuses(db: &Database, owner: &str) -> ApiResult<Vec<BudgetStatus>> {
    let budgets = db.get_budgets(owner)?;
    if budgets.is_empty() {
        return Ok(Vec::new());
    }
    let expenses = db.get_expenses(owner)?;
    budgets.iter().map(|b| tally(b, &expenses)).collect()
}

pub(crate) fn summarize(db: &Database, owner: &str) -> ApiResult<Summary> {
    let budgets = compute_all_statuses(db, owner)?;
    let warnings = generate_warnings(&budgets);
    let total_spent = checked_total(budgets.iter().map(|s| s.spent))?;
    let total_limit = checked_total(budgets.iter().map(|s| s.limit))?;
    Ok(Summary {
        budgets,
        warnings,
        total_spent,
        total_limit,
    })
}

pub(crate) fn list_budgets(db: &Database, owner: &str) -> ApiResult<Vec<Budget>> {
    Ok(db.get_budgets(owner)?)
}

/// Create the budget for (owner, normalized category) or overwrite its
/// limit. Calling twice converges on the latest limit.
pub(crate) fn upsert_budget(
    db: &mut Database,
    owner: &str,
    category: &str,
    limit: Option<Decimal>,
) -> ApiResult<(Budget, UpsertOutcome)> {
    let limit = match limit {
        Some(limit) if !normalize_category(category).is_empty() => limit,
        _ => return Err(ApiError::validation("Category and limit required")),
    };
    if limit <= Decimal::ZERO {
        return Err(ApiError::validation("Limit must be greater than zero"));
    }
    if !within_max(limit) {
        return Err(ApiError::validation(format!(
            "Limit cannot exceed {MAX_AMOUNT}"
        )));
    }

    let (budget, outcome) = db.upsert_budget(&Budget::new(owner.to_string(), category, limit))?;
    info!(owner, category = %budget.category, limit = %budget.limit, "{outcome}");
    Ok((budget, outcome))
}

pub(crate) fn delete_budget(db: &Database, owner: &str, category: &str) -> ApiResult<()> {
    let key = normalize_category(category);
    if !db.delete_budget(owner, &key)? {
        return Err(ApiError::not_found("Budget not found"));
    }
    info!(owner, category = %key, "budget deleted");
    Ok(())
}

// ── Expenses ──────────────────────────────────────────────────

/// Validate a submitted expense and attribute it to `owner`. Nothing is
/// written.
pub(crate) fn prepare_expense(owner: &str, input: NewExpense) -> ApiResult<Expense> {
    let category = input
        .category
        .filter(|c| !normalize_category(c).is_empty())
        .ok_or_else(|| ApiError::validation("Category is required"))?;
    let amount = input
        .amount
        .ok_or_else(|| ApiError::validation("Amount is required"))?;
    if amount < Decimal::ZERO {
        return Err(ApiError::validation("Amount cannot be negative"));
    }
    if !within_max(amount) {
        return Err(ApiError::validation(format!(
            "Amount cannot exceed {MAX_AMOUNT}"
        )));
    }

    let mut expense = Expense::new(owner.to_string(), input.title.trim().to_string(), amount, category);
    if let Some(date) = input.date.filter(|d| !d.trim().is_empty()) {
        expense.date =
            parse_date(&date).map_err(|_| ApiError::validation(format!("Invalid date: {date}")))?;
    }
    Ok(expense)
}

pub(crate) fn add_expense(db: &Database, owner: &str, input: NewExpense) -> ApiResult<Expense> {
    let mut expense = prepare_expense(owner, input)?;
    let id = db.insert_expense(&expense)?;
    expense.id = Some(id);
    info!(owner, id, amount = %expense.amount, category = %expense.category, "expense added");
    Ok(expense)
}

/// All-or-nothing: a single invalid row rejects the whole batch, reported
/// with its 1-based row number.
pub(crate) fn import_expenses(
    db: &mut Database,
    owner: &str,
    inputs: Vec<NewExpense>,
) -> ApiResult<usize> {
    let expenses = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            prepare_expense(owner, input).map_err(|e| match e {
                ApiError::Validation(msg) => ApiError::validation(format!("Row {}: {msg}", i + 1)),
                other => other,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let count = db.insert_expenses_batch(&expenses)?;
    info!(owner, count, "expenses imported");
    Ok(count)
}

pub(crate) fn list_expenses(db: &Database, owner: &str) -> ApiResult<Vec<Expense>> {
    Ok(db.get_expenses(owner)?)
}

/// Only the owner can delete. A foreign or unknown id is reported the same
/// way so callers cannot probe for other owners' records.
pub(crate) fn delete_expense(db: &Database, owner: &str, id: &str) -> ApiResult<()> {
    let not_found = || ApiError::not_found("Not found");
    let id: i64 = id.trim().parse().map_err(|_| not_found())?;
    if !db.delete_expense(owner, id)? {
        return Err(not_found());
    }
    info!(owner, id, "expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests;
