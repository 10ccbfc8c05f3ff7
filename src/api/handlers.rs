use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::auth::Session;
use crate::engine::{self, NewExpense, Summary};
use crate::error::{ApiError, ApiResult};
use crate::models::{Budget, BudgetStatus, Expense};
use crate::util::parse_decimal;

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetRequest {
    category: Option<String>,
    limit: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpenseRequest {
    title: Option<String>,
    amount: Option<Value>,
    category: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertResponse {
    message: &'static str,
    created: bool,
    budget: Budget,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    message: &'static str,
}

/// Numbers and numeric strings are accepted; anything else counts as absent.
fn amount_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).ok(),
        Value::String(s) => parse_decimal(s).ok(),
        _ => None,
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| ApiError::validation(e.body_text()))
}

// ── Budgets ───────────────────────────────────────────────────

pub(crate) async fn list_budgets(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = state
        .with_db(move |db| engine::list_budgets(db, &session.owner))
        .await?;
    Ok(Json(budgets))
}

pub(crate) async fn upsert_budget(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> ApiResult<Json<UpsertResponse>> {
    let req = body(payload)?;
    let limit = req.limit.as_ref().and_then(amount_from_json);
    let category = req.category.unwrap_or_default();

    let (budget, outcome) = state
        .with_db(move |db| engine::upsert_budget(db, &session.owner, &category, limit))
        .await?;
    Ok(Json(UpsertResponse {
        message: outcome.as_str(),
        created: outcome.is_created(),
        budget,
    }))
}

pub(crate) async fn delete_budget(
    State(state): State<AppState>,
    session: Session,
    Path(category): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .with_db(move |db| engine::delete_budget(db, &session.owner, &category))
        .await?;
    Ok(Json(MessageResponse {
        message: "Budget deleted",
    }))
}

pub(crate) async fn budget_status(
    State(state): State<AppState>,
    session: Session,
    Path(category): Path<String>,
) -> ApiResult<Json<BudgetStatus>> {
    let status = state
        .with_db(move |db| engine::compute_status(db, &session.owner, &category))
        .await?;
    Ok(Json(status))
}

pub(crate) async fn summary(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Summary>> {
    let summary = state
        .with_db(move |db| engine::summarize(db, &session.owner))
        .await?;
    Ok(Json(summary))
}

// ── Expenses ──────────────────────────────────────────────────

pub(crate) async fn list_expenses(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = state
        .with_db(move |db| engine::list_expenses(db, &session.owner))
        .await?;
    Ok(Json(expenses))
}

pub(crate) async fn add_expense(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<Json<Expense>> {
    let req = body(payload)?;
    let input = NewExpense {
        title: req.title.unwrap_or_default(),
        amount: req.amount.as_ref().and_then(amount_from_json),
        category: req.category,
        date: req.date,
    };

    let expense = state
        .with_db(move |db| engine::add_expense(db, &session.owner, input))
        .await?;
    Ok(Json(expense))
}

pub(crate) async fn delete_expense(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .with_db(move |db| engine::delete_expense(db, &session.owner, &id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Deleted successfully",
    }))
}
