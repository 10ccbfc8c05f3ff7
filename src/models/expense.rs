use rust_decimal::Decimal;
use serde::Serialize;

use super::normalize_category;

#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub owner: String,
    pub title: String,
    pub amount: Decimal,
    /// Stored as submitted; use `category_key` for matching.
    pub category: String,
    /// RFC 3339 timestamp.
    pub date: String,
    pub created_at: String,
}

impl Expense {
    pub fn new(owner: String, title: String, amount: Decimal, category: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            owner,
            title,
            amount,
            category,
            date: now.clone(),
            created_at: now,
        }
    }

    pub fn category_key(&self) -> String {
        normalize_category(&self.category)
    }

    /// True when this expense counts toward a budget keyed by `key`.
    pub fn matches(&self, key: &str) -> bool {
        self.category_key() == key
    }
}
