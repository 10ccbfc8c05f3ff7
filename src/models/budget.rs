use rust_decimal::Decimal;
use serde::Serialize;

use super::normalize_category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub id: Option<i64>,
    pub owner: String,
    /// Always normalized.
    pub category: String,
    pub limit: Decimal,
}

impl Budget {
    pub fn new(owner: String, category: &str, limit: Decimal) -> Self {
        Self {
            id: None,
            owner,
            category: normalize_category(category),
            limit,
        }
    }
}

/// Whether an upsert inserted a new budget or overwrote an existing limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Budget created",
            Self::Updated => "Budget updated",
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
