use rust_decimal::Decimal;
use serde::Serialize;

use super::{Budget, Expense};

/// Spending against one budget. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

impl BudgetStatus {
    /// Sum the expenses that match `budget`'s category. Non-matching
    /// expenses in `expenses` are ignored. `None` if `spent` or `remaining`
    /// falls outside the decimal range.
    pub fn tally(budget: &Budget, expenses: &[Expense]) -> Option<Self> {
        let spent = expenses
            .iter()
            .filter(|e| e.matches(&budget.category))
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))?;
        Some(Self {
            category: budget.category.clone(),
            limit: budget.limit,
            spent,
            remaining: budget.limit.checked_sub(spent)?,
        })
    }

    /// `spent / limit * 100`, or `None` for a zero limit.
    pub fn percent_used(&self) -> Option<Decimal> {
        self.spent
            .checked_div(self.limit)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    pub fn is_over(&self) -> bool {
        self.spent >= self.limit
    }
}
