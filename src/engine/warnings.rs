use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::BudgetStatus;

/// Spending at or above this fraction of the limit is "near limit".
const NEAR_LIMIT_RATIO: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum BudgetWarning {
    /// `spent >= limit`; `over_by` may be zero on the boundary.
    OverBudget { category: String, over_by: Decimal },
    /// `limit * 0.9 <= spent < limit`.
    NearLimit { category: String, percent: Decimal },
}

impl std::fmt::Display for BudgetWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverBudget { category, over_by } => {
                let over_by = round_half_up(*over_by, 2);
                write!(f, "{category} is OVER budget by ${over_by:.2}")
            }
            Self::NearLimit { category, percent } => {
                let percent = round_half_up(*percent, 1);
                write!(f, "{category} is near its limit ({percent:.1}%)")
            }
        }
    }
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Both thresholds are inclusive: exactly 100% is over budget, exactly 90%
/// is near limit.
pub(crate) fn classify(status: &BudgetStatus) -> Option<BudgetWarning> {
    if status.is_over() {
        return Some(BudgetWarning::OverBudget {
            category: status.category.clone(),
            over_by: status.spent.saturating_sub(status.limit),
        });
    }
    if status.spent >= status.limit * NEAR_LIMIT_RATIO {
        return status.percent_used().map(|percent| BudgetWarning::NearLimit {
            category: status.category.clone(),
            percent,
        });
    }
    None
}

pub(crate) fn generate_warnings(statuses: &[BudgetStatus]) -> Vec<BudgetWarning> {
    statuses.iter().filter_map(classify).collect()
}

#[cfg(test)]
#[path = "warnings_tests.rs"]
mod tests;
