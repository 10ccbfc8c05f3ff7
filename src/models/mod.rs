mod budget;
mod expense;
mod status;

pub use budget::{Budget, UpsertOutcome};
pub use expense::Expense;
pub use status::BudgetStatus;

/// Canonical join key between expenses and budgets: trimmed, lowercased.
///
/// Every read and write path goes through this function, so `"Food"`,
/// `"food "` and `"FOOD"` all land on the same budget.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}
