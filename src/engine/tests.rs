#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn add(db: &Database, owner: &str, category: &str, amount: Decimal) -> Expense {
    add_expense(
        db,
        owner,
        NewExpense {
            title: format!("{category} spend"),
            amount: Some(amount),
            category: Some(category.into()),
            date: None,
        },
    )
    .unwrap()
}

fn budget(db: &mut Database, owner: &str, category: &str, limit: Decimal) -> Budget {
    upsert_budget(db, owner, category, Some(limit)).unwrap().0
}

// ── compute_status ────────────────────────────────────────────

#[test]
fn test_status_groceries_example() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "groceries", dec!(200));
    add(&db, "alice", "groceries", dec!(50));
    add(&db, "alice", "Groceries", dec!(30));

    let status = compute_status(&db, "alice", "groceries").unwrap();
    assert_eq!(status.category, "groceries");
    assert_eq!(status.limit, dec!(200));
    assert_eq!(status.spent, dec!(80));
    assert_eq!(status.remaining, dec!(120));
}

#[test]
fn test_status_rent_over_budget() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "rent", dec!(1000));
    add(&db, "alice", "rent", dec!(1200));

    let status = compute_status(&db, "alice", "rent").unwrap();
    assert_eq!(status.spent, dec!(1200));
    assert_eq!(status.remaining, dec!(-200));
    assert_eq!(
        classify(&status).unwrap().to_string(),
        "rent is OVER budget by $200.00"
    );
}

#[test]
fn test_status_input_category_normalized() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    add(&db, "alice", "Food ", dec!(10));

    for query in ["food", "FOOD", "  Food  "] {
        let status = compute_status(&db, "alice", query).unwrap();
        assert_eq!(status.category, "food");
        assert_eq!(status.spent, dec!(10), "query {query:?}");
    }
}

#[test]
fn test_status_without_budget_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "alice", "food", dec!(10));
    let err = compute_status(&db, "alice", "food").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_status_zero_expenses() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "travel", dec!(300));
    let status = compute_status(&db, "alice", "travel").unwrap();
    assert_eq!(status.spent, Decimal::ZERO);
    assert_eq!(status.remaining, dec!(300));
}

#[test]
fn test_status_ignores_other_owners() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    add(&db, "alice", "food", dec!(10));
    add(&db, "bob", "food", dec!(999));

    let status = compute_status(&db, "alice", "food").unwrap();
    assert_eq!(status.spent, dec!(10));
    assert!(matches!(
        compute_status(&db, "bob", "food").unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[test]
fn test_status_reflects_new_expenses() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    add(&db, "alice", "food", dec!(10));
    assert_eq!(compute_status(&db, "alice", "food").unwrap().spent, dec!(10));
    add(&db, "alice", "FOOD", dec!(15));
    assert_eq!(compute_status(&db, "alice", "food").unwrap().spent, dec!(25));
}

// ── compute_all_statuses / summarize ──────────────────────────

#[test]
fn test_all_statuses() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "rent", dec!(1000));
    budget(&mut db, "alice", "food", dec!(100));
    add(&db, "alice", "Food", dec!(95));
    add(&db, "alice", "rent", dec!(400));
    add(&db, "alice", "uncategorized stuff", dec!(7));

    let statuses = compute_all_statuses(&db, "alice").unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].category, "food");
    assert_eq!(statuses[0].spent, dec!(95));
    assert_eq!(statuses[1].category, "rent");
    assert_eq!(statuses[1].spent, dec!(400));

    for s in &statuses {
        assert_eq!(s, &compute_status(&db, "alice", &s.category).unwrap());
    }
}

#[test]
fn test_all_statuses_no_budgets() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "alice", "food", dec!(10));
    assert!(compute_all_statuses(&db, "alice").unwrap().is_empty());
}

#[test]
fn test_summarize_totals_and_warnings() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    budget(&mut db, "alice", "gym", dec!(50));
    budget(&mut db, "alice", "rent", dec!(1000));
    add(&db, "alice", "food", dec!(95));
    add(&db, "alice", "gym", dec!(10));
    add(&db, "alice", "rent", dec!(1200));

    let summary = summarize(&db, "alice").unwrap();
    assert_eq!(summary.budgets.len(), 3);
    assert_eq!(summary.total_spent, dec!(1305));
    assert_eq!(summary.total_limit, dec!(1150));
    let messages: Vec<String> = summary.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "food is near its limit (95.0%)",
            "rent is OVER budget by $200.00",
        ]
    );
}

// ── upsert_budget ─────────────────────────────────────────────

#[test]
fn test_upsert_converges_on_latest_limit() {
    let mut db = Database::open_in_memory().unwrap();
    let (_, first) = upsert_budget(&mut db, "alice", "Food", Some(dec!(100))).unwrap();
    let (saved, second) = upsert_budget(&mut db, "alice", "food ", Some(dec!(250))).unwrap();

    assert_eq!(first, UpsertOutcome::Created);
    assert_eq!(second, UpsertOutcome::Updated);
    assert_eq!(saved.limit, dec!(250));

    let budgets = list_budgets(&db, "alice").unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].category, "food");
    assert_eq!(budgets[0].limit, dec!(250));
}

#[test]
fn test_upsert_requires_category() {
    let mut db = Database::open_in_memory().unwrap();
    for category in ["", "   "] {
        let err = upsert_budget(&mut db, "alice", category, Some(dec!(10))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
    assert!(list_budgets(&db, "alice").unwrap().is_empty());
}

#[test]
fn test_upsert_requires_limit() {
    let mut db = Database::open_in_memory().unwrap();
    let err = upsert_budget(&mut db, "alice", "food", None).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn test_upsert_rejects_non_positive_limit() {
    let mut db = Database::open_in_memory().unwrap();
    for limit in [Decimal::ZERO, dec!(-5)] {
        let err = upsert_budget(&mut db, "alice", "food", Some(limit)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

// ── delete_budget ─────────────────────────────────────────────

#[test]
fn test_delete_budget_orphans_expenses() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    add(&db, "alice", "food", dec!(10));

    delete_budget(&db, "alice", " FOOD").unwrap();
    assert!(matches!(
        compute_status(&db, "alice", "food").unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert_eq!(list_expenses(&db, "alice").unwrap().len(), 1);
}

#[test]
fn test_delete_budget_missing() {
    let db = Database::open_in_memory().unwrap();
    let err = delete_budget(&db, "alice", "food").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_add_expense_assigns_id_and_owner() {
    let db = Database::open_in_memory().unwrap();
    let e = add(&db, "alice", "Food", dec!(12.34));
    assert!(e.id.is_some());
    assert_eq!(e.owner, "alice");
    assert_eq!(e.category, "Food");
    assert_eq!(list_expenses(&db, "alice").unwrap().len(), 1);
}

#[test]
fn test_add_expense_zero_amount_accepted() {
    let db = Database::open_in_memory().unwrap();
    let e = add(&db, "alice", "food", Decimal::ZERO);
    assert_eq!(e.amount, Decimal::ZERO);
}

#[test]
fn test_add_expense_rejects_negative_amount() {
    let db = Database::open_in_memory().unwrap();
    let err = add_expense(
        &db,
        "alice",
        NewExpense {
            amount: Some(dec!(-1)),
            category: Some("food".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(list_expenses(&db, "alice").unwrap().is_empty());
}

#[test]
fn test_add_expense_requires_amount_and_category() {
    let db = Database::open_in_memory().unwrap();
    let missing_amount = NewExpense {
        category: Some("food".into()),
        ..Default::default()
    };
    let missing_category = NewExpense {
        amount: Some(dec!(1)),
        category: Some("  ".into()),
        ..Default::default()
    };
    for input in [missing_amount, missing_category] {
        let err = add_expense(&db, "alice", input).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

#[test]
fn test_add_expense_with_date() {
    let db = Database::open_in_memory().unwrap();
    let e = add_expense(
        &db,
        "alice",
        NewExpense {
            title: "Lunch".into(),
            amount: Some(dec!(9)),
            category: Some("food".into()),
            date: Some("2024-01-15".into()),
        },
    )
    .unwrap();
    assert_eq!(e.date, "2024-01-15T00:00:00+00:00");
}

#[test]
fn test_add_expense_bad_date() {
    let db = Database::open_in_memory().unwrap();
    let err = add_expense(
        &db,
        "alice",
        NewExpense {
            amount: Some(dec!(9)),
            category: Some("food".into()),
            date: Some("yesterday".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn test_delete_expense_owned() {
    let db = Database::open_in_memory().unwrap();
    let e = add(&db, "alice", "food", dec!(1));
    delete_expense(&db, "alice", &e.id.unwrap().to_string()).unwrap();
    assert!(list_expenses(&db, "alice").unwrap().is_empty());
}

#[test]
fn test_delete_expense_cross_owner_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    let e = add(&db, "alice", "food", dec!(1));
    let err = delete_expense(&db, "mallory", &e.id.unwrap().to_string()).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(list_expenses(&db, "alice").unwrap().len(), 1);
}

#[test]
fn test_delete_expense_bad_id_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    for id in ["", "abc", "99999"] {
        let err = delete_expense(&db, "alice", id).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}

// ── import_expenses ───────────────────────────────────────────

fn row(category: &str, amount: Option<Decimal>) -> NewExpense {
    NewExpense {
        title: "imported".into(),
        amount,
        category: Some(category.into()),
        date: Some("2024-02-01".into()),
    }
}

#[test]
fn test_import_expenses_counts_toward_budget() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    let count = import_expenses(
        &mut db,
        "alice",
        vec![row("Food", Some(dec!(20))), row("food ", Some(dec!(5)))],
    )
    .unwrap();
    assert_eq!(count, 2);
    assert_eq!(compute_status(&db, "alice", "food").unwrap().spent, dec!(25));
}

#[test]
fn test_import_expenses_all_or_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let err = import_expenses(
        &mut db,
        "alice",
        vec![row("food", Some(dec!(20))), row("food", None)],
    )
    .unwrap_err();
    match err {
        ApiError::Validation(msg) => assert!(msg.starts_with("Row 2:"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(list_expenses(&db, "alice").unwrap().is_empty());
}

// ── Out-of-range amounts ──────────────────────────────────────

fn insert_raw(db: &Database, owner: &str, category: &str, amount: Decimal) {
    db.insert_expense(&Expense::new(owner.into(), "legacy".into(), amount, category.into()))
        .unwrap();
}

#[test]
fn test_status_overflow_is_typed_error() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    insert_raw(&db, "alice", "food", Decimal::MAX);
    insert_raw(&db, "alice", "food", Decimal::MAX);

    let err = compute_status(&db, "alice", "food").unwrap_err();
    assert!(matches!(err, ApiError::OutOfRange(ref c) if c == "food"), "{err:?}");
    assert!(matches!(summarize(&db, "alice"), Err(ApiError::OutOfRange(_))));

    // Other owners and listings are unaffected.
    assert_eq!(list_expenses(&db, "alice").unwrap().len(), 2);
    assert!(summarize(&db, "bob").unwrap().budgets.is_empty());
}

#[test]
fn test_summary_totals_overflow_is_typed_error() {
    let mut db = Database::open_in_memory().unwrap();
    budget(&mut db, "alice", "food", dec!(100));
    budget(&mut db, "alice", "rent", dec!(100));
    insert_raw(&db, "alice", "food", Decimal::MAX);
    insert_raw(&db, "alice", "rent", Decimal::MAX);

    // Each category fits on its own; only the grand total overflows.
    assert!(compute_status(&db, "alice", "food").is_ok());
    assert!(matches!(summarize(&db, "alice"), Err(ApiError::OutOfRange(_))));
}

#[test]
fn test_amount_above_maximum_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = add_expense(
        &db,
        "alice",
        NewExpense {
            title: "huge".into(),
            amount: Some(Decimal::MAX),
            category: Some("food".into()),
            date: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(list_expenses(&db, "alice").unwrap().is_empty());

    let at_max = Decimal::from(MAX_AMOUNT);
    assert!(prepare_expense(
        "alice",
        NewExpense {
            amount: Some(at_max),
            category: Some("food".into()),
            ..Default::default()
        }
    )
    .is_ok());
}

#[test]
fn test_limit_above_maximum_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    let err = upsert_budget(&mut db, "alice", "food", Some(Decimal::MAX)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(list_budgets(&db, "alice").unwrap().is_empty());
}
