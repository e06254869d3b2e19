use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Budget, BudgetInput, BudgetStatus, Engine, EngineError, ExpenseInput, IncomeInput,
    IncomeStatus, MoneyCents, PaymentStatus,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn cents(value: &str) -> MoneyCents {
    value.parse().unwrap()
}

async fn gala_budget(engine: &Engine) -> Budget {
    engine
        .create_budget(BudgetInput::new("event-1", "Gala", cents("10000.00")))
        .await
        .unwrap()
}

#[tokio::test]
async fn new_budget_starts_active_with_zero_totals() {
    let (engine, _db) = engine_with_db().await;

    let budget = engine
        .create_budget(
            BudgetInput::new("event-1", "Gala", cents("10000"))
                .status("CLOSED")
                .categories(vec!["Venue".to_string(), "Catering".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(budget.status, BudgetStatus::Active);
    assert_eq!(budget.current_expenses, MoneyCents::ZERO);
    assert_eq!(budget.current_income, MoneyCents::ZERO);
    assert_eq!(budget.categories, vec!["Venue", "Catering"]);

    let stored = engine.budget(&budget.id.to_string()).await.unwrap();
    assert_eq!(stored.id, budget.id);
    assert_eq!(stored.total_budget, cents("10000"));
    assert_eq!(stored.categories, budget.categories);
}

#[tokio::test]
async fn expense_lifecycle_moves_current_expenses() {
    let (engine, _db) = engine_with_db().await;
    let budget = gala_budget(&engine).await;
    let budget_id = budget.id.to_string();

    engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", cents("500.00"), day()))
        .await
        .unwrap();
    let after_first = engine.budget(&budget_id).await.unwrap();
    assert_eq!(after_first.current_expenses, cents("500.00"));

    let expense = engine
        .create_expense(&budget_id, ExpenseInput::new("Catering", cents("100.00"), day()))
        .await
        .unwrap();
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, cents("600.00"));

    let expense_id = expense.id.to_string();
    engine
        .update_expense(
            &expense_id,
            ExpenseInput::new("Catering", cents("150.00"), day()),
        )
        .await
        .unwrap();
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, cents("650.00"));

    engine.delete_expense(&expense_id).await.unwrap();
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, cents("500.00"));

    let err = engine.expense(&expense_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn income_lifecycle_moves_current_income() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();

    let income = engine
        .create_income(
            &budget_id,
            IncomeInput::new("Tickets", cents("2500.00"), day()).source("Box office"),
        )
        .await
        .unwrap();
    assert_eq!(
        engine.budget(&budget_id).await.unwrap().current_income,
        cents("2500.00")
    );

    let income_id = income.id.to_string();
    engine
        .update_income(
            &income_id,
            IncomeInput::new("Tickets", cents("2000.00"), day()).status("RECEIVED"),
        )
        .await
        .unwrap();
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_income, cents("2000.00"));
    assert_eq!(budget.current_expenses, MoneyCents::ZERO);

    let income = engine.income(&income_id).await.unwrap();
    assert_eq!(income.status, IncomeStatus::Received);

    engine.delete_income(&income_id).await.unwrap();
    assert_eq!(
        engine.budget(&budget_id).await.unwrap().current_income,
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn running_total_matches_sum_after_mixed_operations() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();

    let mut ids = Vec::new();
    for amount in ["10.10", "20.20", "30.30", "0.01"] {
        let expense = engine
            .create_expense(&budget_id, ExpenseInput::new("Misc", cents(amount), day()))
            .await
            .unwrap();
        ids.push(expense.id.to_string());
    }
    engine
        .update_expense(&ids[1], ExpenseInput::new("Misc", cents("5.05"), day()))
        .await
        .unwrap();
    engine.delete_expense(&ids[2]).await.unwrap();
    engine
        .update_expense(&ids[3], ExpenseInput::new("Misc", cents("99.99"), day()))
        .await
        .unwrap();

    let stored: MoneyCents = engine
        .expenses_by_budget(&budget_id)
        .await
        .unwrap()
        .into_iter()
        .map(|expense| expense.amount)
        .sum();
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(stored, cents("115.14"));
    assert_eq!(budget.current_expenses, stored);

    let report = engine.recompute_budget_totals(&budget_id).await.unwrap();
    assert!(!report.drifted());
}

#[tokio::test]
async fn expense_against_missing_budget_writes_nothing() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_expense(
            "00000000-0000-0000-0000-000000000000",
            ExpenseInput::new("Venue", cents("100"), day()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_expense_and_income_are_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.expense("nope").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine
        .update_income("nope", IncomeInput::new("Tickets", cents("1"), day()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.delete_expense("nope").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn unknown_statuses_fall_back_to_defaults() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();

    let expense = engine
        .create_expense(
            &budget_id,
            ExpenseInput::new("Venue", cents("100"), day()).payment_status("MAYBE"),
        )
        .await
        .unwrap();
    assert_eq!(expense.payment_status, PaymentStatus::Pending);

    let income = engine
        .create_income(
            &budget_id,
            IncomeInput::new("Tickets", cents("100"), day()).status("SOMEDAY"),
        )
        .await
        .unwrap();
    assert_eq!(income.status, IncomeStatus::Expected);

    let paid = engine
        .update_expense(
            &expense.id.to_string(),
            ExpenseInput::new("Venue", cents("100"), day()).payment_status("paid"),
        )
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let kept = engine
        .update_expense(
            &expense.id.to_string(),
            ExpenseInput::new("Venue", cents("100"), day()).payment_status("garbage"),
        )
        .await
        .unwrap();
    assert_eq!(kept.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn status_queries_reject_unknown_values() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.budgets_by_status("OPEN").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
    let err = engine.expenses_by_status("LATE").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
    let err = engine.incomes_by_status("LATE").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));

    assert!(engine.budgets_by_status("active").await.unwrap().is_empty());
}

#[tokio::test]
async fn budget_update_keeps_running_totals() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();
    engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", cents("250"), day()))
        .await
        .unwrap();

    let updated = engine
        .update_budget(
            &budget_id,
            BudgetInput::new("event-1", "Gala 2025", cents("12000")).status("CLOSED"),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Gala 2025");
    assert_eq!(updated.status, BudgetStatus::Closed);
    assert_eq!(updated.total_budget, cents("12000"));
    assert_eq!(updated.current_expenses, cents("250"));

    let by_event = engine.budgets_by_event("event-1").await.unwrap();
    assert_eq!(by_event.len(), 1);
}

#[tokio::test]
async fn delete_budget_is_soft() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();

    engine.delete_budget(&budget_id).await.unwrap();

    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.status, BudgetStatus::Deleted);
    let deleted = engine.budgets_by_status("DELETED").await.unwrap();
    assert_eq!(deleted.len(), 1);
}

#[tokio::test]
async fn budget_validation_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_budget(BudgetInput::new("event-1", "Gala", MoneyCents::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_budget(BudgetInput::new("  ", "Gala", cents("10")))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let budget_id = gala_budget(&engine).await.id.to_string();
    let err = engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", MoneyCents::ZERO, day()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn reconcile_repairs_drifted_totals() {
    let (engine, db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();
    engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", cents("300"), day()))
        .await
        .unwrap();
    engine
        .create_income(&budget_id, IncomeInput::new("Tickets", cents("120"), day()))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE budgets SET current_expenses_minor = ? WHERE id = ?",
        vec![1_i64.into(), budget_id.clone().into()],
    ))
    .await
    .unwrap();

    let report = engine.recompute_budget_totals(&budget_id).await.unwrap();
    assert!(report.drifted());
    assert_eq!(report.expenses_before, MoneyCents::new(1));
    assert_eq!(report.expenses_after, cents("300"));
    assert_eq!(report.income_before, cents("120"));
    assert_eq!(report.income_after, cents("120"));

    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, cents("300"));

    let reports = engine.reconcile_all_budgets().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].drifted());
}

#[tokio::test]
async fn recompute_missing_budget_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.recompute_budget_totals("nope").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_expenses_lose_no_updates() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("ledger.db").display());
    let db = Database::connect(url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());
    let budget_id = gala_budget(&engine).await.id.to_string();

    let writers: Vec<_> = (0..50)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let budget_id = budget_id.clone();
            tokio::spawn(async move {
                engine
                    .create_expense(
                        &budget_id,
                        ExpenseInput::new(format!("Item {i}"), cents("1.00"), day()),
                    )
                    .await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let budget = engine.budget(&budget_id).await.unwrap();
    let expenses = engine.expenses_by_budget(&budget_id).await.unwrap();
    assert_eq!(expenses.len(), 50);
    let sum: MoneyCents = expenses.iter().map(|e| e.amount).sum();
    assert_eq!(budget.current_expenses, sum);
    assert_eq!(budget.current_expenses, cents("50.00"));
}

#[tokio::test]
async fn failed_total_update_rolls_back_the_expense() {
    let (engine, db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE TRIGGER budgets_locked BEFORE UPDATE ON budgets \
         BEGIN SELECT RAISE(ABORT, 'budget locked'); END",
    ))
    .await
    .unwrap();

    let err = engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", cents("100"), day()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert!(engine.expenses().await.unwrap().is_empty());
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, MoneyCents::ZERO);
}

#[tokio::test]
async fn oversized_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();

    let too_big = MoneyCents::new(MoneyCents::MAX_AMOUNT.cents() + 1);
    let err = engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", too_big, day()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = engine
        .create_budget(BudgetInput::new("event-1", "Huge", too_big))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn total_that_would_overflow_writes_nothing() {
    let (engine, db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE budgets SET current_expenses_minor = ? WHERE id = ?",
        vec![(i64::MAX - 50).into(), budget_id.clone().into()],
    ))
    .await
    .unwrap();

    let err = engine
        .create_expense(&budget_id, ExpenseInput::new("Venue", cents("1.00"), day()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.expenses().await.unwrap().is_empty());
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, MoneyCents::new(i64::MAX - 50));
}

#[tokio::test]
async fn recompute_reports_overflowing_sums() {
    let (engine, db) = engine_with_db().await;
    let budget_id = gala_budget(&engine).await.id.to_string();
    for category in ["Venue", "Catering"] {
        engine
            .create_expense(&budget_id, ExpenseInput::new(category, cents("1"), day()))
            .await
            .unwrap();
    }
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE expenses SET amount_minor = ? WHERE budget_id = ?",
        vec![(i64::MAX / 2 + 1).into(), budget_id.clone().into()],
    ))
    .await
    .unwrap();

    let err = engine.recompute_budget_totals(&budget_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let budget = engine.budget(&budget_id).await.unwrap();
    assert_eq!(budget.current_expenses, cents("2"));
}
