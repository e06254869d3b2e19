use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseInput, MoneyCents, PaymentStatus, ResultEngine, expenses,
    util::{optional_text, parse_uuid, require_positive, require_text},
};

use super::{Engine, convert_all, ledger::LedgerTotal, with_tx};

fn validate(input: &ExpenseInput) -> ResultEngine<()> {
    require_text(&input.category, 50, "Category")?;
    require_positive(input.amount, "Amount")?;
    optional_text(input.description.as_deref(), 1000, "Description")?;
    optional_text(input.vendor.as_deref(), 100, "Vendor")?;
    optional_text(input.receipt_url.as_deref(), 255, "Receipt URL")?;
    Ok(())
}

impl Engine {
    async fn require_expense<C>(&self, db: &C, id: &str) -> ResultEngine<expenses::Model>
    where
        C: ConnectionTrait,
    {
        expenses::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Expense", id))
    }

    pub async fn expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    pub async fn expense(&self, id: &str) -> ResultEngine<Expense> {
        tracing::debug!(id, "fetching expense");
        let model = self.require_expense(&self.database, id).await?;
        Expense::try_from(model)
    }

    pub async fn expenses_by_budget(&self, budget_id: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::BudgetId.eq(budget_id))
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Fails with `InvalidStatus` when `status` is not a payment status.
    pub async fn expenses_by_status(&self, status: &str) -> ResultEngine<Vec<Expense>> {
        let status = PaymentStatus::try_from(status)?;
        let models = expenses::Entity::find()
            .filter(expenses::Column::PaymentStatus.eq(status.as_str()))
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Books a new expense and adds its amount to the budget's
    /// `current_expenses`.
    ///
    /// Fails with `KeyNotFound`, writing nothing, when the budget is absent.
    /// An unknown payment status becomes `Pending`.
    pub async fn create_expense(
        &self,
        budget_id: &str,
        input: ExpenseInput,
    ) -> ResultEngine<Expense> {
        validate(&input)?;
        with_tx!(self, |db_tx| {
            let budget = self.require_budget(&db_tx, budget_id).await?;
            let now = Utc::now();
            let expense = Expense {
                id: Uuid::new_v4(),
                budget_id: parse_uuid(&budget.id, "budget")?,
                category: input.category.trim().to_string(),
                amount: input.amount,
                description: optional_text(input.description.as_deref(), 1000, "Description")?,
                vendor: optional_text(input.vendor.as_deref(), 100, "Vendor")?,
                date: input.date,
                payment_status: PaymentStatus::parse_or_default(input.payment_status.as_deref()),
                receipt_url: optional_text(input.receipt_url.as_deref(), 255, "Receipt URL")?,
                created_at: now,
                updated_at: now,
            };
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            self.adjust_budget_total(&db_tx, &budget.id, LedgerTotal::Expenses, expense.amount)
                .await?;
            tracing::info!(
                expense_id = %expense.id,
                budget_id = %budget.id,
                amount = %expense.amount,
                "expense created"
            );
            Ok(expense)
        })
    }

    /// Replaces an expense and moves the budget total by
    /// `new amount - old amount`.
    ///
    /// The owning budget never changes. An unknown payment status keeps the
    /// stored one.
    pub async fn update_expense(&self, id: &str, input: ExpenseInput) -> ResultEngine<Expense> {
        validate(&input)?;
        with_tx!(self, |db_tx| {
            let existing = Expense::try_from(self.require_expense(&db_tx, id).await?)?;
            let delta = input.amount - existing.amount;
            let expense = Expense {
                category: input.category.trim().to_string(),
                amount: input.amount,
                description: optional_text(input.description.as_deref(), 1000, "Description")?,
                vendor: optional_text(input.vendor.as_deref(), 100, "Vendor")?,
                date: input.date,
                payment_status: PaymentStatus::parse_or(
                    input.payment_status.as_deref(),
                    existing.payment_status,
                ),
                receipt_url: optional_text(input.receipt_url.as_deref(), 255, "Receipt URL")?,
                updated_at: Utc::now(),
                ..existing
            };
            expenses::ActiveModel::from(&expense).update(&db_tx).await?;

            let budget_id = expense.budget_id.to_string();
            self.adjust_budget_total(&db_tx, &budget_id, LedgerTotal::Expenses, delta)
                .await?;
            tracing::info!(expense_id = id, delta = %delta, "expense updated");
            Ok(expense)
        })
    }

    /// Subtracts the expense amount from its budget, then removes the expense.
    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self.require_expense(&db_tx, id).await?;
            self.adjust_budget_total(
                &db_tx,
                &existing.budget_id,
                LedgerTotal::Expenses,
                -MoneyCents::new(existing.amount_minor),
            )
            .await?;
            expenses::Entity::delete_by_id(existing.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(expense_id = id, budget_id = %existing.budget_id, "expense deleted");
            Ok(())
        })
    }
}
