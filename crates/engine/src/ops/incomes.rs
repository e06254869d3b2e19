use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Income, IncomeInput, IncomeStatus, MoneyCents, ResultEngine, incomes,
    util::{optional_text, parse_uuid, require_positive, require_text},
};

use super::{Engine, convert_all, ledger::LedgerTotal, with_tx};

fn validate(input: &IncomeInput) -> ResultEngine<()> {
    require_text(&input.category, 50, "Category")?;
    require_positive(input.amount, "Amount")?;
    optional_text(input.description.as_deref(), 1000, "Description")?;
    optional_text(input.source.as_deref(), 100, "Source")?;
    Ok(())
}

impl Engine {
    async fn require_income<C>(&self, db: &C, id: &str) -> ResultEngine<incomes::Model>
    where
        C: ConnectionTrait,
    {
        incomes::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Income", id))
    }

    pub async fn incomes(&self) -> ResultEngine<Vec<Income>> {
        let models = incomes::Entity::find()
            .order_by_asc(incomes::Column::Date)
            .order_by_asc(incomes::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    pub async fn income(&self, id: &str) -> ResultEngine<Income> {
        tracing::debug!(id, "fetching income");
        let model = self.require_income(&self.database, id).await?;
        Income::try_from(model)
    }

    pub async fn incomes_by_budget(&self, budget_id: &str) -> ResultEngine<Vec<Income>> {
        let models = incomes::Entity::find()
            .filter(incomes::Column::BudgetId.eq(budget_id))
            .order_by_asc(incomes::Column::Date)
            .order_by_asc(incomes::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Fails with `InvalidStatus` when `status` is not an income status.
    pub async fn incomes_by_status(&self, status: &str) -> ResultEngine<Vec<Income>> {
        let status = IncomeStatus::try_from(status)?;
        let models = incomes::Entity::find()
            .filter(incomes::Column::Status.eq(status.as_str()))
            .order_by_asc(incomes::Column::Date)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Books a new income and adds its amount to the budget's
    /// `current_income`. An unknown status becomes `Expected`.
    pub async fn create_income(&self, budget_id: &str, input: IncomeInput) -> ResultEngine<Income> {
        validate(&input)?;
        with_tx!(self, |db_tx| {
            let budget = self.require_budget(&db_tx, budget_id).await?;
            let now = Utc::now();
            let income = Income {
                id: Uuid::new_v4(),
                budget_id: parse_uuid(&budget.id, "budget")?,
                category: input.category.trim().to_string(),
                amount: input.amount,
                description: optional_text(input.description.as_deref(), 1000, "Description")?,
                source: optional_text(input.source.as_deref(), 100, "Source")?,
                date: input.date,
                status: IncomeStatus::parse_or_default(input.status.as_deref()),
                created_at: now,
                updated_at: now,
            };
            incomes::ActiveModel::from(&income).insert(&db_tx).await?;
            self.adjust_budget_total(&db_tx, &budget.id, LedgerTotal::Income, income.amount)
                .await?;
            tracing::info!(
                income_id = %income.id,
                budget_id = %budget.id,
                amount = %income.amount,
                "income created"
            );
            Ok(income)
        })
    }

    /// Replaces an income and moves the budget total by the amount delta.
    /// An unknown status keeps the stored one.
    pub async fn update_income(&self, id: &str, input: IncomeInput) -> ResultEngine<Income> {
        validate(&input)?;
        with_tx!(self, |db_tx| {
            let existing = Income::try_from(self.require_income(&db_tx, id).await?)?;
            let delta = input.amount - existing.amount;
            let income = Income {
                category: input.category.trim().to_string(),
                amount: input.amount,
                description: optional_text(input.description.as_deref(), 1000, "Description")?,
                source: optional_text(input.source.as_deref(), 100, "Source")?,
                date: input.date,
                status: IncomeStatus::parse_or(input.status.as_deref(), existing.status),
                updated_at: Utc::now(),
                ..existing
            };
            incomes::ActiveModel::from(&income).update(&db_tx).await?;

            let budget_id = income.budget_id.to_string();
            self.adjust_budget_total(&db_tx, &budget_id, LedgerTotal::Income, delta)
                .await?;
            tracing::info!(income_id = id, delta = %delta, "income updated");
            Ok(income)
        })
    }

    pub async fn delete_income(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self.require_income(&db_tx, id).await?;
            self.adjust_budget_total(
                &db_tx,
                &existing.budget_id,
                LedgerTotal::Income,
                -MoneyCents::new(existing.amount_minor),
            )
            .await?;
            incomes::Entity::delete_by_id(existing.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(income_id = id, budget_id = %existing.budget_id, "income deleted");
            Ok(())
        })
    }
}
