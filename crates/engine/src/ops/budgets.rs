use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Budget, BudgetInput, BudgetStatus, EngineError, MoneyCents, ResultEngine, budgets,
    util::{encode_list, normalize_list, optional_text, require_positive, require_text},
};

use super::{Engine, convert_all, with_tx};

struct ValidBudget {
    event_id: String,
    name: String,
    total_budget: MoneyCents,
    notes: Option<String>,
    categories: Vec<String>,
}

fn validate(input: BudgetInput) -> ResultEngine<ValidBudget> {
    Ok(ValidBudget {
        event_id: require_text(&input.event_id, 100, "Event ID")?,
        name: require_text(&input.name, 100, "Budget name")?,
        total_budget: require_positive(input.total_budget, "Total budget")?,
        notes: optional_text(input.notes.as_deref(), 1000, "Notes")?,
        categories: normalize_list(input.categories),
    })
}

impl Engine {
    pub(crate) async fn require_budget<C>(&self, db: &C, id: &str) -> ResultEngine<budgets::Model>
    where
        C: ConnectionTrait,
    {
        budgets::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Budget", id))
    }

    /// Every budget, soft-deleted ones included.
    pub async fn budgets(&self) -> ResultEngine<Vec<Budget>> {
        tracing::debug!("listing budgets");
        let models = budgets::Entity::find()
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    pub async fn budget(&self, id: &str) -> ResultEngine<Budget> {
        tracing::debug!(id, "fetching budget");
        let model = self.require_budget(&self.database, id).await?;
        Budget::try_from(model)
    }

    pub async fn budgets_by_event(&self, event_id: &str) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::EventId.eq(event_id))
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Fails with `InvalidStatus` when `status` is not a budget status.
    pub async fn budgets_by_status(&self, status: &str) -> ResultEngine<Vec<Budget>> {
        let status = BudgetStatus::try_from(status)?;
        let models = budgets::Entity::find()
            .filter(budgets::Column::Status.eq(status.as_str()))
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Creates an `Active` budget with zero running totals. Any status in
    /// `input` is ignored.
    pub async fn create_budget(&self, input: BudgetInput) -> ResultEngine<Budget> {
        let valid = validate(input)?;
        let budget = Budget::new(
            valid.event_id,
            valid.name,
            valid.total_budget,
            valid.notes,
            valid.categories,
        );
        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        tracing::info!(budget_id = %budget.id, event_id = %budget.event_id, "budget created");
        Ok(budget)
    }

    /// Replaces the editable fields of a budget.
    ///
    /// The running totals are never taken from `input`. An unknown status
    /// falls back to `Active`.
    pub async fn update_budget(&self, id: &str, input: BudgetInput) -> ResultEngine<Budget> {
        let status = BudgetStatus::parse_or(input.status.as_deref(), BudgetStatus::Active);
        let valid = validate(input)?;
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, id).await?;
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                event_id: ActiveValue::Set(valid.event_id),
                name: ActiveValue::Set(valid.name),
                total_budget_minor: ActiveValue::Set(valid.total_budget.cents()),
                status: ActiveValue::Set(status.as_str().to_string()),
                notes: ActiveValue::Set(valid.notes),
                categories: ActiveValue::Set(encode_list(&valid.categories)),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            tracing::info!(budget_id = id, "budget updated");
            Budget::try_from(model)
        })
    }

    /// Soft delete: the budget moves to `Deleted`, children stay untouched.
    pub async fn delete_budget(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, id).await?;
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                status: ActiveValue::Set(BudgetStatus::Deleted.as_str().to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            tracing::info!(budget_id = id, "budget soft-deleted");
            Ok(())
        })
    }
}
