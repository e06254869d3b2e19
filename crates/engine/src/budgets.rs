//! The `Budget` is the aggregate root of the ledger: it tracks the planned
//! total for an event together with the running totals of its expenses and
//! incomes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    BudgetStatus, EngineError, MoneyCents,
    util::{decode_list, encode_list, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub total_budget: MoneyCents,
    /// Denormalized sum of every expense owned by this budget.
    pub current_expenses: MoneyCents,
    /// Denormalized sum of every income owned by this budget.
    pub current_income: MoneyCents,
    pub status: BudgetStatus,
    pub notes: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// A fresh budget always starts `Active` with zero running totals.
    pub fn new(
        event_id: String,
        name: String,
        total_budget: MoneyCents,
        notes: Option<String>,
        categories: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            total_budget,
            current_expenses: MoneyCents::ZERO,
            current_income: MoneyCents::ZERO,
            status: BudgetStatus::Active,
            notes,
            categories,
            created_at: now,
            updated_at: now,
        }
    }

    /// Planned total minus what has been spent so far.
    #[must_use]
    pub fn remaining(&self) -> MoneyCents {
        self.total_budget - self.current_expenses
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub total_budget_minor: i64,
    pub current_expenses_minor: i64,
    pub current_income_minor: i64,
    pub status: String,
    pub notes: Option<String>,
    pub categories: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            event_id: ActiveValue::Set(value.event_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            total_budget_minor: ActiveValue::Set(value.total_budget.cents()),
            current_expenses_minor: ActiveValue::Set(value.current_expenses.cents()),
            current_income_minor: ActiveValue::Set(value.current_income.cents()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            notes: ActiveValue::Set(value.notes.clone()),
            categories: ActiveValue::Set(encode_list(&value.categories)),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            event_id: model.event_id,
            name: model.name,
            total_budget: MoneyCents::new(model.total_budget_minor),
            current_expenses: MoneyCents::new(model.current_expenses_minor),
            current_income: MoneyCents::new(model.current_income_minor),
            status: BudgetStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            categories: decode_list(&model.categories, "budget category")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_budget_starts_active_with_zero_totals() {
        let budget = Budget::new(
            "event-1".to_string(),
            "Gala".to_string(),
            MoneyCents::new(1_000_00),
            None,
            vec!["venue".to_string()],
        );
        assert_eq!(budget.status, BudgetStatus::Active);
        assert_eq!(budget.current_expenses, MoneyCents::ZERO);
        assert_eq!(budget.current_income, MoneyCents::ZERO);
        assert_eq!(budget.remaining(), MoneyCents::new(1_000_00));
    }

    #[test]
    fn model_round_trip_keeps_categories() {
        let budget = Budget::new(
            "event-1".to_string(),
            "Gala".to_string(),
            MoneyCents::new(500_00),
            Some("draft".to_string()),
            vec!["venue".to_string(), "food".to_string()],
        );
        let active: ActiveModel = (&budget).into();
        let model = Model {
            id: active.id.unwrap(),
            event_id: active.event_id.unwrap(),
            name: active.name.unwrap(),
            total_budget_minor: active.total_budget_minor.unwrap(),
            current_expenses_minor: active.current_expenses_minor.unwrap(),
            current_income_minor: active.current_income_minor.unwrap(),
            status: active.status.unwrap(),
            notes: active.notes.unwrap(),
            categories: active.categories.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
        };
        assert_eq!(Budget::try_from(model).unwrap(), budget);
    }
}
