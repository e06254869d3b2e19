//! The module contains `Expense`, a single outgoing payment booked against a
//! budget.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, PaymentStatus, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category: String,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub budget_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub date: Date,
    pub payment_status: String,
    pub receipt_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Budgets,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            budget_id: ActiveValue::Set(value.budget_id.to_string()),
            category: ActiveValue::Set(value.category.clone()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            description: ActiveValue::Set(value.description.clone()),
            vendor: ActiveValue::Set(value.vendor.clone()),
            date: ActiveValue::Set(value.date),
            payment_status: ActiveValue::Set(value.payment_status.as_str().to_string()),
            receipt_url: ActiveValue::Set(value.receipt_url.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            budget_id: parse_uuid(&model.budget_id, "budget")?,
            category: model.category,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            vendor: model.vendor,
            date: model.date,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            receipt_url: model.receipt_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
