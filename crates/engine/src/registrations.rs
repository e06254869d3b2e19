//! The module contains `Registration`: an attendee's ticket for one event,
//! with its payment and check-in state.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{CheckInStatus, EngineError, MoneyCents, RegistrationPaymentStatus, util::parse_uuid};

const CONFIRMATION_PREFIX: &str = "REG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub id: Uuid,
    pub attendee_id: String,
    pub event_id: String,
    pub confirmation_number: String,
    pub registration_date: DateTime<Utc>,
    pub payment_status: RegistrationPaymentStatus,
    pub ticket_price: Option<MoneyCents>,
    pub ticket_type: Option<String>,
    pub payment_method: Option<String>,
    pub check_in_status: CheckInStatus,
    pub check_in_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// `REG` followed by the first 8 hex digits of a fresh UUID, upper-cased.
pub fn generate_confirmation_number() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{CONFIRMATION_PREFIX}{}", simple[..8].to_ascii_uppercase())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub attendee_id: String,
    pub event_id: String,
    pub confirmation_number: String,
    pub registration_date: DateTimeUtc,
    pub payment_status: String,
    pub ticket_price_minor: Option<i64>,
    pub ticket_type: Option<String>,
    pub payment_method: Option<String>,
    pub check_in_status: String,
    pub check_in_time: Option<DateTimeUtc>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Registration> for ActiveModel {
    fn from(value: &Registration) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            attendee_id: ActiveValue::Set(value.attendee_id.clone()),
            event_id: ActiveValue::Set(value.event_id.clone()),
            confirmation_number: ActiveValue::Set(value.confirmation_number.clone()),
            registration_date: ActiveValue::Set(value.registration_date),
            payment_status: ActiveValue::Set(value.payment_status.as_str().to_string()),
            ticket_price_minor: ActiveValue::Set(value.ticket_price.map(MoneyCents::cents)),
            ticket_type: ActiveValue::Set(value.ticket_type.clone()),
            payment_method: ActiveValue::Set(value.payment_method.clone()),
            check_in_status: ActiveValue::Set(value.check_in_status.as_str().to_string()),
            check_in_time: ActiveValue::Set(value.check_in_time),
            notes: ActiveValue::Set(value.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Registration {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "registration")?,
            attendee_id: model.attendee_id,
            event_id: model.event_id,
            confirmation_number: model.confirmation_number,
            registration_date: model.registration_date,
            payment_status: RegistrationPaymentStatus::try_from(model.payment_status.as_str())?,
            ticket_price: model.ticket_price_minor.map(MoneyCents::new),
            ticket_type: model.ticket_type,
            payment_method: model.payment_method,
            check_in_status: CheckInStatus::try_from(model.check_in_status.as_str())?,
            check_in_time: model.check_in_time,
            notes: model.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_number_shape() {
        for _ in 0..32 {
            let number = generate_confirmation_number();
            assert_eq!(number.len(), 11);
            assert!(number.starts_with("REG"));
            assert!(
                number[3..]
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            );
        }
    }
}
