//! The module contains `Event`, the thing every other record hangs off:
//! vendors, attendees, registrations and budgets all reference an event id.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, EventStatus, MoneyCents,
    util::{decode_list, encode_list, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub max_attendees: u32,
    pub price: MoneyCents,
    pub organizer_id: Option<String>,
    pub vendor_ids: Vec<String>,
    pub attendee_ids: Vec<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub max_attendees: i32,
    pub price_minor: i64,
    pub organizer_id: Option<String>,
    pub vendor_ids: String,
    pub attendee_ids: String,
    pub tags: String,
    pub is_public: bool,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Event> for ActiveModel {
    fn from(value: &Event) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            title: ActiveValue::Set(value.title.clone()),
            description: ActiveValue::Set(value.description.clone()),
            start_time: ActiveValue::Set(value.start_time),
            end_time: ActiveValue::Set(value.end_time),
            location: ActiveValue::Set(value.location.clone()),
            category: ActiveValue::Set(value.category.clone()),
            max_attendees: ActiveValue::Set(i32::try_from(value.max_attendees).unwrap_or(i32::MAX)),
            price_minor: ActiveValue::Set(value.price.cents()),
            organizer_id: ActiveValue::Set(value.organizer_id.clone()),
            vendor_ids: ActiveValue::Set(encode_list(&value.vendor_ids)),
            attendee_ids: ActiveValue::Set(encode_list(&value.attendee_ids)),
            tags: ActiveValue::Set(encode_list(&value.tags)),
            is_public: ActiveValue::Set(value.is_public),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Event {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "event")?,
            title: model.title,
            description: model.description,
            start_time: model.start_time,
            end_time: model.end_time,
            location: model.location,
            category: model.category,
            max_attendees: u32::try_from(model.max_attendees).unwrap_or_default(),
            price: MoneyCents::new(model.price_minor),
            organizer_id: model.organizer_id,
            vendor_ids: decode_list(&model.vendor_ids, "vendor id")?,
            attendee_ids: decode_list(&model.attendee_ids, "attendee id")?,
            tags: decode_list(&model.tags, "tag")?,
            is_public: model.is_public,
            status: EventStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
