//! The module contains `Vendor`, a supplier (caterer, venue, band...) that can
//! be attached to events.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, VendorType,
    util::{decode_list, encode_list, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub address: Option<String>,
    pub vendor_type: VendorType,
    pub service_areas: Vec<String>,
    pub event_ids: Vec<String>,
    pub is_active: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub address: Option<String>,
    pub vendor_type: String,
    pub service_areas: String,
    pub event_ids: String,
    pub is_active: bool,
    pub is_public: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vendor> for ActiveModel {
    fn from(value: &Vendor) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            email: ActiveValue::Set(value.email.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            description: ActiveValue::Set(value.description.clone()),
            contact_person: ActiveValue::Set(value.contact_person.clone()),
            address: ActiveValue::Set(value.address.clone()),
            vendor_type: ActiveValue::Set(value.vendor_type.as_str().to_string()),
            service_areas: ActiveValue::Set(encode_list(&value.service_areas)),
            event_ids: ActiveValue::Set(encode_list(&value.event_ids)),
            is_active: ActiveValue::Set(value.is_active),
            is_public: ActiveValue::Set(value.is_public),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Vendor {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "vendor")?,
            name: model.name,
            email: model.email,
            phone: model.phone,
            description: model.description,
            contact_person: model.contact_person,
            address: model.address,
            vendor_type: VendorType::try_from(model.vendor_type.as_str())?,
            service_areas: decode_list(&model.service_areas, "service area")?,
            event_ids: decode_list(&model.event_ids, "event id")?,
            is_active: model.is_active,
            is_public: model.is_public,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
