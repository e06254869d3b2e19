use chrono::Utc;
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::SimpleExpr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Vendor, VendorInput, VendorType,
    util::{lower_contains, normalize_list, optional_text, require_text},
    vendors,
};

use super::{Engine, Page, PageRequest, convert_all, fetch_page, with_tx};

fn require_email(value: &str) -> ResultEngine<String> {
    let email = require_text(value, 255, "Email")?;
    if !email.contains('@') {
        return Err(EngineError::Validation("Email should be valid".to_string()));
    }
    Ok(email)
}

impl Engine {
    async fn require_vendor<C>(&self, db: &C, id: &str) -> ResultEngine<vendors::Model>
    where
        C: ConnectionTrait,
    {
        vendors::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Vendor", id))
    }

    async fn vendors_where(&self, filter: SimpleExpr) -> ResultEngine<Vec<Vendor>> {
        let models = vendors::Entity::find()
            .filter(filter)
            .order_by_asc(vendors::Column::Name)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    pub async fn list_vendors(&self, page: PageRequest) -> ResultEngine<Page<Vendor>> {
        let select = vendors::Entity::find().order_by_asc(vendors::Column::CreatedAt);
        fetch_page(&self.database, select, page).await
    }

    pub async fn vendor(&self, id: &str) -> ResultEngine<Vendor> {
        let model = self.require_vendor(&self.database, id).await?;
        Vendor::try_from(model)
    }

    /// New vendors are always active. An unknown type becomes `Other`.
    pub async fn create_vendor(&self, input: VendorInput) -> ResultEngine<Vendor> {
        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::new_v4(),
            name: require_text(&input.name, 100, "Name")?,
            email: require_email(&input.email)?,
            phone: optional_text(input.phone.as_deref(), 50, "Phone")?,
            description: optional_text(input.description.as_deref(), 2000, "Description")?,
            contact_person: optional_text(input.contact_person.as_deref(), 100, "Contact person")?,
            address: optional_text(input.address.as_deref(), 255, "Address")?,
            vendor_type: VendorType::parse_or_default(input.vendor_type.as_deref()),
            service_areas: normalize_list(input.service_areas),
            event_ids: normalize_list(input.event_ids),
            is_active: true,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        };
        vendors::ActiveModel::from(&vendor)
            .insert(&self.database)
            .await?;
        tracing::info!(vendor_id = %vendor.id, name = %vendor.name, "vendor created");
        Ok(vendor)
    }

    /// Replaces a vendor. `is_active` changes only when given; an unknown
    /// type keeps the stored one.
    pub async fn update_vendor(&self, id: &str, input: VendorInput) -> ResultEngine<Vendor> {
        let name = require_text(&input.name, 100, "Name")?;
        let email = require_email(&input.email)?;
        with_tx!(self, |db_tx| {
            let existing = Vendor::try_from(self.require_vendor(&db_tx, id).await?)?;
            let vendor = Vendor {
                name,
                email,
                phone: optional_text(input.phone.as_deref(), 50, "Phone")?,
                description: optional_text(input.description.as_deref(), 2000, "Description")?,
                contact_person: optional_text(
                    input.contact_person.as_deref(),
                    100,
                    "Contact person",
                )?,
                address: optional_text(input.address.as_deref(), 255, "Address")?,
                vendor_type: VendorType::parse_or(input.vendor_type.as_deref(), existing.vendor_type),
                service_areas: normalize_list(input.service_areas),
                event_ids: normalize_list(input.event_ids),
                is_active: input.is_active.unwrap_or(existing.is_active),
                is_public: input.is_public,
                updated_at: Utc::now(),
                ..existing
            };
            vendors::ActiveModel::from(&vendor).update(&db_tx).await?;
            tracing::info!(vendor_id = id, "vendor updated");
            Ok(vendor)
        })
    }

    pub async fn delete_vendor(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_vendor(&db_tx, id).await?;
            vendors::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(vendor_id = id, "vendor deleted");
            Ok(())
        })
    }

    pub async fn search_vendors(&self, name: &str, page: PageRequest) -> ResultEngine<Page<Vendor>> {
        let select = vendors::Entity::find()
            .filter(lower_contains(vendors::Column::Name, name))
            .order_by_asc(vendors::Column::CreatedAt);
        fetch_page(&self.database, select, page).await
    }

    /// Fails with `InvalidStatus` when `vendor_type` is unknown.
    pub async fn vendors_by_type(&self, vendor_type: &str) -> ResultEngine<Vec<Vendor>> {
        let vendor_type = VendorType::try_from(vendor_type)?;
        self.vendors_where(vendors::Column::VendorType.eq(vendor_type.as_str()))
            .await
    }

    pub async fn vendors_by_email(&self, email: &str) -> ResultEngine<Vec<Vendor>> {
        self.vendors_where(lower_contains(vendors::Column::Email, email))
            .await
    }

    /// Service area match ignores case.
    pub async fn vendors_by_service_area(&self, area: &str) -> ResultEngine<Vec<Vendor>> {
        let area = area.trim();
        let candidates = self
            .vendors_where(lower_contains(vendors::Column::ServiceAreas, area))
            .await?;
        Ok(candidates
            .into_iter()
            .filter(|v| v.service_areas.iter().any(|a| a.eq_ignore_ascii_case(area)))
            .collect())
    }

    pub async fn vendors_by_event(&self, event_id: &str) -> ResultEngine<Vec<Vendor>> {
        let candidates = self
            .vendors_where(vendors::Column::EventIds.contains(event_id))
            .await?;
        Ok(candidates
            .into_iter()
            .filter(|v| v.event_ids.iter().any(|e| e == event_id))
            .collect())
    }

    pub async fn vendors_by_active(&self, active: bool) -> ResultEngine<Vec<Vendor>> {
        self.vendors_where(vendors::Column::IsActive.eq(active))
            .await
    }

    pub async fn public_vendors(&self) -> ResultEngine<Vec<Vendor>> {
        self.vendors_where(vendors::Column::IsPublic.eq(true)).await
    }
}
