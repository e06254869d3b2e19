use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::SimpleExpr,
};
use uuid::Uuid;

use crate::{
    EngineError, Event, EventInput, EventStatus, ResultEngine, events,
    util::{lower_contains, normalize_list, optional_text, require_non_negative, require_text},
};

use super::{Engine, Page, PageRequest, convert_all, fetch_page, with_tx};

/// Validated event fields, shared by create and update.
fn build_event(input: EventInput, status: EventStatus, base: Option<Event>) -> ResultEngine<Event> {
    let title = require_text(&input.title, 200, "Title")?;
    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if end < start {
            return Err(EngineError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
    }
    let price = require_non_negative(input.price, "Price")?;
    let now = Utc::now();
    let (id, created_at) = base.map_or((Uuid::new_v4(), now), |b| (b.id, b.created_at));

    Ok(Event {
        id,
        title,
        description: optional_text(input.description.as_deref(), 2000, "Description")?,
        start_time: input.start_time,
        end_time: input.end_time,
        location: optional_text(input.location.as_deref(), 255, "Location")?,
        category: optional_text(input.category.as_deref(), 100, "Category")?,
        max_attendees: input.max_attendees,
        price,
        organizer_id: optional_text(input.organizer_id.as_deref(), 100, "Organizer ID")?,
        vendor_ids: normalize_list(input.vendor_ids),
        attendee_ids: normalize_list(input.attendee_ids),
        tags: normalize_list(input.tags),
        is_public: input.is_public,
        status,
        created_at,
        updated_at: now,
    })
}

impl Engine {
    async fn require_event<C>(&self, db: &C, id: &str) -> ResultEngine<events::Model>
    where
        C: ConnectionTrait,
    {
        events::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Event", id))
    }

    async fn events_where(&self, filter: SimpleExpr) -> ResultEngine<Vec<Event>> {
        let models = events::Entity::find()
            .filter(filter)
            .order_by_asc(events::Column::StartTime)
            .order_by_asc(events::Column::CreatedAt)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    pub async fn list_events(&self, page: PageRequest) -> ResultEngine<Page<Event>> {
        tracing::debug!(page = page.page, size = page.size, "listing events");
        let select = events::Entity::find().order_by_asc(events::Column::CreatedAt);
        fetch_page(&self.database, select, page).await
    }

    pub async fn event(&self, id: &str) -> ResultEngine<Event> {
        let model = self.require_event(&self.database, id).await?;
        Event::try_from(model)
    }

    /// Creates an event. An unknown status becomes `Draft`.
    pub async fn create_event(&self, input: EventInput) -> ResultEngine<Event> {
        let status = EventStatus::parse_or_default(input.status.as_deref());
        let event = build_event(input, status, None)?;
        events::ActiveModel::from(&event)
            .insert(&self.database)
            .await?;
        tracing::info!(event_id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    /// Full replacement of an event; `created_at` is kept. An unknown status
    /// keeps the stored one.
    pub async fn update_event(&self, id: &str, input: EventInput) -> ResultEngine<Event> {
        with_tx!(self, |db_tx| {
            let existing = Event::try_from(self.require_event(&db_tx, id).await?)?;
            let status = EventStatus::parse_or(input.status.as_deref(), existing.status);
            let event = build_event(input, status, Some(existing))?;
            events::ActiveModel::from(&event).update(&db_tx).await?;
            tracing::info!(event_id = id, "event updated");
            Ok(event)
        })
    }

    /// Fails with `InvalidStatus` when `status` is not an event status.
    pub async fn set_event_status(&self, id: &str, status: &str) -> ResultEngine<Event> {
        let status = EventStatus::try_from(status)?;
        with_tx!(self, |db_tx| {
            let mut event = Event::try_from(self.require_event(&db_tx, id).await?)?;
            event.status = status;
            event.updated_at = Utc::now();
            events::ActiveModel::from(&event).update(&db_tx).await?;
            tracing::info!(event_id = id, %status, "event status changed");
            Ok(event)
        })
    }

    pub async fn delete_event(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_event(&db_tx, id).await?;
            events::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(event_id = id, "event deleted");
            Ok(())
        })
    }

    /// Published events starting after now, soonest first.
    pub async fn upcoming_events(&self) -> ResultEngine<Vec<Event>> {
        self.events_where(
            events::Column::StartTime
                .gt(Utc::now())
                .and(events::Column::Status.eq(EventStatus::Published.as_str())),
        )
        .await
    }

    pub async fn search_events(&self, title: &str, page: PageRequest) -> ResultEngine<Page<Event>> {
        let select = events::Entity::find()
            .filter(lower_contains(events::Column::Title, title))
            .order_by_asc(events::Column::CreatedAt);
        fetch_page(&self.database, select, page).await
    }

    pub async fn events_by_location(&self, location: &str) -> ResultEngine<Vec<Event>> {
        self.events_where(lower_contains(events::Column::Location, location))
            .await
    }

    pub async fn events_by_category(&self, category: &str) -> ResultEngine<Vec<Event>> {
        self.events_where(events::Column::Category.eq(category.trim()))
            .await
    }

    pub async fn events_by_organizer(&self, organizer_id: &str) -> ResultEngine<Vec<Event>> {
        self.events_where(events::Column::OrganizerId.eq(organizer_id))
            .await
    }

    pub async fn events_by_status(&self, status: &str) -> ResultEngine<Vec<Event>> {
        let status = EventStatus::try_from(status)?;
        self.events_where(events::Column::Status.eq(status.as_str()))
            .await
    }

    pub async fn events_by_vendor(&self, vendor_id: &str) -> ResultEngine<Vec<Event>> {
        let candidates = self
            .events_where(events::Column::VendorIds.contains(vendor_id))
            .await?;
        Ok(candidates
            .into_iter()
            .filter(|e| e.vendor_ids.iter().any(|v| v == vendor_id))
            .collect())
    }

    pub async fn events_by_attendee(&self, attendee_id: &str) -> ResultEngine<Vec<Event>> {
        let candidates = self
            .events_where(events::Column::AttendeeIds.contains(attendee_id))
            .await?;
        Ok(candidates
            .into_iter()
            .filter(|e| e.attendee_ids.iter().any(|a| a == attendee_id))
            .collect())
    }

    /// Tag match ignores case.
    pub async fn events_by_tag(&self, tag: &str) -> ResultEngine<Vec<Event>> {
        let candidates = self
            .events_where(lower_contains(events::Column::Tags, tag))
            .await?;
        Ok(candidates.into_iter().filter(|e| e.has_tag(tag)).collect())
    }

    /// Events whose start time falls within `[start, end]`.
    pub async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<Vec<Event>> {
        if end < start {
            return Err(EngineError::Validation(
                "End date must be after start date".to_string(),
            ));
        }
        self.events_where(events::Column::StartTime.between(start, end))
            .await
    }

    pub async fn public_events(&self) -> ResultEngine<Vec<Event>> {
        self.events_where(events::Column::IsPublic.eq(true)).await
    }
}
