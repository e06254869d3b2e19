use chrono::Utc;
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    Attendee, AttendeeInput, AttendeeStatus, EngineError, ResultEngine, attendees,
    util::{fold_case, lower_contains, normalize_list, optional_text, require_text},
};

use super::{Engine, Page, PageRequest, convert_all, fetch_page, with_tx};

fn require_email(value: &str) -> ResultEngine<String> {
    let email = require_text(value, 255, "Email")?;
    if !email.contains('@') {
        return Err(EngineError::Validation("Email should be valid".to_string()));
    }
    Ok(email)
}

/// A unique index firing after the duplicate check passed is still a
/// duplicate, not a storage failure.
fn duplicate_or(err: DbErr, key: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(key.to_string()),
        _ => EngineError::Database(err),
    }
}

impl Engine {
    async fn require_attendee<C>(&self, db: &C, id: &str) -> ResultEngine<attendees::Model>
    where
        C: ConnectionTrait,
    {
        attendees::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Attendee", id))
    }

    /// Fails with `ExistingKey` if another attendee already uses `email`.
    async fn ensure_email_free<C>(
        &self,
        db: &C,
        email: &str,
        except_id: Option<&str>,
    ) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        let mut query = attendees::Entity::find().filter(
            Expr::expr(Func::lower(Expr::col(attendees::Column::Email))).eq(fold_case(email)),
        );
        if let Some(id) = except_id {
            query = query.filter(attendees::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }
        Ok(())
    }

    pub async fn list_attendees(&self, page: PageRequest) -> ResultEngine<Page<Attendee>> {
        let select = attendees::Entity::find().order_by_asc(attendees::Column::CreatedAt);
        fetch_page(&self.database, select, page).await
    }

    pub async fn attendee(&self, id: &str) -> ResultEngine<Attendee> {
        let model = self.require_attendee(&self.database, id).await?;
        Attendee::try_from(model)
    }

    pub async fn attendee_by_user(&self, user_id: &str) -> ResultEngine<Attendee> {
        let model = attendees::Entity::find()
            .filter(attendees::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("Attendee with user id {user_id}")))?;
        Attendee::try_from(model)
    }

    pub async fn attendee_by_email(&self, email: &str) -> ResultEngine<Attendee> {
        let model = attendees::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(attendees::Column::Email)))
                    .eq(fold_case(email)),
            )
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("Attendee with email {email}")))?;
        Attendee::try_from(model)
    }

    pub async fn attendees_by_event(&self, event_id: &str) -> ResultEngine<Vec<Attendee>> {
        let models = attendees::Entity::find()
            .filter(attendees::Column::EventIds.contains(event_id))
            .order_by_asc(attendees::Column::LastName)
            .all(&self.database)
            .await?;
        let candidates: Vec<Attendee> = convert_all(models)?;
        Ok(candidates
            .into_iter()
            .filter(|a| a.event_ids.iter().any(|e| e == event_id))
            .collect())
    }

    /// Registers a person. Duplicate email or user id fails with
    /// `ExistingKey`; an unknown status becomes `Active`.
    pub async fn create_attendee(&self, input: AttendeeInput) -> ResultEngine<Attendee> {
        let email = require_email(&input.email)?;
        let now = Utc::now();
        let attendee = Attendee {
            id: Uuid::new_v4(),
            user_id: optional_text(input.user_id.as_deref(), 100, "User ID")?,
            first_name: require_text(&input.first_name, 100, "First name")?,
            last_name: require_text(&input.last_name, 100, "Last name")?,
            email,
            phone: optional_text(input.phone.as_deref(), 50, "Phone")?,
            event_ids: normalize_list(input.event_ids),
            status: AttendeeStatus::parse_or_default(input.status.as_deref()),
            created_at: now,
            updated_at: now,
        };
        with_tx!(self, |db_tx| {
            self.ensure_email_free(&db_tx, &attendee.email, None).await?;
            if let Some(user_id) = attendee.user_id.as_deref() {
                let taken = attendees::Entity::find()
                    .filter(attendees::Column::UserId.eq(user_id))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if taken {
                    return Err(EngineError::ExistingKey(user_id.to_string()));
                }
            }
            attendees::ActiveModel::from(&attendee)
                .insert(&db_tx)
                .await
                .map_err(|err| duplicate_or(err, &attendee.email))?;
            tracing::info!(attendee_id = %attendee.id, "attendee created");
            Ok(attendee)
        })
    }

    /// Updates the contact fields only: names, email and phone.
    pub async fn update_attendee(&self, id: &str, input: AttendeeInput) -> ResultEngine<Attendee> {
        let email = require_email(&input.email)?;
        let first_name = require_text(&input.first_name, 100, "First name")?;
        let last_name = require_text(&input.last_name, 100, "Last name")?;
        let phone = optional_text(input.phone.as_deref(), 50, "Phone")?;
        with_tx!(self, |db_tx| {
            let existing = Attendee::try_from(self.require_attendee(&db_tx, id).await?)?;
            self.ensure_email_free(&db_tx, &email, Some(id)).await?;
            let attendee = Attendee {
                first_name,
                last_name,
                email,
                phone,
                updated_at: Utc::now(),
                ..existing
            };
            attendees::ActiveModel::from(&attendee)
                .update(&db_tx)
                .await
                .map_err(|err| duplicate_or(err, &attendee.email))?;
            tracing::info!(attendee_id = id, "attendee updated");
            Ok(attendee)
        })
    }

    /// Fails with `InvalidStatus` when `status` is not an attendee status.
    pub async fn set_attendee_status(&self, id: &str, status: &str) -> ResultEngine<Attendee> {
        let status = AttendeeStatus::try_from(status)?;
        with_tx!(self, |db_tx| {
            let mut attendee = Attendee::try_from(self.require_attendee(&db_tx, id).await?)?;
            attendee.status = status;
            attendee.updated_at = Utc::now();
            attendees::ActiveModel::from(&attendee).update(&db_tx).await?;
            tracing::info!(attendee_id = id, %status, "attendee status changed");
            Ok(attendee)
        })
    }

    pub async fn delete_attendee(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_attendee(&db_tx, id).await?;
            attendees::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(attendee_id = id, "attendee deleted");
            Ok(())
        })
    }

    /// Substring match on first or last name, ignoring case.
    pub async fn search_attendees(&self, name: &str) -> ResultEngine<Vec<Attendee>> {
        let models = attendees::Entity::find()
            .filter(
                lower_contains(attendees::Column::FirstName, name)
                    .or(lower_contains(attendees::Column::LastName, name)),
            )
            .order_by_asc(attendees::Column::LastName)
            .order_by_asc(attendees::Column::FirstName)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Links an event to the attendee. Linking twice is a no-op.
    pub async fn add_event_to_attendee(&self, id: &str, event_id: &str) -> ResultEngine<Attendee> {
        let event_id = require_text(event_id, 100, "Event ID")?;
        self.edit_attendee_events(id, |events| {
            if !events.contains(&event_id) {
                events.push(event_id.clone());
            }
        })
        .await
    }

    /// Unlinks an event from the attendee. Unlinking a missing event is a no-op.
    pub async fn remove_event_from_attendee(
        &self,
        id: &str,
        event_id: &str,
    ) -> ResultEngine<Attendee> {
        let event_id = event_id.trim();
        self.edit_attendee_events(id, |events| events.retain(|e| e != event_id))
            .await
    }

    async fn edit_attendee_events(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Vec<String>),
    ) -> ResultEngine<Attendee> {
        with_tx!(self, |db_tx| {
            let mut attendee = Attendee::try_from(self.require_attendee(&db_tx, id).await?)?;
            let before = attendee.event_ids.clone();
            edit(&mut attendee.event_ids);
            if attendee.event_ids != before {
                attendee.updated_at = Utc::now();
                attendees::ActiveModel::from(&attendee).update(&db_tx).await?;
                tracing::info!(
                    attendee_id = id,
                    events = attendee.event_ids.len(),
                    "attendee events changed"
                );
            }
            Ok(attendee)
        })
    }
}
