use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::SimpleExpr,
};
use uuid::Uuid;

use crate::{
    CheckInStatus, EngineError, Registration, RegistrationInput, RegistrationPatch,
    RegistrationPaymentStatus, ResultEngine, generate_confirmation_number, registrations,
    util::{lower_contains, optional_text, require_non_negative, require_text},
};

use super::{Engine, Page, PageRequest, convert_all, fetch_page, with_tx};

impl Engine {
    async fn require_registration<C>(
        &self,
        db: &C,
        id: &str,
    ) -> ResultEngine<registrations::Model>
    where
        C: ConnectionTrait,
    {
        registrations::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("Registration", id))
    }

    async fn registrations_where(&self, filter: SimpleExpr) -> ResultEngine<Vec<Registration>> {
        let models = registrations::Entity::find()
            .filter(filter)
            .order_by_asc(registrations::Column::RegistrationDate)
            .all(&self.database)
            .await?;
        convert_all(models)
    }

    /// Load, mutate and persist one registration inside a transaction.
    async fn edit_registration(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Registration),
    ) -> ResultEngine<Registration> {
        with_tx!(self, |db_tx| {
            let mut registration =
                Registration::try_from(self.require_registration(&db_tx, id).await?)?;
            edit(&mut registration);
            registrations::ActiveModel::from(&registration)
                .update(&db_tx)
                .await?;
            Ok(registration)
        })
    }

    pub async fn list_registrations(
        &self,
        page: PageRequest,
    ) -> ResultEngine<Page<Registration>> {
        let select = registrations::Entity::find()
            .order_by_asc(registrations::Column::RegistrationDate);
        fetch_page(&self.database, select, page).await
    }

    pub async fn registration(&self, id: &str) -> ResultEngine<Registration> {
        let model = self.require_registration(&self.database, id).await?;
        Registration::try_from(model)
    }

    pub async fn registrations_by_attendee(
        &self,
        attendee_id: &str,
    ) -> ResultEngine<Vec<Registration>> {
        self.registrations_where(registrations::Column::AttendeeId.eq(attendee_id))
            .await
    }

    pub async fn registrations_by_event(&self, event_id: &str) -> ResultEngine<Vec<Registration>> {
        self.registrations_where(registrations::Column::EventId.eq(event_id))
            .await
    }

    pub async fn registrations_by_event_and_payment_status(
        &self,
        event_id: &str,
        status: &str,
    ) -> ResultEngine<Vec<Registration>> {
        let status = RegistrationPaymentStatus::try_from(status)?;
        self.registrations_where(
            registrations::Column::EventId
                .eq(event_id)
                .and(registrations::Column::PaymentStatus.eq(status.as_str())),
        )
        .await
    }

    pub async fn registrations_by_event_and_check_in_status(
        &self,
        event_id: &str,
        status: &str,
    ) -> ResultEngine<Vec<Registration>> {
        let status = CheckInStatus::try_from(status)?;
        self.registrations_where(
            registrations::Column::EventId
                .eq(event_id)
                .and(registrations::Column::CheckInStatus.eq(status.as_str())),
        )
        .await
    }

    /// Registrations dated within `[start, end]`.
    pub async fn registrations_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<Vec<Registration>> {
        if end < start {
            return Err(EngineError::Validation(
                "End date must be after start date".to_string(),
            ));
        }
        self.registrations_where(registrations::Column::RegistrationDate.between(start, end))
            .await
    }

    /// Creates a registration, generating the confirmation number when
    /// absent. Unknown statuses become `Pending` and `NotCheckedIn`.
    pub async fn create_registration(
        &self,
        input: RegistrationInput,
    ) -> ResultEngine<Registration> {
        let ticket_price = input
            .ticket_price
            .map(|price| require_non_negative(price, "Ticket price"))
            .transpose()?;
        let registration = Registration {
            id: Uuid::new_v4(),
            attendee_id: require_text(&input.attendee_id, 100, "Attendee ID")?,
            event_id: require_text(&input.event_id, 100, "Event ID")?,
            confirmation_number: optional_text(
                input.confirmation_number.as_deref(),
                50,
                "Confirmation number",
            )?
            .unwrap_or_else(generate_confirmation_number),
            registration_date: input.registration_date.unwrap_or_else(Utc::now),
            payment_status: RegistrationPaymentStatus::parse_or_default(
                input.payment_status.as_deref(),
            ),
            ticket_price,
            ticket_type: optional_text(input.ticket_type.as_deref(), 50, "Ticket type")?,
            payment_method: optional_text(input.payment_method.as_deref(), 50, "Payment method")?,
            check_in_status: CheckInStatus::parse_or_default(input.check_in_status.as_deref()),
            check_in_time: None,
            notes: optional_text(input.notes.as_deref(), 1000, "Notes")?,
        };
        registrations::ActiveModel::from(&registration)
            .insert(&self.database)
            .await?;
        tracing::info!(
            registration_id = %registration.id,
            confirmation = %registration.confirmation_number,
            "registration created"
        );
        Ok(registration)
    }

    /// Applies only the fields present in `patch`. Unknown statuses keep the
    /// stored values.
    pub async fn update_registration(
        &self,
        id: &str,
        patch: RegistrationPatch,
    ) -> ResultEngine<Registration> {
        let attendee_id = patch
            .attendee_id
            .as_deref()
            .map(|v| require_text(v, 100, "Attendee ID"))
            .transpose()?;
        let event_id = patch
            .event_id
            .as_deref()
            .map(|v| require_text(v, 100, "Event ID"))
            .transpose()?;
        let ticket_price = patch
            .ticket_price
            .map(|price| require_non_negative(price, "Ticket price"))
            .transpose()?;
        // A present but blank value clears the field.
        let ticket_type = patch
            .ticket_type
            .as_deref()
            .map(|v| optional_text(Some(v), 50, "Ticket type"))
            .transpose()?;
        let payment_method = patch
            .payment_method
            .as_deref()
            .map(|v| optional_text(Some(v), 50, "Payment method"))
            .transpose()?;
        let notes = patch
            .notes
            .as_deref()
            .map(|v| optional_text(Some(v), 1000, "Notes"))
            .transpose()?;
        let registration = self
            .edit_registration(id, |r| {
                if let Some(attendee_id) = attendee_id {
                    r.attendee_id = attendee_id;
                }
                if let Some(event_id) = event_id {
                    r.event_id = event_id;
                }
                if let Some(ticket_type) = ticket_type {
                    r.ticket_type = ticket_type;
                }
                if ticket_price.is_some() {
                    r.ticket_price = ticket_price;
                }
                if let Some(method) = payment_method {
                    r.payment_method = method;
                }
                r.payment_status =
                    RegistrationPaymentStatus::parse_or(patch.payment_status.as_deref(), r.payment_status);
                r.check_in_status =
                    CheckInStatus::parse_or(patch.check_in_status.as_deref(), r.check_in_status);
                if let Some(notes) = notes {
                    r.notes = notes;
                }
            })
            .await?;
        tracing::info!(registration_id = id, "registration updated");
        Ok(registration)
    }

    pub async fn set_payment_status(&self, id: &str, status: &str) -> ResultEngine<Registration> {
        let status = RegistrationPaymentStatus::try_from(status)?;
        let registration = self
            .edit_registration(id, |r| r.payment_status = status)
            .await?;
        tracing::info!(registration_id = id, %status, "payment status changed");
        Ok(registration)
    }

    /// Marks the attendee as arrived and stamps `check_in_time`.
    pub async fn check_in(&self, id: &str) -> ResultEngine<Registration> {
        let registration = self
            .edit_registration(id, |r| {
                r.check_in_status = CheckInStatus::CheckedIn;
                r.check_in_time = Some(Utc::now());
            })
            .await?;
        tracing::info!(registration_id = id, "attendee checked in");
        Ok(registration)
    }

    /// Moving to `CheckedIn` stamps `check_in_time` if it is still empty.
    pub async fn set_check_in_status(&self, id: &str, status: &str) -> ResultEngine<Registration> {
        let status = CheckInStatus::try_from(status)?;
        let registration = self
            .edit_registration(id, |r| {
                r.check_in_status = status;
                if status == CheckInStatus::CheckedIn && r.check_in_time.is_none() {
                    r.check_in_time = Some(Utc::now());
                }
            })
            .await?;
        tracing::info!(registration_id = id, %status, "check-in status changed");
        Ok(registration)
    }

    pub async fn delete_registration(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_registration(&db_tx, id).await?;
            registrations::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(registration_id = id, "registration deleted");
            Ok(())
        })
    }

    pub async fn count_by_event(&self, event_id: &str) -> ResultEngine<u64> {
        let count = registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .count(&self.database)
            .await?;
        Ok(count)
    }

    pub async fn count_by_event_and_payment_status(
        &self,
        event_id: &str,
        status: &str,
    ) -> ResultEngine<u64> {
        let status = RegistrationPaymentStatus::try_from(status)?;
        let count = registrations::Entity::find()
            .filter(registrations::Column::EventId.eq(event_id))
            .filter(registrations::Column::PaymentStatus.eq(status.as_str()))
            .count(&self.database)
            .await?;
        Ok(count)
    }

    pub async fn search_by_confirmation_number(
        &self,
        confirmation_number: &str,
    ) -> ResultEngine<Vec<Registration>> {
        self.registrations_where(lower_contains(
            registrations::Column::ConfirmationNumber,
            confirmation_number,
        ))
        .await
    }
}
