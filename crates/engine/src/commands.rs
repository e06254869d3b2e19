//! Command structs for engine write operations.
//!
//! These types group the fields of create/update calls, keeping call sites
//! readable and avoiding long argument lists. Status fields are free text:
//! the engine decides how unparsable values are handled (see each operation).

use chrono::{DateTime, NaiveDate, Utc};

use crate::MoneyCents;

/// Fields of a budget create or update.
#[derive(Clone, Debug)]
pub struct BudgetInput {
    pub event_id: String,
    pub name: String,
    pub total_budget: MoneyCents,
    pub notes: Option<String>,
    pub categories: Vec<String>,
    pub status: Option<String>,
}

impl BudgetInput {
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        name: impl Into<String>,
        total_budget: MoneyCents,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            name: name.into(),
            total_budget,
            notes: None,
            categories: Vec::new(),
            status: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Fields of an expense create or update.
#[derive(Clone, Debug)]
pub struct ExpenseInput {
    pub category: String,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub date: NaiveDate,
    pub payment_status: Option<String>,
    pub receipt_url: Option<String>,
}

impl ExpenseInput {
    #[must_use]
    pub fn new(category: impl Into<String>, amount: MoneyCents, date: NaiveDate) -> Self {
        Self {
            category: category.into(),
            amount,
            description: None,
            vendor: None,
            date,
            payment_status: None,
            receipt_url: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    #[must_use]
    pub fn payment_status(mut self, status: impl Into<String>) -> Self {
        self.payment_status = Some(status.into());
        self
    }

    #[must_use]
    pub fn receipt_url(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }
}

/// Fields of an income create or update.
#[derive(Clone, Debug)]
pub struct IncomeInput {
    pub category: String,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub source: Option<String>,
    pub date: NaiveDate,
    pub status: Option<String>,
}

impl IncomeInput {
    #[must_use]
    pub fn new(category: impl Into<String>, amount: MoneyCents, date: NaiveDate) -> Self {
        Self {
            category: category.into(),
            amount,
            description: None,
            source: None,
            date,
            status: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Fields of an event create or full update.
#[derive(Clone, Debug, Default)]
pub struct EventInput {
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
    pub status: Option<String>,
}

/// Fields of a vendor create or full update.
#[derive(Clone, Debug, Default)]
pub struct VendorInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub address: Option<String>,
    pub vendor_type: Option<String>,
    pub service_areas: Vec<String>,
    pub event_ids: Vec<String>,
    pub is_active: Option<bool>,
    pub is_public: bool,
}

/// Fields of an attendee create or update.
#[derive(Clone, Debug, Default)]
pub struct AttendeeInput {
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub event_ids: Vec<String>,
    pub status: Option<String>,
}

/// Fields of a registration create. Absent values get defaults.
#[derive(Clone, Debug, Default)]
pub struct RegistrationInput {
    pub attendee_id: String,
    pub event_id: String,
    pub confirmation_number: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub payment_status: Option<String>,
    pub ticket_price: Option<MoneyCents>,
    pub ticket_type: Option<String>,
    pub payment_method: Option<String>,
    pub check_in_status: Option<String>,
    pub notes: Option<String>,
}

/// Partial registration update: only `Some` fields are applied.
#[derive(Clone, Debug, Default)]
pub struct RegistrationPatch {
    pub attendee_id: Option<String>,
    pub event_id: Option<String>,
    pub ticket_type: Option<String>,
    pub ticket_price: Option<MoneyCents>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub check_in_status: Option<String>,
    pub notes: Option<String>,
}
