use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Decimal money amount as it travels over the wire.
///
/// Always serialized as a string (`"600.00"`). Accepted on input either as a
/// JSON string or a JSON number; the server does the exact parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Amount(text),
            Raw::Number(number) => Amount(number.to_string()),
        })
    }
}

/// Paginated list envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// `?status=` parameter of the status PATCH endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// `?start=&end=` parameters of the date range endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DateRangeQuery {
    pub start: String,
    pub end: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        pub event_id: String,
        pub name: String,
        pub total_budget: Amount,
        pub status: Option<String>,
        pub notes: Option<String>,
        #[serde(default)]
        pub categories: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: String,
        pub event_id: String,
        pub name: String,
        pub total_budget: Amount,
        pub current_expenses: Amount,
        pub current_income: Amount,
        pub status: String,
        pub notes: Option<String>,
        pub categories: Vec<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Outcome of `POST /budgets/{id}/reconcile`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReconciliationView {
        pub budget_id: String,
        pub expenses_before: Amount,
        pub expenses_after: Amount,
        pub income_before: Amount,
        pub income_after: Amount,
        pub drifted: bool,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub budget_id: String,
        pub category: String,
        pub amount: Amount,
        pub description: Option<String>,
        pub vendor: Option<String>,
        pub date: NaiveDate,
        pub payment_status: Option<String>,
        pub receipt_url: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: String,
        pub budget_id: String,
        pub category: String,
        pub amount: Amount,
        pub description: Option<String>,
        pub vendor: Option<String>,
        pub date: NaiveDate,
        pub payment_status: String,
        pub receipt_url: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeNew {
        pub budget_id: String,
        pub category: String,
        pub amount: Amount,
        pub description: Option<String>,
        pub source: Option<String>,
        pub date: NaiveDate,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeView {
        pub id: String,
        pub budget_id: String,
        pub category: String,
        pub amount: Amount,
        pub description: Option<String>,
        pub source: Option<String>,
        pub date: NaiveDate,
        pub status: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod event {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventNew {
        pub title: String,
        pub description: Option<String>,
        pub start_time: Option<DateTime<Utc>>,
        pub end_time: Option<DateTime<Utc>>,
        pub location: Option<String>,
        pub category: Option<String>,
        #[serde(default)]
        pub max_attendees: u32,
        pub price: Option<Amount>,
        pub organizer_id: Option<String>,
        #[serde(default)]
        pub vendor_ids: Vec<String>,
        #[serde(default)]
        pub attendee_ids: Vec<String>,
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub is_public: bool,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventView {
        pub id: String,
        pub title: String,
        pub description: Option<String>,
        pub start_time: Option<DateTime<Utc>>,
        pub end_time: Option<DateTime<Utc>>,
        pub location: Option<String>,
        pub category: Option<String>,
        pub max_attendees: u32,
        pub price: Amount,
        pub organizer_id: Option<String>,
        pub vendor_ids: Vec<String>,
        pub attendee_ids: Vec<String>,
        pub tags: Vec<String>,
        pub is_public: bool,
        pub status: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TitleQuery {
        pub title: String,
    }
}

pub mod vendor {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VendorNew {
        pub name: String,
        pub email: String,
        pub phone: Option<String>,
        pub description: Option<String>,
        pub contact_person: Option<String>,
        pub address: Option<String>,
        pub vendor_type: Option<String>,
        #[serde(default)]
        pub service_areas: Vec<String>,
        #[serde(default)]
        pub event_ids: Vec<String>,
        pub is_active: Option<bool>,
        #[serde(default)]
        pub is_public: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VendorView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub phone: Option<String>,
        pub description: Option<String>,
        pub contact_person: Option<String>,
        pub address: Option<String>,
        pub vendor_type: String,
        pub service_areas: Vec<String>,
        pub event_ids: Vec<String>,
        pub is_active: bool,
        pub is_public: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NameQuery {
        pub name: String,
    }
}

pub mod attendee {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AttendeeNew {
        pub user_id: Option<String>,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub phone: Option<String>,
        #[serde(default)]
        pub event_ids: Vec<String>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AttendeeView {
        pub id: String,
        pub user_id: Option<String>,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub phone: Option<String>,
        pub event_ids: Vec<String>,
        pub status: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod registration {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegistrationNew {
        pub attendee_id: String,
        pub event_id: String,
        pub confirmation_number: Option<String>,
        pub registration_date: Option<DateTime<Utc>>,
        pub payment_status: Option<String>,
        pub ticket_price: Option<Amount>,
        pub ticket_type: Option<String>,
        pub payment_method: Option<String>,
        pub check_in_status: Option<String>,
        pub notes: Option<String>,
    }

    /// Partial update: absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegistrationUpdate {
        pub attendee_id: Option<String>,
        pub event_id: Option<String>,
        pub ticket_type: Option<String>,
        pub ticket_price: Option<Amount>,
        pub payment_method: Option<String>,
        pub payment_status: Option<String>,
        pub check_in_status: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegistrationView {
        pub id: String,
        pub attendee_id: String,
        pub event_id: String,
        pub confirmation_number: String,
        pub registration_date: DateTime<Utc>,
        pub payment_status: String,
        pub ticket_price: Option<Amount>,
        pub ticket_type: Option<String>,
        pub payment_method: Option<String>,
        pub check_in_status: String,
        pub check_in_time: Option<DateTime<Utc>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CountQuery {
        pub payment_status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegistrationCount {
        pub event_id: String,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConfirmationQuery {
        pub confirmation_number: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_number_or_string() {
        let from_number: Amount = serde_json::from_str("100.5").unwrap();
        let from_text: Amount = serde_json::from_str("\"100.50\"").unwrap();
        assert_eq!(from_number.as_str(), "100.5");
        assert_eq!(from_text.as_str(), "100.50");
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn amount_serializes_as_string() {
        let json = serde_json::to_string(&Amount::new("600.00")).unwrap();
        assert_eq!(json, "\"600.00\"");
    }

    #[test]
    fn page_view_uses_camel_case() {
        let page = PageView {
            content: vec![1],
            page: 0,
            size: 20,
            total_elements: 1,
            total_pages: 1,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalElements"], 1);
        assert_eq!(value["totalPages"], 1);
    }
}
