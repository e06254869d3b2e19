//! Flat status enums.
//!
//! Statuses carry no transition rules: any value may replace any other on the
//! update path. They are persisted as their upper-case name.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Declares a status enum with its canonical upper-case names, a strict
/// parser and a lenient parser that falls back to the default variant.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, {
            $($variant:ident => $repr:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $repr,)+
                }
            }

            /// Parses `value`, returning `fallback` when it is absent, blank
            /// or unknown.
            pub fn parse_or(value: Option<&str>, fallback: Self) -> Self {
                value
                    .and_then(|raw| Self::try_from(raw).ok())
                    .unwrap_or(fallback)
            }

            /// Parses `value`, returning the default variant when it is absent,
            /// blank or unknown.
            pub fn parse_or_default(value: Option<&str>) -> Self {
                Self::parse_or(value, Self::$default)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EngineError;

            fn try_from(value: &str) -> ResultEngine<Self> {
                let normalized = value.trim().to_ascii_uppercase();
                match normalized.as_str() {
                    $($repr => Ok(Self::$variant),)+
                    _ => Err(EngineError::InvalidStatus(format!(
                        "invalid {}: {value}",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum!(
    /// Lifecycle of a budget. `Deleted` is the soft-delete state.
    BudgetStatus, default = Active, {
        Active => "ACTIVE",
        Closed => "CLOSED",
        Deleted => "DELETED",
    }
);

status_enum!(
    PaymentStatus, default = Pending, {
        Pending => "PENDING",
        Paid => "PAID",
        Refunded => "REFUNDED",
        Cancelled => "CANCELLED",
    }
);

status_enum!(
    IncomeStatus, default = Expected, {
        Expected => "EXPECTED",
        Received => "RECEIVED",
        Cancelled => "CANCELLED",
    }
);

status_enum!(
    EventStatus, default = Draft, {
        Draft => "DRAFT",
        Published => "PUBLISHED",
        Cancelled => "CANCELLED",
        Completed => "COMPLETED",
    }
);

status_enum!(
    VendorType, default = Other, {
        Catering => "CATERING",
        Venue => "VENUE",
        Photography => "PHOTOGRAPHY",
        Videography => "VIDEOGRAPHY",
        Music => "MUSIC",
        Decoration => "DECORATION",
        Transportation => "TRANSPORTATION",
        Other => "OTHER",
    }
);

status_enum!(
    AttendeeStatus, default = Active, {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Blocked => "BLOCKED",
    }
);

status_enum!(
    /// Payment state of a ticket purchase.
    RegistrationPaymentStatus, default = Pending, {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
    }
);

status_enum!(
    CheckInStatus, default = NotCheckedIn, {
        NotCheckedIn => "NOT_CHECKED_IN",
        CheckedIn => "CHECKED_IN",
        NoShow => "NO_SHOW",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(PaymentStatus::try_from("paid").unwrap(), PaymentStatus::Paid);
        assert_eq!(
            CheckInStatus::try_from(" checked_in ").unwrap(),
            CheckInStatus::CheckedIn
        );
    }

    #[test]
    fn unknown_value_is_invalid_status() {
        assert!(matches!(
            BudgetStatus::try_from("ARCHIVED"),
            Err(EngineError::InvalidStatus(_))
        ));
    }

    #[test]
    fn lenient_parse_falls_back_to_default() {
        assert_eq!(PaymentStatus::parse_or_default(Some("BOGUS")), PaymentStatus::Pending);
        assert_eq!(IncomeStatus::parse_or_default(Some("")), IncomeStatus::Expected);
        assert_eq!(IncomeStatus::parse_or_default(None), IncomeStatus::Expected);
        assert_eq!(
            IncomeStatus::parse_or(Some("nope"), IncomeStatus::Received),
            IncomeStatus::Received
        );
    }

    #[test]
    fn as_str_round_trips_every_variant() {
        for status in VendorType::ALL {
            assert_eq!(VendorType::try_from(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&CheckInStatus::NotCheckedIn).unwrap();
        assert_eq!(json, "\"NOT_CHECKED_IN\"");
    }
}
