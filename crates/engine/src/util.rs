//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so every store enforces the same rules.

use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("invalid {label} id")))
}

/// Trim a required text field and enforce its maximum length.
pub(crate) fn require_text(value: &str, max_len: usize, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} cannot be blank")));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::Validation(format!(
            "{label} must be less than {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, dropping it when blank.
pub(crate) fn optional_text(
    value: Option<&str>,
    max_len: usize,
    label: &str,
) -> ResultEngine<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max_len {
        return Err(EngineError::Validation(format!(
            "{label} must be less than {max_len} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

fn require_at_most_max(amount: MoneyCents, label: &str) -> ResultEngine<MoneyCents> {
    if amount > MoneyCents::MAX_AMOUNT {
        return Err(EngineError::Validation(format!(
            "{label} cannot exceed {}",
            MoneyCents::MAX_AMOUNT
        )));
    }
    Ok(amount)
}

pub(crate) fn require_positive(amount: MoneyCents, label: &str) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!("{label} must be positive")));
    }
    require_at_most_max(amount, label)
}

pub(crate) fn require_non_negative(amount: MoneyCents, label: &str) -> ResultEngine<MoneyCents> {
    if amount.is_negative() {
        return Err(EngineError::Validation(format!("{label} cannot be negative")));
    }
    require_at_most_max(amount, label)
}

/// List-valued fields are stored as JSON text.
pub(crate) fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn decode_list(raw: &str, label: &str) -> ResultEngine<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|_| EngineError::Validation(format!("corrupted {label} list")))
}

/// Drop blank entries and duplicates while keeping the caller's order.
pub(crate) fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !out.iter().any(|v| v == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Fold a search key the way SQLite's `lower()` does: ASCII letters only.
pub(crate) fn fold_case(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Escape the `LIKE` wildcards so the needle only matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match on a text column.
pub(crate) fn lower_contains<C>(column: C, needle: &str) -> SimpleExpr
where
    C: ColumnTrait + 'static,
{
    let pattern = format!("%{}%", escape_like(&fold_case(needle)));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_limits() {
        assert_eq!(require_text("  Catering ", 50, "category").unwrap(), "Catering");
        assert!(require_text("   ", 50, "category").is_err());
        assert!(require_text(&"x".repeat(51), 50, "category").is_err());
    }

    #[test]
    fn amounts_are_capped() {
        assert!(require_positive(MoneyCents::MAX_AMOUNT, "Amount").is_ok());
        let too_big = MoneyCents::new(MoneyCents::MAX_AMOUNT.cents() + 1);
        assert!(require_positive(too_big, "Amount").is_err());
        assert!(require_non_negative(MoneyCents::ZERO, "Price").is_ok());
        assert!(require_non_negative(MoneyCents::new(i64::MAX), "Price").is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  "), 10, "notes").unwrap(), None);
        assert_eq!(optional_text(None, 10, "notes").unwrap(), None);
        assert_eq!(
            optional_text(Some(" hi "), 10, "notes").unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn fold_case_matches_sqlite_lower() {
        assert_eq!(fold_case(" Jazz "), "jazz");
        assert_eq!(fold_case("École"), "École");
        assert_eq!(fold_case("ÉTÉ Fest"), "ÉTÉ fest");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn list_round_trip_and_normalize() {
        let list = normalize_list(vec![
            "a".to_string(),
            " ".to_string(),
            "b ".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(list, vec!["a".to_string(), "b".to_string()]);
        let raw = encode_list(&list);
        assert_eq!(decode_list(&raw, "tags").unwrap(), list);
        assert!(decode_list("", "tags").unwrap().is_empty());
        assert!(decode_list("{", "tags").is_err());
    }
}
