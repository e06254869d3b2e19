use api_types::{Amount, ErrorBody, PageView};
use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use engine::{EngineError, MoneyCents, Page};

pub use server::{ServerState, router, run_with_listener};

mod attendees;
mod budgets;
mod events;
mod expenses;
mod health;
mod incomes;
mod registrations;
mod server;
mod vendors;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    BadRequest(String),
}

/// Status and message of an error response, left on the response so
/// [`error_path`] can rebuild the body with the request path.
#[derive(Clone, Debug)]
struct ErrorDetails {
    status: StatusCode,
    message: String,
}

impl ErrorDetails {
    fn render(self, path: &str) -> Response {
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message.clone(),
            path: path.to_string(),
        };
        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) | EngineError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            INTERNAL_MESSAGE.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        ErrorDetails { status, message }.render("")
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

/// Fills the `path` of error bodies with the path of the request.
pub(crate) async fn error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    match response.extensions().get::<ErrorDetails>().cloned() {
        Some(details) => details.render(&path),
        None => response,
    }
}

pub(crate) fn money(amount: &Amount) -> Result<MoneyCents, ServerError> {
    Ok(amount.as_str().parse::<MoneyCents>()?)
}

pub(crate) fn amount(value: MoneyCents) -> Amount {
    Amount::new(value.to_string())
}

pub(crate) fn page_view<T, V>(page: Page<T>, view: impl FnMut(T) -> V) -> PageView<V> {
    let page = page.map(view);
    PageView {
        content: page.content,
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages: page.total_pages,
    }
}

/// Accepts RFC 3339 or a zone-less `2025-06-01T18:00:00`, read as UTC.
pub(crate) fn parse_instant(raw: &str, label: &str) -> Result<DateTime<Utc>, ServerError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| ServerError::BadRequest(format!("invalid {label} date: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::from(EngineError::InvalidStatus("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_is_hidden() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk on fire".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let details = res.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ServerError::BadRequest("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_instant_accepts_both_forms() {
        let a = parse_instant("2025-06-01T18:00:00Z", "start").unwrap();
        let b = parse_instant("2025-06-01T18:00:00", "start").unwrap();
        assert_eq!(a, b);
        assert!(parse_instant("yesterday", "start").is_err());
    }

    #[test]
    fn money_rejects_three_decimals() {
        assert_eq!(money(&Amount::new("12.50")).unwrap(), MoneyCents::new(1250));
        assert!(money(&Amount::new("12.345")).is_err());
    }
}
