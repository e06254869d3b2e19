//! Registration endpoints. Payment and check-in changes go through the
//! dedicated PATCH routes; `PUT` applies only the fields present.

use api_types::{
    DateRangeQuery, PageQuery, PageView, StatusQuery,
    registration::{
        ConfirmationQuery, CountQuery, RegistrationCount, RegistrationNew, RegistrationUpdate,
        RegistrationView,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{PageRequest, Registration, RegistrationInput, RegistrationPatch};

use crate::{ServerError, amount, money, page_view, parse_instant, server::ServerState};

fn view(registration: Registration) -> RegistrationView {
    RegistrationView {
        id: registration.id.to_string(),
        attendee_id: registration.attendee_id,
        event_id: registration.event_id,
        confirmation_number: registration.confirmation_number,
        registration_date: registration.registration_date,
        payment_status: registration.payment_status.to_string(),
        ticket_price: registration.ticket_price.map(amount),
        ticket_type: registration.ticket_type,
        payment_method: registration.payment_method,
        check_in_status: registration.check_in_status.to_string(),
        check_in_time: registration.check_in_time,
        notes: registration.notes,
    }
}

fn views(registrations: Vec<Registration>) -> Json<Vec<RegistrationView>> {
    Json(registrations.into_iter().map(view).collect())
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<RegistrationView>>, ServerError> {
    let page = state
        .engine
        .list_registrations(PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationView>, ServerError> {
    Ok(Json(view(state.engine.registration(&id).await?)))
}

pub async fn by_attendee(
    State(state): State<ServerState>,
    Path(attendee_id): Path<String>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    Ok(views(state.engine.registrations_by_attendee(&attendee_id).await?))
}

pub async fn by_event(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    Ok(views(state.engine.registrations_by_event(&event_id).await?))
}

pub async fn by_event_and_payment_status(
    State(state): State<ServerState>,
    Path((event_id, status)): Path<(String, String)>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    let registrations = state
        .engine
        .registrations_by_event_and_payment_status(&event_id, &status)
        .await?;
    Ok(views(registrations))
}

pub async fn by_event_and_check_in_status(
    State(state): State<ServerState>,
    Path((event_id, status)): Path<(String, String)>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    let registrations = state
        .engine
        .registrations_by_event_and_check_in_status(&event_id, &status)
        .await?;
    Ok(views(registrations))
}

/// `?paymentStatus=` narrows the count to one payment status.
pub async fn count(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<CountQuery>, ServerError>,
) -> Result<Json<RegistrationCount>, ServerError> {
    let count = match query.payment_status.as_deref() {
        Some(status) => {
            state
                .engine
                .count_by_event_and_payment_status(&event_id, status)
                .await?
        }
        None => state.engine.count_by_event(&event_id).await?,
    };
    Ok(Json(RegistrationCount { event_id, count }))
}

pub async fn in_range(
    State(state): State<ServerState>,
    WithRejection(Query(range), _): WithRejection<Query<DateRangeQuery>, ServerError>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    let start = parse_instant(&range.start, "start")?;
    let end = parse_instant(&range.end, "end")?;
    Ok(views(state.engine.registrations_in_range(start, end).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegistrationNew>, ServerError>,
) -> Result<(StatusCode, Json<RegistrationView>), ServerError> {
    let ticket_price = payload.ticket_price.as_ref().map(money).transpose()?;
    let input = RegistrationInput {
        attendee_id: payload.attendee_id,
        event_id: payload.event_id,
        confirmation_number: payload.confirmation_number,
        registration_date: payload.registration_date,
        payment_status: payload.payment_status,
        ticket_price,
        ticket_type: payload.ticket_type,
        payment_method: payload.payment_method,
        check_in_status: payload.check_in_status,
        notes: payload.notes,
    };
    let registration = state.engine.create_registration(input).await?;
    Ok((StatusCode::CREATED, Json(view(registration))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<RegistrationUpdate>, ServerError>,
) -> Result<Json<RegistrationView>, ServerError> {
    let ticket_price = payload.ticket_price.as_ref().map(money).transpose()?;
    let patch = RegistrationPatch {
        attendee_id: payload.attendee_id,
        event_id: payload.event_id,
        ticket_type: payload.ticket_type,
        ticket_price,
        payment_method: payload.payment_method,
        payment_status: payload.payment_status,
        check_in_status: payload.check_in_status,
        notes: payload.notes,
    };
    Ok(Json(view(state.engine.update_registration(&id, patch).await?)))
}

pub async fn set_payment_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<StatusQuery>, ServerError>,
) -> Result<Json<RegistrationView>, ServerError> {
    let registration = state.engine.set_payment_status(&id, &query.status).await?;
    Ok(Json(view(registration)))
}

pub async fn check_in(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationView>, ServerError> {
    Ok(Json(view(state.engine.check_in(&id).await?)))
}

pub async fn set_check_in_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<StatusQuery>, ServerError>,
) -> Result<Json<RegistrationView>, ServerError> {
    let registration = state.engine.set_check_in_status(&id, &query.status).await?;
    Ok(Json(view(registration)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_registration(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<ConfirmationQuery>, ServerError>,
) -> Result<Json<Vec<RegistrationView>>, ServerError> {
    let registrations = state
        .engine
        .search_by_confirmation_number(&query.confirmation_number)
        .await?;
    Ok(views(registrations))
}
