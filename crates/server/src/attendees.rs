use api_types::{
    PageQuery, PageView, StatusQuery,
    attendee::{AttendeeNew, AttendeeView},
    vendor::NameQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Attendee, AttendeeInput, PageRequest};

use crate::{ServerError, page_view, server::ServerState};

fn view(attendee: Attendee) -> AttendeeView {
    AttendeeView {
        id: attendee.id.to_string(),
        user_id: attendee.user_id,
        first_name: attendee.first_name,
        last_name: attendee.last_name,
        email: attendee.email,
        phone: attendee.phone,
        event_ids: attendee.event_ids,
        status: attendee.status.to_string(),
        created_at: attendee.created_at,
        updated_at: attendee.updated_at,
    }
}

fn input(payload: AttendeeNew) -> AttendeeInput {
    AttendeeInput {
        user_id: payload.user_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        event_ids: payload.event_ids,
        status: payload.status,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<AttendeeView>>, ServerError> {
    let page = state
        .engine
        .list_attendees(PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AttendeeView>, ServerError> {
    Ok(Json(view(state.engine.attendee(&id).await?)))
}

pub async fn by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<AttendeeView>, ServerError> {
    Ok(Json(view(state.engine.attendee_by_user(&user_id).await?)))
}

pub async fn by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<AttendeeView>, ServerError> {
    Ok(Json(view(state.engine.attendee_by_email(&email).await?)))
}

pub async fn by_event(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<AttendeeView>>, ServerError> {
    let attendees = state.engine.attendees_by_event(&event_id).await?;
    Ok(Json(attendees.into_iter().map(view).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<AttendeeNew>, ServerError>,
) -> Result<(StatusCode, Json<AttendeeView>), ServerError> {
    let attendee = state.engine.create_attendee(input(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(attendee))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<AttendeeNew>, ServerError>,
) -> Result<Json<AttendeeView>, ServerError> {
    Ok(Json(view(state.engine.update_attendee(&id, input(payload)).await?)))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<StatusQuery>, ServerError>,
) -> Result<Json<AttendeeView>, ServerError> {
    let attendee = state.engine.set_attendee_status(&id, &query.status).await?;
    Ok(Json(view(attendee)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_attendee(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<NameQuery>, ServerError>,
) -> Result<Json<Vec<AttendeeView>>, ServerError> {
    let attendees = state.engine.search_attendees(&query.name).await?;
    Ok(Json(attendees.into_iter().map(view).collect()))
}

pub async fn add_event(
    State(state): State<ServerState>,
    Path((id, event_id)): Path<(String, String)>,
) -> Result<Json<AttendeeView>, ServerError> {
    let attendee = state.engine.add_event_to_attendee(&id, &event_id).await?;
    Ok(Json(view(attendee)))
}

pub async fn remove_event(
    State(state): State<ServerState>,
    Path((id, event_id)): Path<(String, String)>,
) -> Result<Json<AttendeeView>, ServerError> {
    let attendee = state
        .engine
        .remove_event_from_attendee(&id, &event_id)
        .await?;
    Ok(Json(view(attendee)))
}
