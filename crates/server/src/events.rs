use api_types::{
    DateRangeQuery, PageQuery, PageView, StatusQuery,
    event::{EventNew, EventView, TitleQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Event, EventInput, MoneyCents, PageRequest};

use crate::{ServerError, amount, money, page_view, parse_instant, server::ServerState};

fn view(event: Event) -> EventView {
    EventView {
        id: event.id.to_string(),
        title: event.title,
        description: event.description,
        start_time: event.start_time,
        end_time: event.end_time,
        location: event.location,
        category: event.category,
        max_attendees: event.max_attendees,
        price: amount(event.price),
        organizer_id: event.organizer_id,
        vendor_ids: event.vendor_ids,
        attendee_ids: event.attendee_ids,
        tags: event.tags,
        is_public: event.is_public,
        status: event.status.to_string(),
        created_at: event.created_at,
        updated_at: event.updated_at,
    }
}

fn views(events: Vec<Event>) -> Json<Vec<EventView>> {
    Json(events.into_iter().map(view).collect())
}

fn input(payload: EventNew) -> Result<EventInput, ServerError> {
    let price = match &payload.price {
        Some(price) => money(price)?,
        None => MoneyCents::ZERO,
    };
    Ok(EventInput {
        title: payload.title,
        description: payload.description,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        category: payload.category,
        max_attendees: payload.max_attendees,
        price,
        organizer_id: payload.organizer_id,
        vendor_ids: payload.vendor_ids,
        attendee_ids: payload.attendee_ids,
        tags: payload.tags,
        is_public: payload.is_public,
        status: payload.status,
    })
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<EventView>>, ServerError> {
    let page = state
        .engine
        .list_events(PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<EventView>, ServerError> {
    Ok(Json(view(state.engine.event(&id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<EventNew>, ServerError>,
) -> Result<(StatusCode, Json<EventView>), ServerError> {
    let event = state.engine.create_event(input(payload)?).await?;
    Ok((StatusCode::CREATED, Json(view(event))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<EventNew>, ServerError>,
) -> Result<Json<EventView>, ServerError> {
    Ok(Json(view(state.engine.update_event(&id, input(payload)?).await?)))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<StatusQuery>, ServerError>,
) -> Result<Json<EventView>, ServerError> {
    let event = state.engine.set_event_status(&id, &query.status).await?;
    Ok(Json(view(event)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upcoming(State(state): State<ServerState>) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.upcoming_events().await?))
}

pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(title), _): WithRejection<Query<TitleQuery>, ServerError>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<EventView>>, ServerError> {
    let page = state
        .engine
        .search_events(&title.title, PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn by_venue(
    State(state): State<ServerState>,
    Path(venue): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_location(&venue).await?))
}

pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_category(&category).await?))
}

pub async fn by_organizer(
    State(state): State<ServerState>,
    Path(organizer_id): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_organizer(&organizer_id).await?))
}

pub async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_status(&status).await?))
}

pub async fn by_vendor(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_vendor(&vendor_id).await?))
}

pub async fn by_attendee(
    State(state): State<ServerState>,
    Path(attendee_id): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_attendee(&attendee_id).await?))
}

pub async fn by_tag(
    State(state): State<ServerState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.events_by_tag(&tag).await?))
}

pub async fn in_range(
    State(state): State<ServerState>,
    WithRejection(Query(range), _): WithRejection<Query<DateRangeQuery>, ServerError>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    let start = parse_instant(&range.start, "start")?;
    let end = parse_instant(&range.end, "end")?;
    Ok(views(state.engine.events_in_range(start, end).await?))
}

pub async fn public(State(state): State<ServerState>) -> Result<Json<Vec<EventView>>, ServerError> {
    Ok(views(state.engine.public_events().await?))
}
