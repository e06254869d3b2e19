//! Vendor directory endpoints.

use api_types::{
    PageQuery, PageView,
    vendor::{NameQuery, VendorNew, VendorView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{PageRequest, Vendor, VendorInput};

use crate::{ServerError, page_view, server::ServerState};

fn view(vendor: Vendor) -> VendorView {
    VendorView {
        id: vendor.id.to_string(),
        name: vendor.name,
        email: vendor.email,
        phone: vendor.phone,
        description: vendor.description,
        contact_person: vendor.contact_person,
        address: vendor.address,
        vendor_type: vendor.vendor_type.to_string(),
        service_areas: vendor.service_areas,
        event_ids: vendor.event_ids,
        is_active: vendor.is_active,
        is_public: vendor.is_public,
        created_at: vendor.created_at,
        updated_at: vendor.updated_at,
    }
}

fn views(vendors: Vec<Vendor>) -> Json<Vec<VendorView>> {
    Json(vendors.into_iter().map(view).collect())
}

fn input(payload: VendorNew) -> VendorInput {
    VendorInput {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        description: payload.description,
        contact_person: payload.contact_person,
        address: payload.address,
        vendor_type: payload.vendor_type,
        service_areas: payload.service_areas,
        event_ids: payload.event_ids,
        is_active: payload.is_active,
        is_public: payload.is_public,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<VendorView>>, ServerError> {
    let page = state
        .engine
        .list_vendors(PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<VendorView>, ServerError> {
    Ok(Json(view(state.engine.vendor(&id).await?)))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<VendorNew>, ServerError>,
) -> Result<(StatusCode, Json<VendorView>), ServerError> {
    let vendor = state.engine.create_vendor(input(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(vendor))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<VendorNew>, ServerError>,
) -> Result<Json<VendorView>, ServerError> {
    Ok(Json(view(state.engine.update_vendor(&id, input(payload)).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_vendor(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(name), _): WithRejection<Query<NameQuery>, ServerError>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ServerError>,
) -> Result<Json<PageView<VendorView>>, ServerError> {
    let page = state
        .engine
        .search_vendors(&name.name, PageRequest::new(query.page, query.size))
        .await?;
    Ok(Json(page_view(page, view)))
}

pub async fn by_type(
    State(state): State<ServerState>,
    Path(vendor_type): Path<String>,
) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.vendors_by_type(&vendor_type).await?))
}

pub async fn by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.vendors_by_email(&email).await?))
}

pub async fn by_area(
    State(state): State<ServerState>,
    Path(area): Path<String>,
) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.vendors_by_service_area(&area).await?))
}

pub async fn by_event(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.vendors_by_event(&event_id).await?))
}

pub async fn by_active(
    State(state): State<ServerState>,
    WithRejection(Path(active), _): WithRejection<Path<bool>, ServerError>,
) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.vendors_by_active(active).await?))
}

pub async fn public(State(state): State<ServerState>) -> Result<Json<Vec<VendorView>>, ServerError> {
    Ok(views(state.engine.public_vendors().await?))
}
