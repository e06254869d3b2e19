use api_types::Health;
use axum::{Json, extract::State};
use chrono::Utc;

use crate::server::ServerState;

pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health {
        status: "UP".to_string(),
        service: state.service_name.to_string(),
        timestamp: Utc::now(),
    })
}
