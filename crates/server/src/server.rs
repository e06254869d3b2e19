use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use std::sync::Arc;

use crate::{attendees, budgets, events, expenses, health, incomes, registrations, vendors};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Name reported by `/health`.
    pub service_name: Arc<str>,
}

impl ServerState {
    pub fn new(engine: Engine, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            engine: Arc::new(engine),
            service_name: service_name.into(),
        }
    }
}

fn ledger_routes() -> Router<ServerState> {
    Router::new()
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .put(budgets::update)
                .delete(budgets::delete),
        )
        .route("/budgets/{id}/reconcile", post(budgets::reconcile))
        .route("/budgets/event/{event_id}", get(budgets::by_event))
        .route("/budgets/status/{status}", get(budgets::by_status))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/expenses/budget/{budget_id}", get(expenses::by_budget))
        .route("/expenses/status/{status}", get(expenses::by_status))
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            get(incomes::get).put(incomes::update).delete(incomes::delete),
        )
        .route("/incomes/budget/{budget_id}", get(incomes::by_budget))
        .route("/incomes/status/{status}", get(incomes::by_status))
}

fn event_routes() -> Router<ServerState> {
    Router::new()
        .route("/events", get(events::list).post(events::create))
        .route(
            "/events/{id}",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route("/events/{id}/status", patch(events::set_status))
        .route("/events/upcoming", get(events::upcoming))
        .route("/events/search", get(events::search))
        .route("/events/venue/{venue}", get(events::by_venue))
        .route("/events/category/{category}", get(events::by_category))
        .route("/events/organizer/{organizer_id}", get(events::by_organizer))
        .route("/events/status/{status}", get(events::by_status))
        .route("/events/vendor/{vendor_id}", get(events::by_vendor))
        .route("/events/attendee/{attendee_id}", get(events::by_attendee))
        .route("/events/tag/{tag}", get(events::by_tag))
        .route("/events/dateRange", get(events::in_range))
        .route("/events/public", get(events::public))
}

fn vendor_routes() -> Router<ServerState> {
    Router::new()
        .route("/vendors", get(vendors::list).post(vendors::create))
        .route(
            "/vendors/{id}",
            get(vendors::get)
                .put(vendors::update)
                .delete(vendors::delete),
        )
        .route("/vendors/search", get(vendors::search))
        .route("/vendors/type/{vendor_type}", get(vendors::by_type))
        .route("/vendors/email/{email}", get(vendors::by_email))
        .route("/vendors/area/{area}", get(vendors::by_area))
        .route("/vendors/event/{event_id}", get(vendors::by_event))
        .route("/vendors/active/{active}", get(vendors::by_active))
        .route("/vendors/public", get(vendors::public))
}

fn attendee_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(attendees::list).post(attendees::create))
        .route(
            "/{id}",
            get(attendees::get)
                .put(attendees::update)
                .delete(attendees::delete),
        )
        .route("/{id}/status", patch(attendees::set_status))
        .route(
            "/{id}/events/{event_id}",
            post(attendees::add_event).delete(attendees::remove_event),
        )
        .route("/user/{user_id}", get(attendees::by_user))
        .route("/email/{email}", get(attendees::by_email))
        .route("/event/{event_id}", get(attendees::by_event))
        .route("/search", get(attendees::search))
}

fn registration_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(registrations::list).post(registrations::create))
        .route(
            "/{id}",
            get(registrations::get)
                .put(registrations::update)
                .delete(registrations::delete),
        )
        .route(
            "/{id}/payment-status",
            patch(registrations::set_payment_status),
        )
        .route("/{id}/check-in", patch(registrations::check_in))
        .route(
            "/{id}/check-in-status",
            patch(registrations::set_check_in_status),
        )
        .route("/attendee/{attendee_id}", get(registrations::by_attendee))
        .route("/event/{event_id}", get(registrations::by_event))
        .route(
            "/event/{event_id}/status/{status}",
            get(registrations::by_event_and_payment_status),
        )
        .route(
            "/event/{event_id}/check-in-status/{status}",
            get(registrations::by_event_and_check_in_status),
        )
        .route("/event/{event_id}/count", get(registrations::count))
        .route("/dateRange", get(registrations::in_range))
        .route("/search", get(registrations::search))
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(ledger_routes())
        .merge(event_routes())
        .merge(vendor_routes())
        .nest("/api/attendees", attendee_routes())
        .nest("/api/registrations", registration_routes())
        .layer(middleware::from_fn(crate::error_path))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("{} listening on {}", state.service_name, addr);

    axum::serve(listener, router(state)).await
}
