//! Budget API endpoints.

use api_types::budget::{BudgetNew, BudgetView, ReconciliationView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Budget, BudgetInput, LedgerReconciliation};

use crate::{ServerError, amount, money, server::ServerState};

fn view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id.to_string(),
        event_id: budget.event_id,
        name: budget.name,
        total_budget: amount(budget.total_budget),
        current_expenses: amount(budget.current_expenses),
        current_income: amount(budget.current_income),
        status: budget.status.to_string(),
        notes: budget.notes,
        categories: budget.categories,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

fn views(budgets: Vec<Budget>) -> Json<Vec<BudgetView>> {
    Json(budgets.into_iter().map(view).collect())
}

fn input(payload: BudgetNew) -> Result<BudgetInput, ServerError> {
    Ok(BudgetInput {
        event_id: payload.event_id,
        name: payload.name,
        total_budget: money(&payload.total_budget)?,
        notes: payload.notes,
        categories: payload.categories,
        status: payload.status,
    })
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<BudgetView>>, ServerError> {
    Ok(views(state.engine.budgets().await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<BudgetView>, ServerError> {
    Ok(Json(view(state.engine.budget(&id).await?)))
}

pub async fn by_event(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    Ok(views(state.engine.budgets_by_event(&event_id).await?))
}

pub async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    Ok(views(state.engine.budgets_by_status(&status).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetNew>, ServerError>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state.engine.create_budget(input(payload)?).await?;
    Ok((StatusCode::CREATED, Json(view(budget))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetNew>, ServerError>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.update_budget(&id, input(payload)?).await?;
    Ok(Json(view(budget)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reconcile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ReconciliationView>, ServerError> {
    let report: LedgerReconciliation = state.engine.recompute_budget_totals(&id).await?;
    Ok(Json(ReconciliationView {
        drifted: report.drifted(),
        budget_id: report.budget_id,
        expenses_before: amount(report.expenses_before),
        expenses_after: amount(report.expenses_after),
        income_before: amount(report.income_before),
        income_after: amount(report.income_after),
    }))
}
