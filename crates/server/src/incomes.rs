use api_types::income::{IncomeNew, IncomeView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Income, IncomeInput};

use crate::{ServerError, amount, money, server::ServerState};

fn view(income: Income) -> IncomeView {
    IncomeView {
        id: income.id.to_string(),
        budget_id: income.budget_id.to_string(),
        category: income.category,
        amount: amount(income.amount),
        description: income.description,
        source: income.source,
        date: income.date,
        status: income.status.to_string(),
        created_at: income.created_at,
        updated_at: income.updated_at,
    }
}

fn views(incomes: Vec<Income>) -> Json<Vec<IncomeView>> {
    Json(incomes.into_iter().map(view).collect())
}

fn input(payload: IncomeNew) -> Result<(String, IncomeInput), ServerError> {
    let income = IncomeInput {
        category: payload.category,
        amount: money(&payload.amount)?,
        description: payload.description,
        source: payload.source,
        date: payload.date,
        status: payload.status,
    };
    Ok((payload.budget_id, income))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<IncomeView>>, ServerError> {
    Ok(views(state.engine.incomes().await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<IncomeView>, ServerError> {
    Ok(Json(view(state.engine.income(&id).await?)))
}

pub async fn by_budget(
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    Ok(views(state.engine.incomes_by_budget(&budget_id).await?))
}

pub async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    Ok(views(state.engine.incomes_by_status(&status).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<IncomeNew>, ServerError>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let (budget_id, income) = input(payload)?;
    let income = state.engine.create_income(&budget_id, income).await?;
    Ok((StatusCode::CREATED, Json(view(income))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<IncomeNew>, ServerError>,
) -> Result<Json<IncomeView>, ServerError> {
    let (_, income) = input(payload)?;
    Ok(Json(view(state.engine.update_income(&id, income).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
