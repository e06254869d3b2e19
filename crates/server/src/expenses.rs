//! Expense API endpoints. Every write also moves the owning budget's
//! `currentExpenses`.

use api_types::expense::{ExpenseNew, ExpenseView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Expense, ExpenseInput};

use crate::{ServerError, amount, money, server::ServerState};

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id.to_string(),
        budget_id: expense.budget_id.to_string(),
        category: expense.category,
        amount: amount(expense.amount),
        description: expense.description,
        vendor: expense.vendor,
        date: expense.date,
        payment_status: expense.payment_status.to_string(),
        receipt_url: expense.receipt_url,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn views(expenses: Vec<Expense>) -> Json<Vec<ExpenseView>> {
    Json(expenses.into_iter().map(view).collect())
}

fn input(payload: ExpenseNew) -> Result<(String, ExpenseInput), ServerError> {
    let expense = ExpenseInput {
        category: payload.category,
        amount: money(&payload.amount)?,
        description: payload.description,
        vendor: payload.vendor,
        date: payload.date,
        payment_status: payload.payment_status,
        receipt_url: payload.receipt_url,
    };
    Ok((payload.budget_id, expense))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    Ok(views(state.engine.expenses().await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    Ok(Json(view(state.engine.expense(&id).await?)))
}

pub async fn by_budget(
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    Ok(views(state.engine.expenses_by_budget(&budget_id).await?))
}

pub async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    Ok(views(state.engine.expenses_by_status(&status).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseNew>, ServerError>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let (budget_id, expense) = input(payload)?;
    let expense = state.engine.create_expense(&budget_id, expense).await?;
    Ok((StatusCode::CREATED, Json(view(expense))))
}

/// The `budgetId` of the payload is ignored: an expense never changes budget.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseNew>, ServerError>,
) -> Result<Json<ExpenseView>, ServerError> {
    let (_, expense) = input(payload)?;
    Ok(Json(view(state.engine.update_expense(&id, expense).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
