//! Running totals of a budget.
//!
//! `current_expenses_minor` and `current_income_minor` on `budgets` are
//! adjusted with an in-place increment so two writers on the same budget
//! never overwrite each other. `recompute_budget_totals` rebuilds both totals
//! from the child rows.

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{EngineError, MoneyCents, ResultEngine, budgets, expenses, incomes};

use super::{Engine, with_tx};

/// Which running total of a budget a child record feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LedgerTotal {
    Expenses,
    Income,
}

impl LedgerTotal {
    fn column(self) -> budgets::Column {
        match self {
            LedgerTotal::Expenses => budgets::Column::CurrentExpensesMinor,
            LedgerTotal::Income => budgets::Column::CurrentIncomeMinor,
        }
    }
}

/// Totals of one budget before and after a reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReconciliation {
    pub budget_id: String,
    pub expenses_before: MoneyCents,
    pub expenses_after: MoneyCents,
    pub income_before: MoneyCents,
    pub income_after: MoneyCents,
}

impl LedgerReconciliation {
    /// True when the stored totals did not match the child rows.
    #[must_use]
    pub fn drifted(&self) -> bool {
        self.expenses_before != self.expenses_after || self.income_before != self.income_after
    }
}

impl Engine {
    /// Adds `delta` to one running total of `budget_id`.
    ///
    /// A zero delta is a no-op. Fails with `KeyNotFound` when the budget is
    /// missing and with `Validation` when the total would leave the `i64`
    /// range.
    pub(crate) async fn adjust_budget_total<C>(
        &self,
        db: &C,
        budget_id: &str,
        total: LedgerTotal,
        delta: MoneyCents,
    ) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        if delta.is_zero() {
            return Ok(());
        }

        let column = total.column();
        let in_range = if delta.is_positive() {
            Expr::col(column).lte(i64::MAX - delta.cents())
        } else {
            Expr::col(column).gte(i64::MIN - delta.cents())
        };
        let result = budgets::Entity::update_many()
            .col_expr(column, Expr::col(column).add(delta.cents()))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(budgets::Column::Id.eq(budget_id))
            .filter(in_range)
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            let exists = budgets::Entity::find_by_id(budget_id.to_string())
                .one(db)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Validation(format!(
                    "budget {budget_id} total would overflow"
                )));
            }
            return Err(EngineError::not_found("Budget", budget_id));
        }
        tracing::debug!(budget_id, ?total, delta = %delta, "budget total adjusted");
        Ok(())
    }

    /// Rebuilds the running totals of `budget_id` from its expenses and
    /// incomes.
    pub async fn recompute_budget_totals(
        &self,
        budget_id: &str,
    ) -> ResultEngine<LedgerReconciliation> {
        with_tx!(self, |db_tx| {
            let budget = self.require_budget(&db_tx, budget_id).await?;
            recompute(&db_tx, budget).await
        })
    }

    /// Reconciles every budget, including soft-deleted ones.
    pub async fn reconcile_all_budgets(&self) -> ResultEngine<Vec<LedgerReconciliation>> {
        with_tx!(self, |db_tx| {
            let budgets = budgets::Entity::find()
                .order_by_asc(budgets::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            let mut reports = Vec::with_capacity(budgets.len());
            for budget in budgets {
                reports.push(recompute(&db_tx, budget).await?);
            }
            Ok(reports)
        })
    }
}

async fn recompute<C>(db: &C, budget: budgets::Model) -> ResultEngine<LedgerReconciliation>
where
    C: ConnectionTrait,
{
    let expense_amounts: Vec<i64> = expenses::Entity::find()
        .select_only()
        .column(expenses::Column::AmountMinor)
        .filter(expenses::Column::BudgetId.eq(budget.id.as_str()))
        .into_tuple()
        .all(db)
        .await?;
    let income_amounts: Vec<i64> = incomes::Entity::find()
        .select_only()
        .column(incomes::Column::AmountMinor)
        .filter(incomes::Column::BudgetId.eq(budget.id.as_str()))
        .into_tuple()
        .all(db)
        .await?;

    let overflow = || EngineError::Validation(format!("budget {} totals overflow", budget.id));
    let expenses_after = MoneyCents::checked_sum(expense_amounts.into_iter().map(MoneyCents::new))
        .ok_or_else(overflow)?;
    let income_after = MoneyCents::checked_sum(income_amounts.into_iter().map(MoneyCents::new))
        .ok_or_else(overflow)?;

    let report = LedgerReconciliation {
        budget_id: budget.id.clone(),
        expenses_before: MoneyCents::new(budget.current_expenses_minor),
        expenses_after,
        income_before: MoneyCents::new(budget.current_income_minor),
        income_after,
    };

    if report.drifted() {
        tracing::warn!(
            budget_id = %report.budget_id,
            expenses_before = %report.expenses_before,
            expenses_after = %report.expenses_after,
            income_before = %report.income_before,
            income_after = %report.income_after,
            "budget totals drifted from child rows"
        );
        let active = budgets::ActiveModel {
            id: ActiveValue::Set(budget.id),
            current_expenses_minor: ActiveValue::Set(report.expenses_after.cents()),
            current_income_minor: ActiveValue::Set(report.income_after.cents()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        active.update(db).await?;
    }

    Ok(report)
}
