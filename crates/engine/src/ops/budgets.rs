//! Budget ops and the budget-status aggregation.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetPeriod, CategoryKind, CreateBudgetCmd, LedgerError, MoneyCents, ResultLedger,
    UpdateBudgetCmd, budgets, transactions,
};

use super::{Engine, with_tx};

/// Optional filters for `budget_status`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BudgetStatusFilter {
    pub period: Option<BudgetPeriod>,
    pub category_id: Option<Uuid>,
}

/// One budget with its window aggregation, computed fresh per call.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub category_name: String,
    /// Sum of expense outflows in the budget window, as a positive figure.
    pub spent: MoneyCents,
    /// `amount - spent`; negative when overspent.
    pub remaining: MoneyCents,
    /// Share of the budget consumed, capped at 100.
    pub percentage_used: f64,
}

impl Engine {
    /// Creates a budget against an expense category.
    pub async fn create_budget(&self, cmd: CreateBudgetCmd) -> ResultLedger<Budget> {
        let budget = Budget::new(
            cmd.user_id,
            cmd.category_id,
            cmd.amount,
            cmd.period,
            cmd.start_date,
            cmd.end_date,
        )?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, &budget.user_id, budget.category_id)
                .await?;
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget)
        })
    }

    /// Partially updates a budget.
    pub async fn update_budget(&self, cmd: UpdateBudgetCmd) -> ResultLedger<Budget> {
        if let Some(amount) = cmd.amount {
            if !amount.is_positive() {
                return Err(LedgerError::InvalidArgument(
                    "budget amount must be > 0".to_string(),
                ));
            }
        }
        with_tx!(self, |db_tx| {
            let current = budgets::Entity::find_by_id(cmd.budget_id.to_string())
                .filter(budgets::Column::UserId.eq(cmd.user_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("budget {}", cmd.budget_id)))?;

            let start = cmd.start_date.unwrap_or(current.start_date);
            let end = cmd.end_date.apply(current.end_date);
            if let Some(end) = end {
                if end < start {
                    return Err(LedgerError::InvalidArgument(
                        "budget end_date must not precede start_date".to_string(),
                    ));
                }
            }

            let mut active = budgets::ActiveModel {
                id: ActiveValue::Set(current.id.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(amount) = cmd.amount {
                active.amount_minor = ActiveValue::Set(amount.cents());
            }
            if let Some(period) = cmd.period {
                active.period = ActiveValue::Set(period.as_str().to_string());
            }
            if let Some(start_date) = cmd.start_date {
                active.start_date = ActiveValue::Set(start_date);
            }
            if cmd.end_date.is_change() {
                active.end_date = ActiveValue::Set(end);
            }
            let updated = active.update(&db_tx).await?;
            Budget::try_from(updated)
        })
    }

    /// Lists a user's budgets, newest window first.
    pub async fn list_budgets(&self, user_id: &str) -> ResultLedger<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    /// Computes the spent/remaining/percentage figures for each matching
    /// budget. `percentage_used` is capped at 100 and a zero budget amount
    /// yields 0 instead of a division error.
    pub async fn budget_status(
        &self,
        user_id: &str,
        filter: &BudgetStatusFilter,
    ) -> ResultLedger<Vec<BudgetStatus>> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartDate);
        if let Some(period) = filter.period {
            query = query.filter(budgets::Column::Period.eq(period.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id.to_string()));
        }
        let models = query.all(&self.database).await?;

        let mut statuses = Vec::with_capacity(models.len());
        for model in models {
            let budget = Budget::try_from(model)?;
            let category = self
                .require_category(&self.database, user_id, budget.category_id)
                .await?;
            let spent = self.spent_for_budget(&self.database, &budget, &category).await?;
            let remaining = budget.amount - spent;
            let percentage_used = if budget.amount.is_positive() {
                let raw = spent.cents() as f64 * 100.0 / budget.amount.cents() as f64;
                raw.clamp(0.0, 100.0)
            } else {
                0.0
            };
            statuses.push(BudgetStatus {
                budget,
                category_name: category.name,
                spent,
                remaining,
                percentage_used,
            });
        }
        Ok(statuses)
    }

    /// Sums the expense outflows of the budget's category inside its window.
    ///
    /// Only expense-kind categories accumulate spending; a budget pointed at
    /// an income category reports zero spent.
    async fn spent_for_budget<C: ConnectionTrait>(
        &self,
        conn: &C,
        budget: &Budget,
        category: &crate::categories::Model,
    ) -> ResultLedger<MoneyCents> {
        if CategoryKind::try_from(category.kind.as_str())? != CategoryKind::Expense {
            return Ok(MoneyCents::ZERO);
        }
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(budget.user_id.clone()))
            .filter(transactions::Column::CategoryId.eq(budget.category_id.to_string()))
            .filter(transactions::Column::TransactionDate.gte(budget.start_date));
        if let Some(end) = budget.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }
        let total: i64 = query
            .all(conn)
            .await?
            .iter()
            .map(|tx| tx.amount_minor)
            .sum();
        // Expenses are stored negative; spent reads as a positive figure.
        Ok(MoneyCents::new(-total))
    }
}
