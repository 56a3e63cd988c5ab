//! Financial-summary API endpoint

use api_types::summary::{SummaryQuery, SummaryView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, budgets, goals, server::ServerState, user};

pub async fn get_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    payload: Option<Json<SummaryQuery>>,
) -> Result<Json<SummaryView>, ServerError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let summary = state
        .engine
        .financial_summary(&user.username, payload.start, payload.end)
        .await?;

    Ok(Json(SummaryView {
        income_minor: summary.income.cents(),
        expenses_minor: summary.expenses.cents(),
        net_minor: summary.net.cents(),
        account_balances: summary
            .account_balances
            .into_iter()
            .map(|(name, balance)| (name, balance.cents()))
            .collect(),
        budget_status: summary
            .budget_status
            .into_iter()
            .map(budgets::status_view)
            .collect(),
        goals: summary.goals.into_iter().map(goals::view).collect(),
    }))
}
