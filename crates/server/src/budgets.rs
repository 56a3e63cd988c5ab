//! Budgets API endpoints

use api_types::budget::{BudgetNew, BudgetStatusQuery, BudgetStatusView, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, patch_from, server::ServerState, user};
use engine::{BudgetStatusFilter, CreateBudgetCmd, MoneyCents, UpdateBudgetCmd};

fn map_period(period: engine::BudgetPeriod) -> api_types::BudgetPeriod {
    match period {
        engine::BudgetPeriod::Weekly => api_types::BudgetPeriod::Weekly,
        engine::BudgetPeriod::Monthly => api_types::BudgetPeriod::Monthly,
        engine::BudgetPeriod::Yearly => api_types::BudgetPeriod::Yearly,
    }
}

fn map_api_period(period: api_types::BudgetPeriod) -> engine::BudgetPeriod {
    match period {
        api_types::BudgetPeriod::Weekly => engine::BudgetPeriod::Weekly,
        api_types::BudgetPeriod::Monthly => engine::BudgetPeriod::Monthly,
        api_types::BudgetPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

fn view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        amount_minor: budget.amount.cents(),
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

pub(crate) fn status_view(status: engine::BudgetStatus) -> BudgetStatusView {
    BudgetStatusView {
        budget: view(status.budget),
        category_name: status.category_name,
        spent_minor: status.spent.cents(),
        remaining_minor: status.remaining.cents(),
        percentage_used: status.percentage_used,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(CreateBudgetCmd {
            user_id: user.username,
            category_id: payload.category_id,
            amount: MoneyCents::new(payload.amount_minor),
            period: map_api_period(payload.period),
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(budget))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let mut cmd = UpdateBudgetCmd::new(user.username, id);
    cmd.amount = payload.amount_minor.map(MoneyCents::new);
    cmd.period = payload.period.map(map_api_period);
    cmd.start_date = payload.start_date;
    cmd.end_date = patch_from(payload.end_date);

    let budget = state.engine.update_budget(cmd).await?;
    Ok(Json(view(budget)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state.engine.list_budgets(&user.username).await?;
    Ok(Json(budgets.into_iter().map(view).collect()))
}

pub async fn status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    payload: Option<Json<BudgetStatusQuery>>,
) -> Result<Json<Vec<BudgetStatusView>>, ServerError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let filter = BudgetStatusFilter {
        period: payload.period.map(map_api_period),
        category_id: payload.category_id,
    };

    let statuses = state.engine.budget_status(&user.username, &filter).await?;
    Ok(Json(statuses.into_iter().map(status_view).collect()))
}
