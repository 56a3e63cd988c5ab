//! Recurring-rule API endpoints

use api_types::recurring::{RecurringNew, RecurringView, SweepResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};
use engine::{CreateRecurringRuleCmd, MoneyCents};

fn map_frequency(frequency: engine::Frequency) -> api_types::Frequency {
    match frequency {
        engine::Frequency::Daily => api_types::Frequency::Daily,
        engine::Frequency::Weekly => api_types::Frequency::Weekly,
        engine::Frequency::Monthly => api_types::Frequency::Monthly,
        engine::Frequency::Yearly => api_types::Frequency::Yearly,
    }
}

fn map_api_frequency(frequency: api_types::Frequency) -> engine::Frequency {
    match frequency {
        api_types::Frequency::Daily => engine::Frequency::Daily,
        api_types::Frequency::Weekly => engine::Frequency::Weekly,
        api_types::Frequency::Monthly => engine::Frequency::Monthly,
        api_types::Frequency::Yearly => engine::Frequency::Yearly,
    }
}

fn view(rule: engine::RecurringRule) -> RecurringView {
    RecurringView {
        id: rule.id,
        account_id: rule.account_id,
        category_id: rule.category_id,
        amount_minor: rule.amount.cents(),
        description: rule.description,
        frequency: map_frequency(rule.frequency),
        next_due_date: rule.next_due_date,
        end_date: rule.end_date,
        is_active: rule.is_active,
        created_at: rule.created_at,
        updated_at: rule.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecurringNew>,
) -> Result<(StatusCode, Json<RecurringView>), ServerError> {
    let mut cmd = CreateRecurringRuleCmd::new(
        user.username,
        payload.account_id,
        MoneyCents::new(payload.amount_minor),
        payload.description,
        map_api_frequency(payload.frequency),
        payload.start_date,
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(end_date) = payload.end_date {
        cmd = cmd.end_date(end_date);
    }

    let rule = state.engine.create_recurring_rule(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(rule))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<RecurringView>>, ServerError> {
    let rules = state.engine.list_recurring_rules(&user.username).await?;
    Ok(Json(rules.into_iter().map(view).collect()))
}

/// Materializes the caller's due rules as of today.
pub async fn process(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SweepResponse>, ServerError> {
    let report = state
        .engine
        .sweep_recurring(Some(&user.username), Utc::now().date_naive())
        .await?;

    Ok(Json(SweepResponse {
        processed: report.processed,
        failed: report.failed,
    }))
}
