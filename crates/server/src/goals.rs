//! Goals API endpoints

use api_types::goal::{GoalNew, GoalUpdate, GoalView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, patch_from, server::ServerState, user};
use engine::{CreateGoalCmd, MoneyCents, UpdateGoalCmd};

fn map_status(status: engine::GoalStatus) -> api_types::GoalStatus {
    match status {
        engine::GoalStatus::Active => api_types::GoalStatus::Active,
        engine::GoalStatus::Completed => api_types::GoalStatus::Completed,
        engine::GoalStatus::Paused => api_types::GoalStatus::Paused,
    }
}

fn map_api_status(status: api_types::GoalStatus) -> engine::GoalStatus {
    match status {
        api_types::GoalStatus::Active => engine::GoalStatus::Active,
        api_types::GoalStatus::Completed => engine::GoalStatus::Completed,
        api_types::GoalStatus::Paused => engine::GoalStatus::Paused,
    }
}

pub(crate) fn view(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        target_amount_minor: goal.target_amount.cents(),
        current_amount_minor: goal.current_amount.cents(),
        target_date: goal.target_date,
        status: map_status(goal.status),
        description: goal.description,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(CreateGoalCmd {
            user_id: user.username,
            name: payload.name,
            target_amount: MoneyCents::new(payload.target_amount_minor),
            target_date: payload.target_date,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(goal))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let mut cmd = UpdateGoalCmd::new(user.username, id);
    cmd.name = payload.name;
    cmd.target_amount = payload.target_amount_minor.map(MoneyCents::new);
    cmd.current_amount = payload.current_amount_minor.map(MoneyCents::new);
    cmd.target_date = patch_from(payload.target_date);
    cmd.status = payload.status.map(map_api_status);
    cmd.description = patch_from(payload.description);

    let goal = state.engine.update_goal(cmd).await?;
    Ok(Json(view(goal)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.list_goals(&user.username).await?;
    Ok(Json(goals.into_iter().map(view).collect()))
}
