//! Categories API endpoints

use api_types::category::{CategoryNew, CategoryView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};
use engine::CreateCategoryCmd;

fn map_kind(kind: engine::CategoryKind) -> api_types::CategoryKind {
    match kind {
        engine::CategoryKind::Income => api_types::CategoryKind::Income,
        engine::CategoryKind::Expense => api_types::CategoryKind::Expense,
    }
}

fn map_api_kind(kind: api_types::CategoryKind) -> engine::CategoryKind {
    match kind {
        api_types::CategoryKind::Income => engine::CategoryKind::Income,
        api_types::CategoryKind::Expense => engine::CategoryKind::Expense,
    }
}

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        color: category.color,
        parent_id: category.parent_id,
        created_at: category.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(CreateCategoryCmd {
            user_id: user.username,
            name: payload.name,
            kind: map_api_kind(payload.kind),
            color: payload.color,
            parent_id: payload.parent_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(&user.username).await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}
