//! Accounts API endpoints

use api_types::account::{AccountNew, AccountUpdate, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, patch_from, server::ServerState, user};
use engine::{CreateAccountCmd, MoneyCents, UpdateAccountCmd};

fn map_kind(kind: engine::AccountKind) -> api_types::AccountKind {
    match kind {
        engine::AccountKind::Checking => api_types::AccountKind::Checking,
        engine::AccountKind::Savings => api_types::AccountKind::Savings,
        engine::AccountKind::CreditCard => api_types::AccountKind::CreditCard,
        engine::AccountKind::Investment => api_types::AccountKind::Investment,
        engine::AccountKind::Cash => api_types::AccountKind::Cash,
        engine::AccountKind::Loan => api_types::AccountKind::Loan,
    }
}

fn map_api_kind(kind: api_types::AccountKind) -> engine::AccountKind {
    match kind {
        api_types::AccountKind::Checking => engine::AccountKind::Checking,
        api_types::AccountKind::Savings => engine::AccountKind::Savings,
        api_types::AccountKind::CreditCard => engine::AccountKind::CreditCard,
        api_types::AccountKind::Investment => engine::AccountKind::Investment,
        api_types::AccountKind::Cash => engine::AccountKind::Cash,
        api_types::AccountKind::Loan => engine::AccountKind::Loan,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: map_kind(account.kind),
        balance_minor: account.balance.cents(),
        currency: account.currency,
        description: account.description,
        is_active: account.is_active,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .create_account(CreateAccountCmd {
            user_id: user.username,
            name: payload.name,
            kind: map_api_kind(payload.kind),
            opening_balance: MoneyCents::new(payload.opening_balance_minor),
            currency: payload.currency,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(account))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let mut cmd = UpdateAccountCmd::new(user.username, id);
    cmd.name = payload.name;
    cmd.kind = payload.kind.map(map_api_kind);
    cmd.currency = payload.currency;
    cmd.description = patch_from(payload.description);
    cmd.is_active = payload.is_active;

    let account = state.engine.update_account(cmd).await?;
    Ok(Json(view(account)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts(&user.username).await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}
