//! Transactions API endpoints

use api_types::transaction::{
    TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, patch_from, server::ServerState, user};
use engine::{
    CreateTransactionCmd, MoneyCents, TransactionListFilter, UpdateTransactionCmd,
};

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        category_id: tx.category_id,
        amount_minor: tx.amount.cents(),
        description: tx.description,
        transaction_date: tx.transaction_date,
        recurring_rule_id: tx.recurring_rule_id,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = CreateTransactionCmd::new(
        user.username,
        payload.account_id,
        MoneyCents::new(payload.amount_minor),
        payload.description,
        payload.transaction_date,
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(user.username, id);
    cmd.account_id = payload.account_id;
    cmd.amount = payload.amount_minor.map(MoneyCents::new);
    cmd.description = payload.description;
    cmd.transaction_date = payload.transaction_date;
    cmd.category_id = patch_from(payload.category_id);

    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    payload: Option<Json<TransactionList>>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let filter = TransactionListFilter {
        account_id: payload.account_id,
        category_id: payload.category_id,
        from: payload.from,
        to: payload.to,
        limit: payload.limit,
    };

    let transactions = state
        .engine
        .list_transactions(&user.username, &filter)
        .await?;
    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}
