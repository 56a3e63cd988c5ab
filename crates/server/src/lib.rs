use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::LedgerError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod accounts;
mod budgets;
mod categories;
mod goals;
mod recurring;
mod server;
mod summary;
mod transactions;
mod user;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountNew, AccountUpdate, AccountView};
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate,
            TransactionView,
        };
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetNew, BudgetStatusQuery, BudgetStatusView, BudgetUpdate, BudgetView,
        };
    }

    pub mod recurring {
        pub use api_types::recurring::{RecurringNew, RecurringView, SweepResponse};
    }

    pub mod goal {
        pub use api_types::goal::{GoalNew, GoalUpdate, GoalView};
    }

    pub mod summary {
        pub use api_types::summary::{SummaryQuery, SummaryView};
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::ConstraintViolation(_) => StatusCode::CONFLICT,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

/// Maps the double-`Option` JSON convention onto the engine's patch type.
fn patch_from<T>(field: Option<Option<T>>) -> engine::Patch<T> {
    match field {
        None => engine::Patch::Keep,
        Some(None) => engine::Patch::Clear,
        Some(Some(value)) => engine::Patch::Set(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_validation_maps_to_422() {
        let res =
            ServerError::from(LedgerError::InvalidArgument("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ledger_conflict_maps_to_409() {
        let res =
            ServerError::from(LedgerError::ConstraintViolation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn patch_from_distinguishes_absent_and_null() {
        assert_eq!(patch_from::<u32>(None), engine::Patch::Keep);
        assert_eq!(patch_from::<u32>(Some(None)), engine::Patch::Clear);
        assert_eq!(patch_from(Some(Some(3u32))), engine::Patch::Set(3));
    }
}
