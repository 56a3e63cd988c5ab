use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

mod accounts;
mod budgets;
mod categories;
mod goals;
mod recurring;
mod summary;
mod transactions;

pub use budgets::{BudgetStatus, BudgetStatusFilter};
pub use recurring::SweepReport;
pub use summary::FinancialSummary;
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Fetches an account owned by `user_id`, or `NotFound`.
    pub(crate) async fn require_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultLedger<crate::accounts::Model> {
        crate::accounts::Entity::find_by_id(account_id.to_string())
            .filter(crate::accounts::Column::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))
    }

    /// Fetches a category owned by `user_id`, or `NotFound`.
    pub(crate) async fn require_category<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultLedger<crate::categories::Model> {
        crate::categories::Entity::find_by_id(category_id.to_string())
            .filter(crate::categories::Column::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("category {category_id}")))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultLedger<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
