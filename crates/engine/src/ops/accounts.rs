use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{
    Account, CreateAccountCmd, LedgerError, ResultLedger, UpdateAccountCmd, accounts,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an account with an opening balance.
    ///
    /// The opening balance is not a transaction; it seeds `balance_minor`
    /// directly, so the ledger invariant holds over the transactions created
    /// afterwards.
    pub async fn create_account(&self, cmd: CreateAccountCmd) -> ResultLedger<Account> {
        let account = Account::new(
            cmd.user_id,
            cmd.name,
            cmd.kind,
            cmd.opening_balance,
            cmd.currency,
            cmd.description,
        )?;
        accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account)
    }

    /// Partially updates an account. Balance is not settable here; only the
    /// transaction ops move it.
    pub async fn update_account(&self, cmd: UpdateAccountCmd) -> ResultLedger<Account> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(LedgerError::InvalidArgument(
                    "account name must not be empty".to_string(),
                ));
            }
        }
        with_tx!(self, |db_tx| {
            let current = self
                .require_account(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;

            let mut active = accounts::ActiveModel {
                id: ActiveValue::Set(current.id.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(name) = cmd.name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(currency) = cmd.currency {
                active.currency = ActiveValue::Set(currency);
            }
            if cmd.description.is_change() {
                active.description =
                    ActiveValue::Set(cmd.description.apply(current.description.clone()));
            }
            if let Some(is_active) = cmd.is_active {
                active.is_active = ActiveValue::Set(is_active);
            }
            let updated = active.update(&db_tx).await?;
            Account::try_from(updated)
        })
    }

    /// Lists a user's accounts by name.
    pub async fn list_accounts(&self, user_id: &str) -> ResultLedger<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}
