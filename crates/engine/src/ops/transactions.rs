//! Transaction write ops: the balance maintainer.
//!
//! Every write here runs in one DB transaction so a reader never observes a
//! transaction row without the matching balance adjustment. Balances move by
//! minimal deltas instead of a full resummation; the store's transaction
//! isolation closes the read-modify-write race on the account row.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, LedgerError, MoneyCents, Patch, ResultLedger, Transaction,
    UpdateTransactionCmd, accounts, transactions,
};

use super::{Engine, with_tx};

/// Optional filters for transaction listing.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub limit: Option<u64>,
}

impl Engine {
    /// Creates a transaction and applies its amount to the account balance.
    ///
    /// Fails with `NotFound` when the account (or category, if given) does
    /// not exist or belongs to another user; nothing is written in that case.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultLedger<Transaction> {
        let tx = Transaction::new(
            cmd.user_id,
            cmd.account_id,
            cmd.category_id,
            cmd.amount,
            cmd.description,
            cmd.transaction_date,
            None,
        )?;
        with_tx!(self, |db_tx| {
            self.insert_transaction_tx(&db_tx, &tx).await?;
            Ok(tx)
        })
    }

    /// Shared create path: validates references, inserts the row, moves the
    /// balance. The recurrence sweep goes through here too, so materialized
    /// transactions keep the account invariant.
    pub(crate) async fn insert_transaction_tx<C: ConnectionTrait>(
        &self,
        db_tx: &C,
        tx: &Transaction,
    ) -> ResultLedger<()> {
        let account = self.require_account(db_tx, &tx.user_id, tx.account_id).await?;
        if let Some(category_id) = tx.category_id {
            self.require_category(db_tx, &tx.user_id, category_id)
                .await?;
        }
        transactions::ActiveModel::from(tx).insert(db_tx).await?;
        self.apply_balance_delta(db_tx, &account, tx.amount).await?;
        Ok(())
    }

    /// Applies a signed delta to an account's denormalized balance.
    ///
    /// `account` must have been read inside the same DB transaction.
    async fn apply_balance_delta<C: ConnectionTrait>(
        &self,
        db_tx: &C,
        account: &accounts::Model,
        delta: MoneyCents,
    ) -> ResultLedger<()> {
        let new_balance = MoneyCents::new(account.balance_minor)
            .checked_add(delta)
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "balance overflow on account {}",
                    account.id
                ))
            })?;
        let model = accounts::ActiveModel {
            id: ActiveValue::Set(account.id.clone()),
            balance_minor: ActiveValue::Set(new_balance.cents()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        model.update(db_tx).await?;
        Ok(())
    }

    /// Updates a transaction and reconciles account balances.
    ///
    /// Reference validation happens before any write: an update naming a
    /// nonexistent account fails with `NotFound` and leaves both the
    /// transaction and all balances untouched. Balance reconciliation:
    /// - account changed: old amount leaves the old account, new amount
    ///   enters the new one
    /// - amount changed on the same account: the delta is applied
    /// - zero delta: no balance write, but `updated_at` is still bumped
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultLedger<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(cmd.transaction_id.to_string())
                .filter(transactions::Column::UserId.eq(cmd.user_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("transaction {}", cmd.transaction_id))
                })?;

            let old_amount = MoneyCents::new(model.amount_minor);
            let old_account_id = Uuid::parse_str(&model.account_id)
                .map_err(|_| LedgerError::NotFound(format!("account {}", model.account_id)))?;

            let new_account_id = cmd.account_id.unwrap_or(old_account_id);
            let new_amount = cmd.amount.unwrap_or(old_amount);
            if new_amount.is_zero() {
                return Err(LedgerError::InvalidArgument(
                    "amount must not be zero".to_string(),
                ));
            }

            // Validate references before mutating anything.
            let new_account = self
                .require_account(&db_tx, &cmd.user_id, new_account_id)
                .await?;
            if let Patch::Set(category_id) = cmd.category_id {
                self.require_category(&db_tx, &cmd.user_id, category_id)
                    .await?;
            }

            let mut active = transactions::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if cmd.account_id.is_some() {
                active.account_id = ActiveValue::Set(new_account_id.to_string());
            }
            if cmd.amount.is_some() {
                active.amount_minor = ActiveValue::Set(new_amount.cents());
            }
            if let Some(description) = cmd.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(date) = cmd.transaction_date {
                active.transaction_date = ActiveValue::Set(date);
            }
            match cmd.category_id {
                Patch::Keep => {}
                Patch::Set(category_id) => {
                    active.category_id = ActiveValue::Set(Some(category_id.to_string()));
                }
                Patch::Clear => active.category_id = ActiveValue::Set(None),
            }
            active.update(&db_tx).await?;

            if new_account_id != old_account_id {
                let old_account = self
                    .require_account(&db_tx, &cmd.user_id, old_account_id)
                    .await?;
                self.apply_balance_delta(&db_tx, &old_account, -old_amount)
                    .await?;
                self.apply_balance_delta(&db_tx, &new_account, new_amount)
                    .await?;
            } else if new_amount != old_amount {
                self.apply_balance_delta(&db_tx, &new_account, new_amount - old_amount)
                    .await?;
            }

            let refreshed = transactions::Entity::find_by_id(model.id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("transaction {}", model.id)))?;
            Transaction::try_from(refreshed)
        })
    }

    /// Deletes a transaction and reverts its effect on the account balance.
    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("transaction {transaction_id}")))?;

            let account_id = Uuid::parse_str(&model.account_id)
                .map_err(|_| LedgerError::NotFound(format!("account {}", model.account_id)))?;
            let account = self.require_account(&db_tx, user_id, account_id).await?;
            self.apply_balance_delta(&db_tx, &account, -MoneyCents::new(model.amount_minor))
                .await?;
            transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists a user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::TransactionDate.lte(to));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
