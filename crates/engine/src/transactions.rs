//! Transaction primitives.
//!
//! A `Transaction` is a signed posting against one account: positive amounts
//! are inflows, negative amounts are outflows. The amount must not be zero.
//! `transaction_date` is a calendar date; budget windows and recurrence
//! compare it as such, without a time component.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, ResultLedger};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub description: String,
    pub transaction_date: NaiveDate,
    /// Set when the transaction was materialized from a recurring rule.
    pub recurring_rule_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: String,
        account_id: Uuid,
        category_id: Option<Uuid>,
        amount: MoneyCents,
        description: String,
        transaction_date: NaiveDate,
        recurring_rule_id: Option<Uuid>,
    ) -> ResultLedger<Self> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidArgument(
                "amount must not be zero".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            category_id,
            amount,
            description,
            transaction_date,
            recurring_rule_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub amount_minor: i64,
    pub description: String,
    pub transaction_date: Date,
    pub recurring_rule_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            category_id: ActiveValue::Set(tx.category_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            description: ActiveValue::Set(tx.description.clone()),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            recurring_rule_id: ActiveValue::Set(tx.recurring_rule_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound(format!("transaction {}", model.id)))?,
            user_id: model.user_id,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| LedgerError::NotFound(format!("account {}", model.account_id)))?,
            category_id: model.category_id.and_then(|s| Uuid::parse_str(&s).ok()),
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            transaction_date: model.transaction_date,
            recurring_rule_id: model
                .recurring_rule_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_amount() {
        let result = Transaction::new(
            "alice".to_string(),
            Uuid::new_v4(),
            None,
            MoneyCents::ZERO,
            "noop".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
        );
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn new_accepts_signed_amounts() {
        for cents in [1i64, -50075] {
            let tx = Transaction::new(
                "alice".to_string(),
                Uuid::new_v4(),
                None,
                MoneyCents::new(cents),
                "posting".to_string(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                None,
            )
            .unwrap();
            assert_eq!(tx.amount.cents(), cents);
        }
    }
}
