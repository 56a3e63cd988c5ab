//! Recurring rule primitives.
//!
//! A `RecurringRule` is a template that the sweep materializes into concrete
//! transactions. `next_due_date` strictly increases by at least one day per
//! advancement, which is what makes repeated sweeps within the same day
//! idempotent.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Returns the next occurrence after `date`.
    ///
    /// Month and year steps clamp to the last valid day of the target month
    /// (chrono `checked_add_months` semantics): 2024-01-31 + 1 month is
    /// 2024-02-29, and 2024-02-29 + 1 year is 2025-02-28.
    pub fn advance(self, date: NaiveDate) -> ResultLedger<NaiveDate> {
        let advanced = match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        };
        advanced.ok_or_else(|| {
            LedgerError::InvalidArgument(format!("next occurrence after {date} is out of range"))
        })
    }
}

impl TryFrom<&str> for Frequency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(LedgerError::InvalidArgument(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub description: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        account_id: Uuid,
        category_id: Option<Uuid>,
        amount: MoneyCents,
        description: String,
        frequency: Frequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ResultLedger<Self> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidArgument(
                "amount must not be zero".to_string(),
            ));
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(LedgerError::InvalidArgument(
                    "rule end_date must not precede start_date".to_string(),
                ));
            }
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            category_id,
            amount,
            description,
            frequency,
            next_due_date: start_date,
            end_date,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: String,
    pub next_due_date: Date,
    pub end_date: Option<Date>,
    pub is_active: bool,
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
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RecurringRule> for ActiveModel {
    fn from(rule: &RecurringRule) -> Self {
        Self {
            id: ActiveValue::Set(rule.id.to_string()),
            user_id: ActiveValue::Set(rule.user_id.clone()),
            account_id: ActiveValue::Set(rule.account_id.to_string()),
            category_id: ActiveValue::Set(rule.category_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(rule.amount.cents()),
            description: ActiveValue::Set(rule.description.clone()),
            frequency: ActiveValue::Set(rule.frequency.as_str().to_string()),
            next_due_date: ActiveValue::Set(rule.next_due_date),
            end_date: ActiveValue::Set(rule.end_date),
            is_active: ActiveValue::Set(rule.is_active),
            created_at: ActiveValue::Set(rule.created_at),
            updated_at: ActiveValue::Set(rule.updated_at),
        }
    }
}

impl TryFrom<Model> for RecurringRule {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound(format!("recurring rule {}", model.id)))?,
            user_id: model.user_id,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| LedgerError::NotFound(format!("account {}", model.account_id)))?,
            category_id: model.category_id.and_then(|s| Uuid::parse_str(&s).ok()),
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            next_due_date: model.next_due_date,
            end_date: model.end_date,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
