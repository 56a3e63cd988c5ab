//! Savings goal primitives.
//!
//! `current_amount` is independently settable; nothing derives it from
//! transactions.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            other => Err(LedgerError::InvalidArgument(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_amount: MoneyCents,
    pub current_amount: MoneyCents,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        user_id: String,
        name: String,
        target_amount: MoneyCents,
        target_date: Option<NaiveDate>,
        description: Option<String>,
    ) -> ResultLedger<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "goal name must not be empty".to_string(),
            ));
        }
        if !target_amount.is_positive() {
            return Err(LedgerError::InvalidArgument(
                "goal target amount must be > 0".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_amount,
            current_amount: MoneyCents::ZERO,
            target_date,
            status: GoalStatus::Active,
            description,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub target_date: Option<Date>,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount.cents()),
            current_amount_minor: ActiveValue::Set(goal.current_amount.cents()),
            target_date: ActiveValue::Set(goal.target_date),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            description: ActiveValue::Set(goal.description.clone()),
            created_at: ActiveValue::Set(goal.created_at),
            updated_at: ActiveValue::Set(goal.updated_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound(format!("goal {}", model.id)))?,
            user_id: model.user_id,
            name: model.name,
            target_amount: MoneyCents::new(model.target_amount_minor),
            current_amount: MoneyCents::new(model.current_amount_minor),
            target_date: model.target_date,
            status: GoalStatus::try_from(model.status.as_str())?,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
