use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{CreateGoalCmd, Goal, LedgerError, ResultLedger, UpdateGoalCmd, goals};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a savings goal starting at zero progress.
    pub async fn create_goal(&self, cmd: CreateGoalCmd) -> ResultLedger<Goal> {
        let goal = Goal::new(
            cmd.user_id,
            cmd.name,
            cmd.target_amount,
            cmd.target_date,
            cmd.description,
        )?;
        goals::ActiveModel::from(&goal).insert(&self.database).await?;
        Ok(goal)
    }

    /// Partially updates a goal. Progress (`current_amount`) is settable
    /// directly; goals are not wired to the transaction ledger.
    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultLedger<Goal> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(LedgerError::InvalidArgument(
                    "goal name must not be empty".to_string(),
                ));
            }
        }
        if let Some(target) = cmd.target_amount {
            if !target.is_positive() {
                return Err(LedgerError::InvalidArgument(
                    "goal target amount must be > 0".to_string(),
                ));
            }
        }
        with_tx!(self, |db_tx| {
            let current = goals::Entity::find_by_id(cmd.goal_id.to_string())
                .filter(goals::Column::UserId.eq(cmd.user_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("goal {}", cmd.goal_id)))?;

            let mut active = goals::ActiveModel {
                id: ActiveValue::Set(current.id.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(name) = cmd.name {
                active.name = ActiveValue::Set(name.trim().to_string());
            }
            if let Some(target) = cmd.target_amount {
                active.target_amount_minor = ActiveValue::Set(target.cents());
            }
            if let Some(progress) = cmd.current_amount {
                active.current_amount_minor = ActiveValue::Set(progress.cents());
            }
            if cmd.target_date.is_change() {
                active.target_date = ActiveValue::Set(cmd.target_date.apply(current.target_date));
            }
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if cmd.description.is_change() {
                active.description =
                    ActiveValue::Set(cmd.description.apply(current.description.clone()));
            }
            let updated = active.update(&db_tx).await?;
            Goal::try_from(updated)
        })
    }

    /// Lists a user's goals by name.
    pub async fn list_goals(&self, user_id: &str) -> ResultLedger<Vec<Goal>> {
        goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }
}
