//! Recurrence ops: rule CRUD and the due-date sweep.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    CreateRecurringRuleCmd, Frequency, LedgerError, MoneyCents, RecurringRule, ResultLedger,
    Transaction, recurring,
};

use super::{Engine, with_tx};

/// Outcome of one sweep pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Rules materialized into a transaction.
    pub processed: u64,
    /// Rules skipped after an error; the rest of the sweep continued.
    pub failed: u64,
}

impl Engine {
    /// Creates a recurring rule. `next_due_date` starts at the rule's
    /// start date, so the first sweep on or after it fires immediately.
    pub async fn create_recurring_rule(
        &self,
        cmd: CreateRecurringRuleCmd,
    ) -> ResultLedger<RecurringRule> {
        let rule = RecurringRule::new(
            cmd.user_id,
            cmd.account_id,
            cmd.category_id,
            cmd.amount,
            cmd.description,
            cmd.frequency,
            cmd.start_date,
            cmd.end_date,
        )?;
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, &rule.user_id, rule.account_id)
                .await?;
            if let Some(category_id) = rule.category_id {
                self.require_category(&db_tx, &rule.user_id, category_id)
                    .await?;
            }
            recurring::ActiveModel::from(&rule).insert(&db_tx).await?;
            Ok(rule)
        })
    }

    /// Lists a user's recurring rules, soonest due first.
    pub async fn list_recurring_rules(&self, user_id: &str) -> ResultLedger<Vec<RecurringRule>> {
        recurring::Entity::find()
            .filter(recurring::Column::UserId.eq(user_id))
            .order_by_asc(recurring::Column::NextDueDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(RecurringRule::try_from)
            .collect()
    }

    /// Materializes every active rule due on or before `today`.
    ///
    /// `scope` limits the sweep to one user; `None` sweeps all users. Each
    /// rule runs in its own DB transaction, so a failing rule is counted and
    /// logged without touching the others. `next_due_date` strictly
    /// increases on success, which makes a second sweep the same day process
    /// nothing.
    pub async fn sweep_recurring(
        &self,
        scope: Option<&str>,
        today: NaiveDate,
    ) -> ResultLedger<SweepReport> {
        let mut query = recurring::Entity::find()
            .filter(recurring::Column::IsActive.eq(true))
            .filter(recurring::Column::NextDueDate.lte(today))
            .order_by_asc(recurring::Column::NextDueDate);
        if let Some(user_id) = scope {
            query = query.filter(recurring::Column::UserId.eq(user_id));
        }
        let due = query.all(&self.database).await?;

        let mut report = SweepReport::default();
        for rule in due {
            match self.materialize_rule(&rule).await {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    tracing::warn!(rule_id = %rule.id, error = %err, "recurring rule skipped");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(
            processed = report.processed,
            failed = report.failed,
            %today,
            "recurring sweep finished"
        );
        Ok(report)
    }

    /// Turns one due rule into a transaction and advances its due date.
    async fn materialize_rule(&self, rule: &recurring::Model) -> ResultLedger<()> {
        let frequency = Frequency::try_from(rule.frequency.as_str())?;
        let account_id = Uuid::parse_str(&rule.account_id)
            .map_err(|_| LedgerError::NotFound(format!("account {}", rule.account_id)))?;
        let category_id = rule
            .category_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| LedgerError::InvalidArgument("malformed category id".to_string()))?;
        let rule_id = Uuid::parse_str(&rule.id)
            .map_err(|_| LedgerError::InvalidArgument("malformed rule id".to_string()))?;

        let tx = Transaction::new(
            rule.user_id.clone(),
            account_id,
            category_id,
            MoneyCents::new(rule.amount_minor),
            rule.description.clone(),
            rule.next_due_date,
            Some(rule_id),
        )?;
        let advanced = frequency.advance(rule.next_due_date)?;
        let still_active = match rule.end_date {
            Some(end) => advanced <= end,
            None => true,
        };

        with_tx!(self, |db_tx| {
            self.insert_transaction_tx(&db_tx, &tx).await?;
            let model = recurring::ActiveModel {
                id: ActiveValue::Set(rule.id.clone()),
                next_due_date: ActiveValue::Set(advanced),
                is_active: ActiveValue::Set(still_active),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }
}
