//! Whole-picture aggregation across accounts, budgets, and goals.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{CategoryKind, Goal, MoneyCents, ResultLedger, categories, transactions};

use super::{BudgetStatus, BudgetStatusFilter, Engine};

/// Read-only snapshot of a user's finances, computed fresh per call.
#[derive(Clone, Debug, PartialEq)]
pub struct FinancialSummary {
    /// Sum of transactions in income-kind categories over the window.
    pub income: MoneyCents,
    /// Sum of outflows in expense-kind categories, as a positive figure.
    pub expenses: MoneyCents,
    /// `income - expenses`.
    pub net: MoneyCents,
    /// Account name to current balance. Duplicate names keep the last one.
    pub account_balances: HashMap<String, MoneyCents>,
    pub budget_status: Vec<BudgetStatus>,
    pub goals: Vec<Goal>,
}

impl Engine {
    /// Builds the financial summary for one user.
    ///
    /// Uncategorized transactions move balances but are excluded from the
    /// income and expense totals, which only count categorized activity.
    pub async fn financial_summary(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ResultLedger<FinancialSummary> {
        let mut kinds = HashMap::new();
        for category in categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
        {
            kinds.insert(category.id, CategoryKind::try_from(category.kind.as_str())?);
        }

        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
        if let Some(start) = start {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }

        let mut income: i64 = 0;
        let mut expenses: i64 = 0;
        for tx in query.all(&self.database).await? {
            let Some(category_id) = &tx.category_id else {
                continue;
            };
            match kinds.get(category_id) {
                Some(CategoryKind::Income) => income += tx.amount_minor,
                Some(CategoryKind::Expense) => expenses -= tx.amount_minor,
                None => {}
            }
        }
        let income = MoneyCents::new(income);
        let expenses = MoneyCents::new(expenses);

        let account_balances = self
            .list_accounts(user_id)
            .await?
            .into_iter()
            .map(|account| (account.name, account.balance))
            .collect();

        Ok(FinancialSummary {
            income,
            expenses,
            net: income - expenses,
            account_balances,
            budget_status: self
                .budget_status(user_id, &BudgetStatusFilter::default())
                .await?,
            goals: self.list_goals(user_id).await?,
        })
    }
}
