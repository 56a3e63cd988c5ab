//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Partial updates distinguish
//! "leave the field alone" from "clear the field" with [`Patch`] instead of
//! overloading `Option`.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{AccountKind, BudgetPeriod, Frequency, GoalStatus, MoneyCents};

/// Tri-state patch for a nullable field in a partial update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not provided; keep the stored value.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Explicitly clear the stored value.
    Clear,
}

impl<T> Patch<T> {
    /// Resolves the patch against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    /// Returns `true` unless the patch is `Keep`.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Keep)
    }
}

/// Create a new account.
#[derive(Clone, Debug)]
pub struct CreateAccountCmd {
    pub user_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub opening_balance: MoneyCents,
    pub currency: String,
    pub description: Option<String>,
}

/// Partially update an account. `None` fields are left alone.
#[derive(Clone, Debug)]
pub struct UpdateAccountCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub currency: Option<String>,
    pub description: Patch<String>,
    pub is_active: Option<bool>,
}

impl UpdateAccountCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, account_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            name: None,
            kind: None,
            currency: None,
            description: Patch::Keep,
            is_active: None,
        }
    }
}

/// Create a new category.
#[derive(Clone, Debug)]
pub struct CreateCategoryCmd {
    pub user_id: String,
    pub name: String,
    pub kind: crate::CategoryKind,
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Create a transaction against one account.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub description: String,
    pub transaction_date: NaiveDate,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_id: Uuid,
        amount: MoneyCents,
        description: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            category_id: None,
            amount,
            description: description.into(),
            transaction_date,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Partially update an existing transaction.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,

    pub account_id: Option<Uuid>,
    pub amount: Option<MoneyCents>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub category_id: Patch<Uuid>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            account_id: None,
            amount: None,
            description: None,
            transaction_date: None,
            category_id: Patch::Keep,
        }
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn transaction_date(mut self, transaction_date: NaiveDate) -> Self {
        self.transaction_date = Some(transaction_date);
        self
    }

    #[must_use]
    pub fn category_id(mut self, patch: Patch<Uuid>) -> Self {
        self.category_id = patch;
        self
    }
}

/// Create a new budget for an expense category.
#[derive(Clone, Debug)]
pub struct CreateBudgetCmd {
    pub user_id: String,
    pub category_id: Uuid,
    pub amount: MoneyCents,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Partially update a budget.
#[derive(Clone, Debug)]
pub struct UpdateBudgetCmd {
    pub user_id: String,
    pub budget_id: Uuid,
    pub amount: Option<MoneyCents>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Patch<NaiveDate>,
}

impl UpdateBudgetCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, budget_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            budget_id,
            amount: None,
            period: None,
            start_date: None,
            end_date: Patch::Keep,
        }
    }
}

/// Create a recurring rule.
#[derive(Clone, Debug)]
pub struct CreateRecurringRuleCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: MoneyCents,
    pub description: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CreateRecurringRuleCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_id: Uuid,
        amount: MoneyCents,
        description: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            category_id: None,
            amount,
            description: description.into(),
            frequency,
            start_date,
            end_date: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct CreateGoalCmd {
    pub user_id: String,
    pub name: String,
    pub target_amount: MoneyCents,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Partially update a goal. `current_amount` is independently settable.
#[derive(Clone, Debug)]
pub struct UpdateGoalCmd {
    pub user_id: String,
    pub goal_id: Uuid,
    pub name: Option<String>,
    pub target_amount: Option<MoneyCents>,
    pub current_amount: Option<MoneyCents>,
    pub target_date: Patch<NaiveDate>,
    pub status: Option<GoalStatus>,
    pub description: Patch<String>,
}

impl UpdateGoalCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, goal_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            goal_id,
            name: None,
            target_amount: None,
            current_amount: None,
            target_date: Patch::Keep,
            status: None,
            description: Patch::Keep,
        }
    }
}
