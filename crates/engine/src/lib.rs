pub use accounts::{Account, AccountKind};
pub use budgets::{Budget, BudgetPeriod};
pub use categories::{Category, CategoryKind};
pub use commands::{
    CreateAccountCmd, CreateBudgetCmd, CreateCategoryCmd, CreateGoalCmd, CreateRecurringRuleCmd,
    CreateTransactionCmd, Patch, UpdateAccountCmd, UpdateBudgetCmd, UpdateGoalCmd,
    UpdateTransactionCmd,
};
pub use error::LedgerError;
pub use goals::{Goal, GoalStatus};
pub use money::MoneyCents;
pub use ops::{
    BudgetStatus, BudgetStatusFilter, Engine, EngineBuilder, FinancialSummary, SweepReport,
    TransactionListFilter,
};
pub use recurring::{Frequency, RecurringRule};
pub use transactions::Transaction;

mod accounts;
mod budgets;
mod categories;
mod commands;
mod error;
mod goals;
mod money;
mod ops;
mod recurring;
mod transactions;

type ResultLedger<T> = Result<T, LedgerError>;
