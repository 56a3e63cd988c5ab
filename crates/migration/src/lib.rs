pub use sea_orm_migration::prelude::*;

mod m20260701_000001_users;
mod m20260701_000002_accounts;
mod m20260701_000003_categories;
mod m20260701_000004_transactions;
mod m20260701_000005_budgets;
mod m20260701_000006_recurring_rules;
mod m20260701_000007_goals;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260701_000001_users::Migration),
            Box::new(m20260701_000002_accounts::Migration),
            Box::new(m20260701_000003_categories::Migration),
            Box::new(m20260701_000004_transactions::Migration),
            Box::new(m20260701_000005_budgets::Migration),
            Box::new(m20260701_000006_recurring_rules::Migration),
            Box::new(m20260701_000007_goals::Migration),
        ]
    }
}
