use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Account, AccountKind, BudgetPeriod, BudgetStatusFilter, Category, CategoryKind,
    CreateAccountCmd, CreateBudgetCmd, CreateCategoryCmd, CreateGoalCmd, CreateTransactionCmd,
    Engine, LedgerError, MoneyCents,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn new_account(engine: &Engine, name: &str) -> Account {
    engine
        .create_account(CreateAccountCmd {
            user_id: "alice".to_string(),
            name: name.to_string(),
            kind: AccountKind::Checking,
            opening_balance: MoneyCents::ZERO,
            currency: "EUR".to_string(),
            description: None,
        })
        .await
        .unwrap()
}

async fn new_category(engine: &Engine, name: &str, kind: CategoryKind) -> Category {
    engine
        .create_category(CreateCategoryCmd {
            user_id: "alice".to_string(),
            name: name.to_string(),
            kind,
            color: None,
            parent_id: None,
        })
        .await
        .unwrap()
}

async fn spend(
    engine: &Engine,
    account_id: Uuid,
    category_id: Uuid,
    amount: i64,
    on: NaiveDate,
) {
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                account_id,
                MoneyCents::new(amount),
                "entry",
                on,
            )
            .category_id(category_id),
        )
        .await
        .unwrap();
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn overspend_caps_percentage_at_100() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let food = new_category(&engine, "Food", CategoryKind::Expense).await;

    engine
        .create_budget(CreateBudgetCmd {
            user_id: "alice".to_string(),
            category_id: food.id,
            amount: MoneyCents::new(10000),
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 1, 1),
            end_date: Some(date(2024, 1, 31)),
        })
        .await
        .unwrap();

    spend(&engine, account.id, food.id, -15000, date(2024, 1, 10)).await;

    let statuses = engine
        .budget_status("alice", &BudgetStatusFilter::default())
        .await
        .unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].spent, MoneyCents::new(15000));
    assert_eq!(statuses[0].remaining, MoneyCents::new(-5000));
    assert_eq!(statuses[0].percentage_used, 100.0);
    assert_eq!(statuses[0].category_name, "Food");
}

#[tokio::test]
async fn partial_spend_reports_exact_percentage() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let fun = new_category(&engine, "Entertainment", CategoryKind::Expense).await;

    engine
        .create_budget(CreateBudgetCmd {
            user_id: "alice".to_string(),
            category_id: fun.id,
            amount: MoneyCents::new(10000),
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 1, 1),
            end_date: None,
        })
        .await
        .unwrap();

    spend(&engine, account.id, fun.id, -2500, date(2024, 1, 5)).await;

    let statuses = engine
        .budget_status("alice", &BudgetStatusFilter::default())
        .await
        .unwrap();
    assert_eq!(statuses[0].spent, MoneyCents::new(2500));
    assert_eq!(statuses[0].remaining, MoneyCents::new(7500));
    assert_eq!(statuses[0].percentage_used, 25.0);
}

#[tokio::test]
async fn window_excludes_outside_transactions() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let food = new_category(&engine, "Food", CategoryKind::Expense).await;

    engine
        .create_budget(CreateBudgetCmd {
            user_id: "alice".to_string(),
            category_id: food.id,
            amount: MoneyCents::new(5000),
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 2, 1),
            end_date: Some(date(2024, 2, 29)),
        })
        .await
        .unwrap();

    spend(&engine, account.id, food.id, -1000, date(2024, 1, 31)).await;
    spend(&engine, account.id, food.id, -2000, date(2024, 2, 1)).await;
    spend(&engine, account.id, food.id, -3000, date(2024, 2, 29)).await;
    spend(&engine, account.id, food.id, -4000, date(2024, 3, 1)).await;

    let statuses = engine
        .budget_status("alice", &BudgetStatusFilter::default())
        .await
        .unwrap();
    assert_eq!(statuses[0].spent, MoneyCents::new(5000));
}

#[tokio::test]
async fn budget_requires_existing_category_and_positive_amount() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_budget(CreateBudgetCmd {
            user_id: "alice".to_string(),
            category_id: Uuid::new_v4(),
            amount: MoneyCents::new(1000),
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 1, 1),
            end_date: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    let food = new_category(&engine, "Food", CategoryKind::Expense).await;
    let err = engine
        .create_budget(CreateBudgetCmd {
            user_id: "alice".to_string(),
            category_id: food.id,
            amount: MoneyCents::ZERO,
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 1, 1),
            end_date: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
}

#[tokio::test]
async fn summary_splits_income_and_expenses() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let salary = new_category(&engine, "Salary", CategoryKind::Income).await;
    let food = new_category(&engine, "Food", CategoryKind::Expense).await;

    spend(&engine, account.id, salary.id, 300000, date(2024, 1, 1)).await;
    spend(&engine, account.id, food.id, -45000, date(2024, 1, 10)).await;

    // Uncategorized activity moves the balance but not the totals.
    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-5000),
            "cash withdrawal",
            date(2024, 1, 15),
        ))
        .await
        .unwrap();

    engine
        .create_goal(CreateGoalCmd {
            user_id: "alice".to_string(),
            name: "Emergency fund".to_string(),
            target_amount: MoneyCents::new(1000000),
            target_date: None,
            description: None,
        })
        .await
        .unwrap();

    let summary = engine
        .financial_summary("alice", None, None)
        .await
        .unwrap();

    assert_eq!(summary.income, MoneyCents::new(300000));
    assert_eq!(summary.expenses, MoneyCents::new(45000));
    assert_eq!(summary.net, MoneyCents::new(255000));
    assert_eq!(
        summary.account_balances.get("Main"),
        Some(&MoneyCents::new(250000))
    );
    assert_eq!(summary.goals.len(), 1);
}

#[tokio::test]
async fn summary_window_bounds_totals() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let salary = new_category(&engine, "Salary", CategoryKind::Income).await;

    spend(&engine, account.id, salary.id, 1000, date(2024, 1, 1)).await;
    spend(&engine, account.id, salary.id, 2000, date(2024, 2, 1)).await;

    let summary = engine
        .financial_summary("alice", Some(date(2024, 2, 1)), None)
        .await
        .unwrap();

    assert_eq!(summary.income, MoneyCents::new(2000));
    // Balances are point-in-time, not windowed.
    assert_eq!(
        summary.account_balances.get("Main"),
        Some(&MoneyCents::new(3000))
    );
}
