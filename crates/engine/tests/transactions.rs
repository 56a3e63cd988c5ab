use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Account, AccountKind, CategoryKind, CreateAccountCmd, CreateCategoryCmd, CreateTransactionCmd,
    Engine, LedgerError, MoneyCents, Patch, TransactionListFilter, UpdateTransactionCmd,
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

async fn balance_of(engine: &Engine, account_id: Uuid) -> MoneyCents {
    engine
        .list_accounts("alice")
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.id == account_id)
        .expect("account missing")
        .balance
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn create_transaction_moves_balance() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(1000),
            "salary",
            date(2024, 1, 15),
        ))
        .await
        .unwrap();

    assert_eq!(tx.amount, MoneyCents::new(1000));
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(1000));

    engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-250),
            "groceries",
            date(2024, 1, 16),
        ))
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(750));
}

#[tokio::test]
async fn create_against_missing_account_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            Uuid::new_v4(),
            MoneyCents::new(1000),
            "nope",
            date(2024, 1, 1),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::ZERO,
            "nothing",
            date(2024, 1, 1),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::ZERO);
}

#[tokio::test]
async fn update_amount_applies_delta() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-4000),
            "rent",
            date(2024, 2, 1),
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(-4000));

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id).amount(MoneyCents::new(-4500)),
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, MoneyCents::new(-4500));
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(-4500));
}

#[tokio::test]
async fn moving_transaction_reconciles_both_accounts() {
    let (engine, _db) = engine_with_db().await;
    let checking = new_account(&engine, "Checking").await;
    let savings = new_account(&engine, "Savings").await;

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            checking.id,
            MoneyCents::new(2000),
            "bonus",
            date(2024, 3, 1),
        ))
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).account_id(savings.id))
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, checking.id).await, MoneyCents::ZERO);
    assert_eq!(balance_of(&engine, savings.id).await, MoneyCents::new(2000));
}

#[tokio::test]
async fn update_to_missing_account_leaves_everything_untouched() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(500),
            "coffee fund",
            date(2024, 4, 1),
        ))
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id)
                .account_id(Uuid::new_v4())
                .amount(MoneyCents::new(999)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(500));
    let listed = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, MoneyCents::new(500));
}

#[tokio::test]
async fn delete_reverts_balance() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-1234),
            "mistake",
            date(2024, 5, 1),
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(-1234));

    engine.delete_transaction("alice", tx.id).await.unwrap();

    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::ZERO);
    let listed = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());

    let err = engine.delete_transaction("alice", tx.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn category_patch_sets_and_clears() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "Main").await;
    let category = engine
        .create_category(CreateCategoryCmd {
            user_id: "alice".to_string(),
            name: "Groceries".to_string(),
            kind: CategoryKind::Expense,
            color: None,
            parent_id: None,
        })
        .await
        .unwrap();

    let tx = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-300),
            "food",
            date(2024, 6, 1),
        ))
        .await
        .unwrap();
    assert_eq!(tx.category_id, None);

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id).category_id(Patch::Set(category.id)),
        )
        .await
        .unwrap();
    assert_eq!(updated.category_id, Some(category.id));

    let cleared = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id).category_id(Patch::Clear),
        )
        .await
        .unwrap();
    assert_eq!(cleared.category_id, None);

    // Balance untouched by category-only edits.
    assert_eq!(balance_of(&engine, account.id).await, MoneyCents::new(-300));
}

#[tokio::test]
async fn list_filters_by_account_and_window() {
    let (engine, _db) = engine_with_db().await;
    let checking = new_account(&engine, "Checking").await;
    let savings = new_account(&engine, "Savings").await;

    for (account, amount, day) in [
        (checking.id, 100, 1),
        (checking.id, -200, 10),
        (savings.id, 300, 20),
    ] {
        engine
            .create_transaction(CreateTransactionCmd::new(
                "alice",
                account,
                MoneyCents::new(amount),
                "entry",
                date(2024, 7, day),
            ))
            .await
            .unwrap();
    }

    let filter = TransactionListFilter {
        account_id: Some(checking.id),
        ..Default::default()
    };
    let checking_only = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(checking_only.len(), 2);

    let filter = TransactionListFilter {
        from: Some(date(2024, 7, 5)),
        to: Some(date(2024, 7, 25)),
        ..Default::default()
    };
    let windowed = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(windowed.len(), 2);
    // Newest first.
    assert_eq!(windowed[0].transaction_date, date(2024, 7, 20));
}
