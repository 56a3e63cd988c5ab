use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Account, AccountKind, CreateAccountCmd, CreateRecurringRuleCmd, Engine, Frequency, MoneyCents,
    TransactionListFilter,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn new_account(engine: &Engine, user: &str, name: &str) -> Account {
    engine
        .create_account(CreateAccountCmd {
            user_id: user.to_string(),
            name: name.to_string(),
            kind: AccountKind::Checking,
            opening_balance: MoneyCents::ZERO,
            currency: "EUR".to_string(),
            description: None,
        })
        .await
        .unwrap()
}

async fn balance_of(engine: &Engine, user: &str, account_id: Uuid) -> MoneyCents {
    engine
        .list_accounts(user)
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
async fn sweep_materializes_due_rule_and_advances() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "alice", "Main").await;

    let rule = engine
        .create_recurring_rule(CreateRecurringRuleCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-900),
            "rent",
            Frequency::Monthly,
            date(2024, 1, 31),
        ))
        .await
        .unwrap();
    assert_eq!(rule.next_due_date, date(2024, 1, 31));

    let report = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 31))
        .await
        .unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].transaction_date, date(2024, 1, 31));
    assert_eq!(transactions[0].recurring_rule_id, Some(rule.id));
    assert_eq!(
        balance_of(&engine, "alice", account.id).await,
        MoneyCents::new(-900)
    );

    // Monthly advancement clamps to the last valid day of February.
    let rules = engine.list_recurring_rules("alice").await.unwrap();
    assert_eq!(rules[0].next_due_date, date(2024, 2, 29));
    assert!(rules[0].is_active);
}

#[tokio::test]
async fn sweep_is_idempotent_within_a_day() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "alice", "Main").await;

    engine
        .create_recurring_rule(CreateRecurringRuleCmd::new(
            "alice",
            account.id,
            MoneyCents::new(1500),
            "salary",
            Frequency::Monthly,
            date(2024, 1, 1),
        ))
        .await
        .unwrap();

    let first = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(first.processed, 1);

    let second = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(second.processed, 0);
    assert_eq!(second.failed, 0);

    assert_eq!(
        balance_of(&engine, "alice", account.id).await,
        MoneyCents::new(1500)
    );
}

#[tokio::test]
async fn rule_deactivates_past_end_date() {
    let (engine, _db) = engine_with_db().await;
    let account = new_account(&engine, "alice", "Main").await;

    engine
        .create_recurring_rule(
            CreateRecurringRuleCmd::new(
                "alice",
                account.id,
                MoneyCents::new(-100),
                "trial subscription",
                Frequency::Weekly,
                date(2024, 1, 1),
            )
            .end_date(date(2024, 1, 5)),
        )
        .await
        .unwrap();

    let report = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(report.processed, 1);

    let transactions = engine
        .list_transactions("alice", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].transaction_date, date(2024, 1, 1));

    let rules = engine.list_recurring_rules("alice").await.unwrap();
    assert!(!rules[0].is_active);

    // Nothing left to process.
    let later = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 8))
        .await
        .unwrap();
    assert_eq!(later.processed, 0);
}

#[tokio::test]
async fn bad_frequency_rule_does_not_abort_the_sweep() {
    let (engine, db) = engine_with_db().await;
    let account = new_account(&engine, "alice", "Main").await;

    engine
        .create_recurring_rule(CreateRecurringRuleCmd::new(
            "alice",
            account.id,
            MoneyCents::new(-50),
            "coffee",
            Frequency::Daily,
            date(2024, 1, 1),
        ))
        .await
        .unwrap();

    // A row with a frequency the engine does not understand.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO recurring_rules \
         (id, user_id, account_id, amount_minor, description, frequency, next_due_date, \
          is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            Uuid::new_v4().to_string().into(),
            "alice".into(),
            account.id.to_string().into(),
            (-75i64).into(),
            "mystery".into(),
            "fortnightly".into(),
            "2024-01-01".into(),
            true.into(),
            "2024-01-01 00:00:00".into(),
            "2024-01-01 00:00:00".into(),
        ],
    ))
    .await
    .unwrap();

    let report = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);

    // Only the valid rule moved money.
    assert_eq!(
        balance_of(&engine, "alice", account.id).await,
        MoneyCents::new(-50)
    );
}

#[tokio::test]
async fn scoped_sweep_leaves_other_users_alone() {
    let (engine, _db) = engine_with_db().await;
    let alice_account = new_account(&engine, "alice", "Main").await;
    let bob_account = new_account(&engine, "bob", "Main").await;

    for (user, account) in [("alice", alice_account.id), ("bob", bob_account.id)] {
        engine
            .create_recurring_rule(CreateRecurringRuleCmd::new(
                user,
                account,
                MoneyCents::new(100),
                "allowance",
                Frequency::Daily,
                date(2024, 1, 1),
            ))
            .await
            .unwrap();
    }

    let report = engine
        .sweep_recurring(Some("alice"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(report.processed, 1);

    assert_eq!(
        balance_of(&engine, "alice", alice_account.id).await,
        MoneyCents::new(100)
    );
    assert_eq!(
        balance_of(&engine, "bob", bob_account.id).await,
        MoneyCents::ZERO
    );
    let bob_rules = engine.list_recurring_rules("bob").await.unwrap();
    assert_eq!(bob_rules[0].next_due_date, date(2024, 1, 1));

    // An unscoped sweep picks up the rest.
    let report = engine.sweep_recurring(None, date(2024, 1, 1)).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(
        balance_of(&engine, "bob", bob_account.id).await,
        MoneyCents::new(100)
    );
}

#[tokio::test]
async fn frequency_advance_clamps_month_end() {
    assert_eq!(
        Frequency::Monthly.advance(date(2024, 1, 31)).unwrap(),
        date(2024, 2, 29)
    );
    assert_eq!(
        Frequency::Yearly.advance(date(2024, 2, 29)).unwrap(),
        date(2025, 2, 28)
    );
    assert_eq!(
        Frequency::Daily.advance(date(2024, 12, 31)).unwrap(),
        date(2025, 1, 1)
    );
    assert_eq!(
        Frequency::Weekly.advance(date(2024, 2, 26)).unwrap(),
        date(2024, 3, 4)
    );
}
