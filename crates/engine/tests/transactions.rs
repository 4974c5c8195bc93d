use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AccountKind, CategoryKind, CreateAccountCmd, CreateCategoryCmd, CreateTransactionCmd,
    Direction, Engine, EngineError, MoneyCents, TransactionListFilter, UpdateAccountCmd,
    UpdateTransactionCmd,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn cents(value: i64) -> MoneyCents {
    MoneyCents::new(value)
}

async fn open_account(engine: &Engine, user: &str, balance: i64) -> Uuid {
    engine
        .create_account(
            CreateAccountCmd::new(user, "Main", "EUR", AccountKind::Card)
                .initial_balance(cents(balance)),
        )
        .await
        .unwrap()
        .id
}

async fn balance(engine: &Engine, user: &str, account_id: Uuid) -> MoneyCents {
    engine.account(user, account_id).await.unwrap().balance
}

async fn count(engine: &Engine, user: &str) -> usize {
    engine
        .list_transactions(user, &TransactionListFilter::default(), None, 100)
        .await
        .unwrap()
        .items
        .len()
}

fn outgoing(user: &str, account_id: Uuid, amount: i64) -> CreateTransactionCmd {
    CreateTransactionCmd::new(user, account_id, Direction::Out, cents(amount), Utc::now())
}

fn incoming(user: &str, account_id: Uuid, amount: i64) -> CreateTransactionCmd {
    CreateTransactionCmd::new(user, account_id, Direction::In, cents(amount), Utc::now())
}

#[tokio::test]
async fn balance_tracks_create_update_delete() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;

    let salary = engine
        .create_transaction(incoming("alice", account, 1500_00).note("salary"))
        .await
        .unwrap();
    let rent = engine
        .create_transaction(outgoing("alice", account, 700_00))
        .await
        .unwrap();
    let coffee = engine
        .create_transaction(outgoing("alice", account, 3_50))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", account).await, cents(896_50));

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", rent.id).amount(cents(750_00)))
        .await
        .unwrap();
    engine
        .update_transaction(UpdateTransactionCmd::new("alice", salary.id).amount(cents(1400_00)))
        .await
        .unwrap();
    engine.delete_transaction("alice", coffee.id).await.unwrap();

    // 100 + 1400 - 750
    assert_eq!(balance(&engine, "alice", account).await, cents(750_00));
    assert_eq!(count(&engine, "alice").await, 2);
}

#[tokio::test]
async fn overdraft_is_rejected_without_side_effects() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 50_00).await;

    let err = engine
        .create_transaction(outgoing("alice", account, 50_01))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::InsufficientFunds(account.to_string()));
    assert_eq!(balance(&engine, "alice", account).await, cents(50_00));
    assert_eq!(count(&engine, "alice").await, 0);
}

#[tokio::test]
async fn spending_the_whole_balance_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 50_00).await;

    engine
        .create_transaction(outgoing("alice", account, 50_00))
        .await
        .unwrap();

    assert_eq!(balance(&engine, "alice", account).await, MoneyCents::ZERO);
}

#[tokio::test]
async fn permissive_mode_lets_balances_go_negative() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .enforce_non_negative(false)
        .build()
        .await
        .unwrap();
    let account = open_account(&engine, "alice", 10_00).await;

    engine
        .create_transaction(outgoing("alice", account, 25_00))
        .await
        .unwrap();

    assert_eq!(balance(&engine, "alice", account).await, cents(-15_00));
}

#[tokio::test]
async fn direction_cannot_change() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", account, 20_00).note("lunch"))
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id)
                .direction(Direction::In)
                .amount(cents(5_00))
                .note("dinner"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Conflict(_)));
    assert_eq!(engine.transaction("alice", tx.id).await.unwrap(), tx);
    assert_eq!(balance(&engine, "alice", account).await, cents(80_00));
}

#[tokio::test]
async fn repeating_the_stored_direction_is_accepted() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", account, 20_00))
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx.id)
                .direction(Direction::Out)
                .amount(cents(30_00)),
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, cents(30_00));
    assert_eq!(balance(&engine, "alice", account).await, cents(70_00));
}

#[tokio::test]
async fn income_category_rejects_outgoing_transaction() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let salary = engine
        .create_category(CreateCategoryCmd::new("alice", "Salary", CategoryKind::Income))
        .await
        .unwrap();

    let err = engine
        .create_transaction(outgoing("alice", account, 10_00).category_id(salary.id))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(balance(&engine, "alice", account).await, cents(100_00));
    assert_eq!(count(&engine, "alice").await, 0);
}

#[tokio::test]
async fn update_revalidates_the_effective_category() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let food = engine
        .create_category(CreateCategoryCmd::new("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();
    let salary = engine
        .create_category(CreateCategoryCmd::new("alice", "Salary", CategoryKind::Income))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(outgoing("alice", account, 10_00).category_id(food.id))
        .await
        .unwrap();

    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).category_id(salary.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine.archive_category("alice", food.id).await.unwrap();
    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).amount(cents(12_00)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));
}

#[tokio::test]
async fn missing_or_foreign_references_are_not_found() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let bobs_category = engine
        .create_category(CreateCategoryCmd::new("bob", "Food", CategoryKind::Expense))
        .await
        .unwrap();

    let err = engine
        .create_transaction(outgoing("bob", account, 1_00))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("account".to_string()));

    let err = engine
        .create_transaction(outgoing("alice", account, 1_00).category_id(bobs_category.id))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));

    let err = engine
        .delete_transaction("alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));
}

#[tokio::test]
async fn archived_account_rejects_new_transactions() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    engine
        .update_account(
            "alice",
            account,
            UpdateAccountCmd {
                archived: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = engine
        .create_transaction(incoming("alice", account, 1_00))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::NotFound("account".to_string()));
}

#[tokio::test]
async fn transactions_on_an_archived_account_stay_editable() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let spare = open_account(&engine, "alice", 0).await;
    let tx = engine
        .create_transaction(outgoing("alice", account, 10_00).note("typo"))
        .await
        .unwrap();
    engine
        .update_account(
            "alice",
            account,
            UpdateAccountCmd {
                archived: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).note("fixed typo"))
        .await
        .unwrap();
    assert_eq!(updated.note.as_deref(), Some("fixed typo"));
    assert_eq!(updated.account_id, account);

    let updated = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).amount(cents(15_00)))
        .await
        .unwrap();
    assert_eq!(updated.amount, cents(15_00));
    assert_eq!(balance(&engine, "alice", account).await, cents(85_00));

    // Moving onto an archived account is still refused.
    engine
        .update_account(
            "alice",
            spare,
            UpdateAccountCmd {
                archived: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).account_id(spare))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("account".to_string()));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;

    for amount in [0, -5_00] {
        let err = engine
            .create_transaction(incoming("alice", account, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn notes_are_trimmed_and_bounded() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;

    let tx = engine
        .create_transaction(incoming("alice", account, 1_00).note("  refund  "))
        .await
        .unwrap();
    assert_eq!(tx.note.as_deref(), Some("refund"));

    let err = engine
        .create_transaction(incoming("alice", account, 1_00).note("x".repeat(501)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let cleared = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).note(" "))
        .await
        .unwrap();
    assert_eq!(cleared.note, None);
}

#[tokio::test]
async fn delete_restores_the_exact_balance() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 500_00).await;

    let tx = engine
        .create_transaction(outgoing("alice", account, 100_00))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", account).await, cents(400_00));

    engine.delete_transaction("alice", tx.id).await.unwrap();

    assert_eq!(balance(&engine, "alice", account).await, cents(500_00));
    let err = engine.transaction("alice", tx.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));
}

#[tokio::test]
async fn delete_reversal_ignores_the_floor() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 0).await;
    let income = engine
        .create_transaction(incoming("alice", account, 100_00))
        .await
        .unwrap();
    engine
        .create_transaction(outgoing("alice", account, 80_00))
        .await
        .unwrap();

    engine.delete_transaction("alice", income.id).await.unwrap();

    assert_eq!(balance(&engine, "alice", account).await, cents(-80_00));
}

#[tokio::test]
async fn amount_increase_is_floored_at_zero() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", account, 60_00))
        .await
        .unwrap();

    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).amount(cents(100_01)))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::InsufficientFunds(account.to_string()));
    assert_eq!(engine.transaction("alice", tx.id).await.unwrap().amount, cents(60_00));
    assert_eq!(balance(&engine, "alice", account).await, cents(40_00));
}

#[tokio::test]
async fn moving_to_another_account_shifts_the_effect() {
    let (engine, _db) = engine_with_db().await;
    let a = open_account(&engine, "alice", 250_00).await;
    let b = open_account(&engine, "alice", 300_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", a, 50_00))
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice", a).await, cents(200_00));

    let moved = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).account_id(b))
        .await
        .unwrap();

    assert_eq!(moved.account_id, b);
    assert_eq!(balance(&engine, "alice", a).await, cents(250_00));
    assert_eq!(balance(&engine, "alice", b).await, cents(250_00));
}

#[tokio::test]
async fn failed_account_move_rolls_back_both_accounts() {
    let (engine, _db) = engine_with_db().await;
    let a = open_account(&engine, "alice", 250_00).await;
    let b = open_account(&engine, "alice", 30_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", a, 50_00))
        .await
        .unwrap();

    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx.id).account_id(b))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::InsufficientFunds(b.to_string()));
    assert_eq!(balance(&engine, "alice", a).await, cents(200_00));
    assert_eq!(balance(&engine, "alice", b).await, cents(30_00));
    assert_eq!(engine.transaction("alice", tx.id).await.unwrap().account_id, a);
}

#[tokio::test]
async fn concurrent_debits_never_overdraw() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;

    let (first, second) = tokio::join!(
        engine.create_transaction(outgoing("alice", account, 80_00)),
        engine.create_transaction(outgoing("alice", account, 80_00)),
    );

    let failures = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(EngineError::InsufficientFunds(_))))
        .count();
    assert_eq!(failures, 1);
    assert!(first.is_ok() || second.is_ok());
    assert_eq!(balance(&engine, "alice", account).await, cents(20_00));
    assert_eq!(count(&engine, "alice").await, 1);
}

#[tokio::test]
async fn pagination_visits_every_row_once() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 0).await;
    for i in 0..150 {
        engine
            .create_transaction(incoming("alice", account, 1_00 + i))
            .await
            .unwrap();
    }

    let filter = TransactionListFilter::default();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    for page_no in 0..3 {
        let page = engine
            .list_transactions("alice", &filter, cursor.as_deref(), 50)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 50);
        for window in page.items.windows(2) {
            assert!((window[0].created_at, window[0].id) > (window[1].created_at, window[1].id));
        }
        seen.extend(page.items.iter().map(|tx| tx.id));
        assert_eq!(page.next_cursor.is_some(), page_no < 2);
        cursor = page.next_cursor;
    }
    assert_eq!(seen.len(), 150);
}

#[tokio::test]
async fn last_page_has_no_cursor() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 0).await;
    for _ in 0..3 {
        engine
            .create_transaction(incoming("alice", account, 1_00))
            .await
            .unwrap();
    }

    let page = engine
        .list_transactions("alice", &TransactionListFilter::default(), None, 2)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    let cursor = page.next_cursor.unwrap();

    let page = engine
        .list_transactions("alice", &TransactionListFilter::default(), Some(&cursor), 2)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn limit_is_clamped() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 0).await;
    for _ in 0..2 {
        engine
            .create_transaction(incoming("alice", account, 1_00))
            .await
            .unwrap();
    }

    let page = engine
        .list_transactions("alice", &TransactionListFilter::default(), None, 0)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.next_cursor.is_some());
}

#[tokio::test]
async fn malformed_cursor_is_a_validation_class_error() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .list_transactions("alice", &TransactionListFilter::default(), Some("not a cursor"), 10)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidCursor(_)));
}

#[tokio::test]
async fn list_filters_are_conjunctive() {
    let (engine, _db) = engine_with_db().await;
    let a = open_account(&engine, "alice", 1000_00).await;
    let b = open_account(&engine, "alice", 1000_00).await;
    let food = engine
        .create_category(CreateCategoryCmd::new("alice", "Food", CategoryKind::Expense))
        .await
        .unwrap();
    let march = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let april = Utc.with_ymd_and_hms(2026, 4, 10, 12, 0, 0).unwrap();

    let pizza = engine
        .create_transaction(
            CreateTransactionCmd::new("alice", a, Direction::Out, cents(20_00), march)
                .category_id(food.id)
                .note("Pizza night"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", a, Direction::Out, cents(80_00), march)
                .category_id(food.id)
                .note("Groceries"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", b, Direction::Out, cents(20_00), march)
                .category_id(food.id)
                .note("pizza again"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            CreateTransactionCmd::new("alice", a, Direction::Out, cents(20_00), april)
                .note("pizza in april"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(CreateTransactionCmd::new("alice", a, Direction::In, cents(20_00), march))
        .await
        .unwrap();
    engine
        .create_transaction(incoming("bob", open_account(&engine, "bob", 0).await, 20_00))
        .await
        .unwrap();

    let filter = TransactionListFilter {
        account_id: Some(a),
        category_id: Some(food.id),
        direction: Some(Direction::Out),
        from: Some(march - Duration::days(9)),
        to: Some(march + Duration::days(10)),
        min_amount: Some(cents(10_00)),
        max_amount: Some(cents(50_00)),
        search: Some("pizza".to_string()),
    };
    let page = engine
        .list_transactions("alice", &filter, None, 100)
        .await
        .unwrap();

    assert_eq!(page.items, vec![pizza]);
}

#[tokio::test]
async fn users_never_see_each_other() {
    let (engine, _db) = engine_with_db().await;
    let account = open_account(&engine, "alice", 100_00).await;
    let tx = engine
        .create_transaction(outgoing("alice", account, 10_00))
        .await
        .unwrap();

    assert_eq!(count(&engine, "bob").await, 0);
    let err = engine
        .update_transaction(UpdateTransactionCmd::new("bob", tx.id).amount(cents(1_00)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));
    let err = engine.account("bob", account).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("account".to_string()));
}
