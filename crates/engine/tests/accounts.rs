use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

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

async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table};"),
        ))
        .await
        .unwrap();
    row.unwrap().try_get("", "n").unwrap()
}

#[tokio::test]
async fn ensure_account_creates_with_zero_balances() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap();

    let account = engine.account("guild1", "alice").await.unwrap();
    assert_eq!(account.id, id);
    assert_eq!(account.cash, 0);
    assert_eq!(account.bank, 0);
    assert_eq!(account.display_name, "Alice");
}

#[tokio::test]
async fn ensure_account_is_idempotent() {
    let (engine, db) = engine_with_db().await;

    let first = engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap();
    let second = engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(count_rows(&db, "accounts").await, 1);
}

#[tokio::test]
async fn ensure_account_refreshes_display_name() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap();
    let same = engine
        .ensure_account("guild1", "alice", "Alice the Brave")
        .await
        .unwrap();

    assert_eq!(id, same);
    let account = engine.account("guild1", "alice").await.unwrap();
    assert_eq!(account.display_name, "Alice the Brave");
}

#[tokio::test]
async fn accounts_are_scoped_per_community() {
    let (engine, db) = engine_with_db().await;

    let in_guild1 = engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap();
    let in_guild2 = engine
        .ensure_account("guild2", "alice", "Alice")
        .await
        .unwrap();

    assert_ne!(in_guild1, in_guild2);
    assert_eq!(count_rows(&db, "accounts").await, 2);
}

#[tokio::test]
async fn balances_of_unknown_account_fail() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.balances("guild1", "nobody").await.unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound(_)));
}

#[tokio::test]
async fn ensure_account_rejects_empty_identity() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .ensure_account("  ", "alice", "Alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}
