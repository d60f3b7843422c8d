use engine::{Engine, EngineError, NewMasterIncome, NewMasterItem};
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

async fn account(engine: &Engine) -> i64 {
    engine
        .ensure_account("guild1", "alice", "Alice")
        .await
        .unwrap()
}

/// Catalog administration (out of engine scope) edits master rows directly.
async fn raw(db: &DatabaseConnection, sql: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn grant_income_snapshot_starts_unclaimed() {
    let (engine, _db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let income_id = engine
        .add_master_income(NewMasterIncome {
            name: "bonus".to_string(),
            amount: 50,
            is_percent: false,
            cooldown_secs: 0,
            linked_item_id: None,
        })
        .await
        .unwrap();

    engine
        .grant_income(account_id, "guild1", income_id)
        .await
        .unwrap();

    let grants = engine.user_incomes(account_id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].master_income_id, income_id);
    assert_eq!(grants[0].amount, 50);
    assert_eq!(grants[0].last_claimed, None);
}

#[tokio::test]
async fn grant_unknown_item_inserts_nothing() {
    let (engine, _db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let err = engine
        .grant_item(account_id, "guild1", 9999)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::UnknownCatalogEntry(_)));
    assert!(engine.user_items(account_id).await.unwrap().is_empty());
    assert!(engine.user_incomes(account_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn grant_item_cascades_linked_income() {
    let (engine, _db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let income_id = engine
        .add_master_income(NewMasterIncome {
            name: "rent".to_string(),
            amount: 25,
            is_percent: false,
            cooldown_secs: 3600,
            linked_item_id: None,
        })
        .await
        .unwrap();
    let item_id = engine
        .add_master_item(NewMasterItem {
            name: "house".to_string(),
            price: 10_000,
            one_time: true,
            in_inventory: false,
            command: None,
            linked_income_id: Some(income_id),
        })
        .await
        .unwrap();

    engine.grant_item(account_id, "guild1", item_id).await.unwrap();

    let items = engine.user_items(account_id).await.unwrap();
    let incomes = engine.user_incomes(account_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].master_item_id, item_id);
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].master_income_id, income_id);
}

#[tokio::test]
async fn mutual_links_grant_each_resource_exactly_once() {
    let (engine, db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let item_id = engine
        .add_master_item(NewMasterItem {
            name: "farm".to_string(),
            price: 2000,
            one_time: true,
            in_inventory: false,
            command: None,
            linked_income_id: None,
        })
        .await
        .unwrap();
    let income_id = engine
        .add_master_income(NewMasterIncome {
            name: "harvest".to_string(),
            amount: 75,
            is_percent: false,
            cooldown_secs: 0,
            linked_item_id: Some(item_id),
        })
        .await
        .unwrap();
    // Close the loop: farm → harvest → farm.
    raw(
        &db,
        &format!("UPDATE master_items SET linked_income_id = {income_id} WHERE id = {item_id};"),
    )
    .await;

    engine.grant_item(account_id, "guild1", item_id).await.unwrap();

    let items = engine.user_items(account_id).await.unwrap();
    let incomes = engine.user_incomes(account_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(incomes.len(), 1);

    // The other direction terminates as well.
    engine
        .grant_income(account_id, "guild1", income_id)
        .await
        .unwrap();
    assert_eq!(engine.user_items(account_id).await.unwrap().len(), 2);
    assert_eq!(engine.user_incomes(account_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn grants_are_snapshots_of_the_catalog_at_grant_time() {
    let (engine, db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let item_id = engine
        .add_master_item(NewMasterItem {
            name: "potion".to_string(),
            price: 100,
            one_time: false,
            in_inventory: true,
            command: None,
            linked_income_id: None,
        })
        .await
        .unwrap();

    engine.grant_item(account_id, "guild1", item_id).await.unwrap();
    raw(
        &db,
        &format!("UPDATE master_items SET price = 250 WHERE id = {item_id};"),
    )
    .await;
    engine.grant_item(account_id, "guild1", item_id).await.unwrap();

    let items = engine.user_items(account_id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].price, 100);
    assert_eq!(items[1].price, 250);
}

#[tokio::test]
async fn linked_grant_failure_does_not_abort_primary_grant() {
    let (engine, db) = engine_with_db().await;
    let account_id = account(&engine).await;

    let item_id = engine
        .add_master_item(NewMasterItem {
            name: "lamp".to_string(),
            price: 10,
            one_time: false,
            in_inventory: true,
            command: None,
            linked_income_id: None,
        })
        .await
        .unwrap();
    // Dangle the link (catalog admin deleted the income later).
    raw(
        &db,
        &format!("UPDATE master_items SET linked_income_id = 4242 WHERE id = {item_id};"),
    )
    .await;

    engine.grant_item(account_id, "guild1", item_id).await.unwrap();

    assert_eq!(engine.user_items(account_id).await.unwrap().len(), 1);
    assert!(engine.user_incomes(account_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn grant_to_unknown_account_fails() {
    let (engine, _db) = engine_with_db().await;

    let item_id = engine
        .add_master_item(NewMasterItem {
            name: "sword".to_string(),
            price: 100,
            one_time: false,
            in_inventory: true,
            command: None,
            linked_income_id: None,
        })
        .await
        .unwrap();

    let err = engine.grant_item(77, "guild1", item_id).await.unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound(_)));
}
