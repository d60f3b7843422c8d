use std::sync::Arc;

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

fn sword(price: i64) -> NewMasterItem {
    NewMasterItem {
        name: "sword".to_string(),
        price,
        one_time: false,
        in_inventory: true,
        command: None,
        linked_income_id: None,
    }
}

#[tokio::test]
async fn add_item_round_trips() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .add_master_item(NewMasterItem {
            name: "crown".to_string(),
            price: 5000,
            one_time: true,
            in_inventory: false,
            command: Some("!coronate".to_string()),
            linked_income_id: None,
        })
        .await
        .unwrap();

    let item = engine.item(id).await.unwrap();
    assert_eq!(item.name, "crown");
    assert_eq!(item.price, 5000);
    assert!(item.one_time);
    assert!(!item.in_inventory);
    assert_eq!(item.command.as_deref(), Some("!coronate"));
    assert_eq!(item.linked_income_id, None);
}

#[tokio::test]
async fn add_income_round_trips() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .add_master_income(NewMasterIncome {
            name: "salary".to_string(),
            amount: 300,
            is_percent: false,
            cooldown_secs: 86400,
            linked_item_id: None,
        })
        .await
        .unwrap();

    let income = engine.income(id).await.unwrap();
    assert_eq!(income.name, "salary");
    assert_eq!(income.amount, 300);
    assert!(!income.is_percent);
    assert_eq!(income.cooldown_secs, 86400);
}

#[tokio::test]
async fn find_by_name_is_case_insensitive_and_absent_is_none() {
    let (engine, _db) = engine_with_db().await;

    let id = engine.add_master_item(sword(100)).await.unwrap();

    assert_eq!(engine.find_item_by_name("SWORD").await.unwrap(), Some(id));
    assert_eq!(engine.find_item_by_name("axe").await.unwrap(), None);
    assert_eq!(engine.find_income_by_name("salary").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_item_name_conflicts() {
    let (engine, _db) = engine_with_db().await;

    engine.add_master_item(sword(100)).await.unwrap();
    let err = engine
        .add_master_item(NewMasterItem {
            name: "Sword".to_string(),
            ..sword(200)
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_duplicate_names_surface_conflict() {
    let (engine, _db) = engine_with_db().await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(
            async move { engine.add_master_item(sword(100)).await },
        ));
    }

    let mut inserted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => inserted += 1,
            Err(err) => assert!(matches!(err, EngineError::Conflict(_))),
        }
    }
    assert_eq!(inserted, 1);
}

#[tokio::test]
async fn name_uniqueness_backstop_ignores_case() {
    let (engine, db) = engine_with_db().await;

    engine.add_master_item(sword(100)).await.unwrap();

    // A write that skips the engine's own check still hits the index.
    let backend = db.get_database_backend();
    let result = db
        .execute(Statement::from_string(
            backend,
            "INSERT INTO master_items (name, price, one_time, in_inventory) \
             VALUES ('Sword', 1, 0, 1);"
                .to_string(),
        ))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn dangling_link_is_rejected_at_insert() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_master_item(NewMasterItem {
            linked_income_id: Some(42),
            ..sword(100)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownCatalogEntry(_)));

    let err = engine
        .add_master_income(NewMasterIncome {
            name: "rent".to_string(),
            amount: 10,
            is_percent: true,
            cooldown_secs: 0,
            linked_item_id: Some(42),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownCatalogEntry(_)));
}

#[tokio::test]
async fn unknown_ids_are_unknown_catalog_entries() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.item(9999).await.unwrap_err(),
        EngineError::UnknownCatalogEntry(_)
    ));
    assert!(matches!(
        engine.income(9999).await.unwrap_err(),
        EngineError::UnknownCatalogEntry(_)
    ));
}

#[tokio::test]
async fn list_catalog() {
    let (engine, _db) = engine_with_db().await;

    engine.add_master_item(sword(100)).await.unwrap();
    engine
        .add_master_income(NewMasterIncome {
            name: "salary".to_string(),
            amount: 300,
            is_percent: false,
            cooldown_secs: 0,
            linked_item_id: None,
        })
        .await
        .unwrap();

    assert_eq!(engine.list_items().await.unwrap().len(), 1);
    assert_eq!(engine.list_incomes().await.unwrap().len(), 1);
}
