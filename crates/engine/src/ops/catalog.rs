//! Catalog: master item and master income definitions.
//!
//! Reads are pure and hit the connection directly; the engine never mutates a
//! master row after creation. Name lookups are case-insensitive and treat
//! absence as a normal `None`, not an error.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    EngineError, MasterIncome, MasterItem, NewMasterIncome, NewMasterItem, ResultEngine, incomes,
    items,
};

use super::{Engine, is_unique_violation, normalize_required_name, with_tx};

impl Engine {
    /// Add a master item to the catalog and return its id.
    ///
    /// The name must be unused; a supplied `linked_income_id` must refer to an
    /// existing master income. Cyclic pairs are built by inserting one side
    /// without a link and closing the loop from the other side.
    pub async fn add_master_item(&self, new: NewMasterItem) -> ResultEngine<i64> {
        let name = normalize_required_name(&new.name, "item")?;
        with_tx!(self, |db_tx| {
            let exists = items::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!("item name taken: {name}")));
            }

            if let Some(income_id) = new.linked_income_id
                && incomes::Entity::find_by_id(income_id)
                    .one(&db_tx)
                    .await?
                    .is_none()
            {
                return Err(EngineError::UnknownCatalogEntry(format!(
                    "income {income_id}"
                )));
            }

            // The unique index backstops the check above when a concurrent
            // insert slips past it.
            let mut model = items::ActiveModel::from(&new);
            model.name = ActiveValue::Set(name.clone());
            let insert = items::Entity::insert(model)
                .exec(&db_tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        EngineError::Conflict(format!("item name taken: {name}"))
                    } else {
                        EngineError::Database(err)
                    }
                })?;
            Ok(insert.last_insert_id)
        })
    }

    /// Add a master income to the catalog and return its id.
    pub async fn add_master_income(&self, new: NewMasterIncome) -> ResultEngine<i64> {
        let name = normalize_required_name(&new.name, "income")?;
        with_tx!(self, |db_tx| {
            let exists = incomes::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!("income name taken: {name}")));
            }

            if let Some(item_id) = new.linked_item_id
                && items::Entity::find_by_id(item_id).one(&db_tx).await?.is_none()
            {
                return Err(EngineError::UnknownCatalogEntry(format!("item {item_id}")));
            }

            let mut model = incomes::ActiveModel::from(&new);
            model.name = ActiveValue::Set(name.clone());
            let insert = incomes::Entity::insert(model)
                .exec(&db_tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        EngineError::Conflict(format!("income name taken: {name}"))
                    } else {
                        EngineError::Database(err)
                    }
                })?;
            Ok(insert.last_insert_id)
        })
    }

    /// Return a master item by id.
    pub async fn item(&self, item_id: i64) -> ResultEngine<MasterItem> {
        items::Entity::find_by_id(item_id)
            .one(&self.database)
            .await?
            .map(MasterItem::from)
            .ok_or_else(|| EngineError::UnknownCatalogEntry(format!("item {item_id}")))
    }

    /// Return a master income by id.
    pub async fn income(&self, income_id: i64) -> ResultEngine<MasterIncome> {
        incomes::Entity::find_by_id(income_id)
            .one(&self.database)
            .await?
            .map(MasterIncome::from)
            .ok_or_else(|| EngineError::UnknownCatalogEntry(format!("income {income_id}")))
    }

    /// Find a master item id by name; `None` when absent.
    pub async fn find_item_by_name(&self, name: &str) -> ResultEngine<Option<i64>> {
        let model = items::Entity::find()
            .filter(Expr::cust("LOWER(name)").eq(name.trim().to_lowercase()))
            .one(&self.database)
            .await?;
        Ok(model.map(|m| m.id))
    }

    /// Find a master income id by name; `None` when absent.
    pub async fn find_income_by_name(&self, name: &str) -> ResultEngine<Option<i64>> {
        let model = incomes::Entity::find()
            .filter(Expr::cust("LOWER(name)").eq(name.trim().to_lowercase()))
            .one(&self.database)
            .await?;
        Ok(model.map(|m| m.id))
    }

    /// List the whole item catalog.
    pub async fn list_items(&self) -> ResultEngine<Vec<MasterItem>> {
        let models = items::Entity::find().all(&self.database).await?;
        Ok(models.into_iter().map(MasterItem::from).collect())
    }

    /// List the whole income catalog.
    pub async fn list_incomes(&self) -> ResultEngine<Vec<MasterIncome>> {
        let models = incomes::Entity::find().all(&self.database).await?;
        Ok(models.into_iter().map(MasterIncome::from).collect())
    }
}
