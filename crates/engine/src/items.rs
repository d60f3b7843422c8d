//! Master items: purchasable catalog definitions.
//!
//! A master item is a template, never owned by anyone. Granting an item to an
//! account copies these fields into a [`UserItem`](crate::UserItem) snapshot,
//! so later catalog edits do not retroactively change what accounts already
//! hold.
//!
//! `linked_income_id` optionally points at a master income that is granted
//! alongside this item. The link is intentionally not FK-backed: the
//! item↔income graph may be mutual (item A → income B → item A), so the second
//! side of a pair must be insertable before the loop is closed.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterItem {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub one_time: bool,
    pub in_inventory: bool,
    pub command: Option<String>,
    pub linked_income_id: Option<i64>,
}

/// Input for [`Engine::add_master_item`](crate::Engine::add_master_item).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewMasterItem {
    pub name: String,
    pub price: i64,
    pub one_time: bool,
    pub in_inventory: bool,
    pub command: Option<String>,
    pub linked_income_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "master_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub one_time: bool,
    pub in_inventory: bool,
    pub command: Option<String>,
    pub linked_income_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MasterItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            one_time: model.one_time,
            in_inventory: model.in_inventory,
            command: model.command,
            linked_income_id: model.linked_income_id,
        }
    }
}

impl From<&NewMasterItem> for ActiveModel {
    fn from(new: &NewMasterItem) -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(new.name.clone()),
            price: ActiveValue::Set(new.price),
            one_time: ActiveValue::Set(new.one_time),
            in_inventory: ActiveValue::Set(new.in_inventory),
            command: ActiveValue::Set(new.command.clone()),
            linked_income_id: ActiveValue::Set(new.linked_income_id),
        }
    }
}
