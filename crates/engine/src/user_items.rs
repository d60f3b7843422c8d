//! Per-account item grants.
//!
//! A `UserItem` is a denormalized copy of a master item taken at grant time,
//! plus the owning account. It never changes when the catalog does.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::items::MasterItem;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserItem {
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub master_item_id: i64,
    pub name: String,
    pub price: i64,
    pub one_time: bool,
    pub in_inventory: bool,
    pub command: Option<String>,
    pub linked_income_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub master_item_id: i64,
    pub name: String,
    pub price: i64,
    pub one_time: bool,
    pub in_inventory: bool,
    pub command: Option<String>,
    pub linked_income_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            community_id: model.community_id,
            master_item_id: model.master_item_id,
            name: model.name,
            price: model.price,
            one_time: model.one_time,
            in_inventory: model.in_inventory,
            command: model.command,
            linked_income_id: model.linked_income_id,
        }
    }
}

/// Snapshot of `master` for `account_id`; id left to the store.
pub(crate) fn snapshot_model(
    account_id: i64,
    community_id: &str,
    master: &MasterItem,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        account_id: ActiveValue::Set(account_id),
        community_id: ActiveValue::Set(community_id.to_string()),
        master_item_id: ActiveValue::Set(master.id),
        name: ActiveValue::Set(master.name.clone()),
        price: ActiveValue::Set(master.price),
        one_time: ActiveValue::Set(master.one_time),
        in_inventory: ActiveValue::Set(master.in_inventory),
        command: ActiveValue::Set(master.command.clone()),
        linked_income_id: ActiveValue::Set(master.linked_income_id),
    }
}
