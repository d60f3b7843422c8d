//! Per-account income grants.
//!
//! Snapshot semantics match `user_items`. `last_claimed` starts as `NULL`,
//! meaning never claimed and eligible immediately.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::incomes::MasterIncome;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIncome {
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub master_income_id: i64,
    pub name: String,
    pub amount: i64,
    pub is_percent: bool,
    pub cooldown_secs: i64,
    pub linked_item_id: Option<i64>,
    pub last_claimed: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub master_income_id: i64,
    pub name: String,
    pub amount: i64,
    pub is_percent: bool,
    pub cooldown_secs: i64,
    pub linked_item_id: Option<i64>,
    pub last_claimed: Option<DateTimeUtc>,
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

impl From<Model> for UserIncome {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            community_id: model.community_id,
            master_income_id: model.master_income_id,
            name: model.name,
            amount: model.amount,
            is_percent: model.is_percent,
            cooldown_secs: model.cooldown_secs,
            linked_item_id: model.linked_item_id,
            last_claimed: model.last_claimed,
        }
    }
}

/// Snapshot of `master` for `account_id`; never claimed yet.
pub(crate) fn snapshot_model(
    account_id: i64,
    community_id: &str,
    master: &MasterIncome,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        account_id: ActiveValue::Set(account_id),
        community_id: ActiveValue::Set(community_id.to_string()),
        master_income_id: ActiveValue::Set(master.id),
        name: ActiveValue::Set(master.name.clone()),
        amount: ActiveValue::Set(master.amount),
        is_percent: ActiveValue::Set(master.is_percent),
        cooldown_secs: ActiveValue::Set(master.cooldown_secs),
        linked_item_id: ActiveValue::Set(master.linked_item_id),
        last_claimed: ActiveValue::Set(None),
    }
}
