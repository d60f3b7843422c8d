//! Master incomes: recurring income-source catalog definitions.
//!
//! `amount` is either a flat value or, when `is_percent` is set, a percentage
//! of a caller-defined base. `cooldown_secs` is the minimum time between
//! claims. `linked_item_id` mirrors the item-side link and, like it, is not
//! FK-backed so mutual item↔income pairs can be created one side at a time.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterIncome {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub is_percent: bool,
    pub cooldown_secs: i64,
    pub linked_item_id: Option<i64>,
}

/// Input for [`Engine::add_master_income`](crate::Engine::add_master_income).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewMasterIncome {
    pub name: String,
    pub amount: i64,
    pub is_percent: bool,
    pub cooldown_secs: i64,
    pub linked_item_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "master_incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub is_percent: bool,
    pub cooldown_secs: i64,
    pub linked_item_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MasterIncome {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            is_percent: model.is_percent,
            cooldown_secs: model.cooldown_secs,
            linked_item_id: model.linked_item_id,
        }
    }
}

impl From<&NewMasterIncome> for ActiveModel {
    fn from(new: &NewMasterIncome) -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(new.name.clone()),
            amount: ActiveValue::Set(new.amount),
            is_percent: ActiveValue::Set(new.is_percent),
            cooldown_secs: ActiveValue::Set(new.cooldown_secs),
            linked_item_id: ActiveValue::Set(new.linked_item_id),
        }
    }
}
