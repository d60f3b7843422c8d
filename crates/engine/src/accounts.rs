//! Accounts: one economic record per (community, member) pair.
//!
//! An account holds two balances, cash and bank, stored as signed integers.
//! Balances are only ever changed by the balance engine
//! ([`Engine::apply_delta`](crate::Engine::apply_delta)); account rows are
//! created by the identity resolver
//! ([`Engine::ensure_account`](crate::Engine::ensure_account)).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Which balance column of an account a delta applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ledger {
    Cash,
    Bank,
}

impl Ledger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }
}

impl TryFrom<&str> for Ledger {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid ledger: {other}"
            ))),
        }
    }
}

/// Reference to an account: either the internal id or the external identity
/// pair. Operations taking an `AccountRef` resolve the pair without creating
/// the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountRef {
    Id(i64),
    Identity {
        community_id: String,
        member_id: String,
    },
}

impl AccountRef {
    pub fn identity(community_id: &str, member_id: &str) -> Self {
        Self::Identity {
            community_id: community_id.to_string(),
            member_id: member_id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub community_id: String,
    pub member_id: String,
    pub display_name: String,
    pub cash: i64,
    pub bank: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub community_id: String,
    pub member_id: String,
    pub display_name: String,
    pub cash: i64,
    pub bank: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::user_items::Entity")]
    UserItems,
    #[sea_orm(has_many = "super::user_incomes::Entity")]
    UserIncomes,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::user_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserItems.def()
    }
}

impl Related<super::user_incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserIncomes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            community_id: model.community_id,
            member_id: model.member_id,
            display_name: model.display_name,
            cash: model.cash,
            bank: model.bank,
        }
    }
}

/// Active model for a brand-new account: zero balances, id assigned by the
/// store.
pub(crate) fn new_account_model(
    community_id: &str,
    member_id: &str,
    display_name: &str,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        community_id: ActiveValue::Set(community_id.to_string()),
        member_id: ActiveValue::Set(member_id.to_string()),
        display_name: ActiveValue::Set(display_name.to_string()),
        cash: ActiveValue::Set(0),
        bank: ActiveValue::Set(0),
    }
}
