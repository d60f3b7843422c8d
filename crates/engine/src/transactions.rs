//! Transaction records: the append-only audit trail of the ledger.
//!
//! Every balance mutation writes exactly one record, in the same database
//! transaction as the balance update. Records are never updated or deleted
//! (except by [`Engine::reset_all_data`](crate::Engine::reset_all_data)).
//!
//! Amounts are signed: positive credits, negative debits.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Sale,
    Income,
    CommandReward,
    DailyClaim,
    Miscellaneous,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Income => "income",
            Self::CommandReward => "command_reward",
            Self::DailyClaim => "daily_claim",
            Self::Miscellaneous => "miscellaneous",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            "income" => Ok(Self::Income),
            "command_reward" => Ok(Self::CommandReward),
            "daily_claim" => Ok(Self::DailyClaim),
            "miscellaneous" => Ok(Self::Miscellaneous),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// A persisted transaction record, including the store-assigned id and
/// timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub kind: TransactionKind,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub community_id: String,
    pub kind: String,
    pub amount: i64,
    pub occurred_at: DateTimeUtc,
    pub description: String,
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

impl TryFrom<Model> for TransactionRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            account_id: model.account_id,
            community_id: model.community_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            occurred_at: model.occurred_at,
            description: model.description,
        })
    }
}

/// Active model for a new record; id left to the store.
pub(crate) fn new_record_model(
    account_id: i64,
    community_id: &str,
    kind: TransactionKind,
    amount: i64,
    occurred_at: DateTime<Utc>,
    description: &str,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        account_id: ActiveValue::Set(account_id),
        community_id: ActiveValue::Set(community_id.to_string()),
        kind: ActiveValue::Set(kind.as_str().to_string()),
        amount: ActiveValue::Set(amount),
        occurred_at: ActiveValue::Set(occurred_at),
        description: ActiveValue::Set(description.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trip() {
        for kind in [
            TransactionKind::Purchase,
            TransactionKind::Sale,
            TransactionKind::Income,
            TransactionKind::CommandReward,
            TransactionKind::DailyClaim,
            TransactionKind::Miscellaneous,
        ] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn kind_rejects_unknown() {
        assert!(matches!(
            TransactionKind::try_from("interest"),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
