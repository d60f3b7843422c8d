//! Identity resolver: maps a (community, member) identity pair to the internal
//! account id, creating the account row on first sight.

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{Account, AccountRef, EngineError, ResultEngine, accounts};

use super::{Engine, is_unique_violation, normalize_required_name, with_tx};

impl Engine {
    /// Ensure an account exists for `(community_id, member_id)` and return its
    /// id.
    ///
    /// First sight inserts a row with zero balances; later calls refresh the
    /// display name when it changed. The check-then-act runs inside one
    /// database transaction, with the unique index on the identity pair as
    /// backstop: if a concurrent caller wins the insert race, the read-then-act
    /// path is retried once before the conflict is surfaced.
    pub async fn ensure_account(
        &self,
        community_id: &str,
        member_id: &str,
        display_name: &str,
    ) -> ResultEngine<i64> {
        let community_id = normalize_required_name(community_id, "community")?;
        let member_id = normalize_required_name(member_id, "member")?;
        let display_name = display_name.trim();

        match self
            .ensure_account_once(&community_id, &member_id, display_name)
            .await
        {
            Err(EngineError::Database(err)) if is_unique_violation(&err) => self
                .ensure_account_once(&community_id, &member_id, display_name)
                .await
                .map_err(|retry_err| match retry_err {
                    EngineError::Database(err) if is_unique_violation(&err) => {
                        EngineError::Conflict(format!(
                            "account ({community_id}, {member_id}) insert race not resolved by retry"
                        ))
                    }
                    other => other,
                }),
            result => result,
        }
    }

    async fn ensure_account_once(
        &self,
        community_id: &str,
        member_id: &str,
        display_name: &str,
    ) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::CommunityId.eq(community_id))
                .filter(accounts::Column::MemberId.eq(member_id))
                .one(&db_tx)
                .await?;

            match existing {
                Some(model) => {
                    if model.display_name != display_name {
                        let update = accounts::ActiveModel {
                            id: ActiveValue::Set(model.id),
                            display_name: ActiveValue::Set(display_name.to_string()),
                            ..Default::default()
                        };
                        update.update(&db_tx).await?;
                    }
                    Ok(model.id)
                }
                None => {
                    let insert = accounts::Entity::insert(accounts::new_account_model(
                        community_id,
                        member_id,
                        display_name,
                    ))
                    .exec(&db_tx)
                    .await?;
                    Ok(insert.last_insert_id)
                }
            }
        })
    }

    /// Return the cash and bank balance of an account.
    pub async fn balances(&self, community_id: &str, member_id: &str) -> ResultEngine<(i64, i64)> {
        let account = self.account(community_id, member_id).await?;
        Ok((account.cash, account.bank))
    }

    /// Return a full account snapshot.
    pub async fn account(&self, community_id: &str, member_id: &str) -> ResultEngine<Account> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::CommunityId.eq(community_id))
            .filter(accounts::Column::MemberId.eq(member_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| {
                EngineError::AccountNotFound(format!("({community_id}, {member_id})"))
            })?;
        Ok(model.into())
    }

    /// Resolve an [`AccountRef`] to the account row, without creating it.
    pub(super) async fn require_account(
        &self,
        db_tx: &DatabaseTransaction,
        account: &AccountRef,
    ) -> ResultEngine<accounts::Model> {
        let model = match account {
            AccountRef::Id(id) => accounts::Entity::find_by_id(*id).one(db_tx).await?,
            AccountRef::Identity {
                community_id,
                member_id,
            } => {
                accounts::Entity::find()
                    .filter(accounts::Column::CommunityId.eq(community_id.as_str()))
                    .filter(accounts::Column::MemberId.eq(member_id.as_str()))
                    .one(db_tx)
                    .await?
            }
        };

        model.ok_or_else(|| match account {
            AccountRef::Id(id) => EngineError::AccountNotFound(format!("id {id}")),
            AccountRef::Identity {
                community_id,
                member_id,
            } => EngineError::AccountNotFound(format!("({community_id}, {member_id})")),
        })
    }
}
