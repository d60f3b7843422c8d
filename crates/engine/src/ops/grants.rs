//! Provisioning engine: grants catalog entries to accounts.
//!
//! Items and incomes may link to each other, and the link graph may be
//! mutual (item A → income B → item A). Each top-level grant carries a
//! visited set keyed by (resource kind, id) through the recursion, so every
//! node is resolved at most once per invocation regardless of cycles.
//!
//! Linked grants are best-effort: a failure in a linked grant is logged and
//! does not abort the primary grant, and the grants do not share a database
//! transaction. Only each individual snapshot insert is atomic.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{AccountRef, ResultEngine, UserIncome, UserItem, user_incomes, user_items};

use super::{Engine, with_tx};

/// One node of the item↔income link graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum GrantKey {
    Item(i64),
    Income(i64),
}

type GrantFuture<'a> = Pin<Box<dyn Future<Output = ResultEngine<()>> + Send + 'a>>;

impl Engine {
    /// Grant a master item to an account, cascading over its linked income.
    pub async fn grant_item(
        &self,
        account_id: i64,
        community_id: &str,
        master_item_id: i64,
    ) -> ResultEngine<()> {
        let mut visited = HashSet::new();
        self.grant_item_inner(account_id, community_id, master_item_id, &mut visited)
            .await
    }

    /// Grant a master income to an account, cascading over its linked item.
    pub async fn grant_income(
        &self,
        account_id: i64,
        community_id: &str,
        master_income_id: i64,
    ) -> ResultEngine<()> {
        let mut visited = HashSet::new();
        self.grant_income_inner(account_id, community_id, master_income_id, &mut visited)
            .await
    }

    fn grant_item_inner<'a>(
        &'a self,
        account_id: i64,
        community_id: &'a str,
        master_item_id: i64,
        visited: &'a mut HashSet<GrantKey>,
    ) -> GrantFuture<'a> {
        Box::pin(async move {
            // Catalog lookup happens before any write; an unknown id fails the
            // whole grant with nothing inserted.
            let master = self.item(master_item_id).await?;

            if !visited.insert(GrantKey::Item(master.id)) {
                // Already resolved during this invocation (cycle or shared
                // link); treat as granted.
                return Ok(());
            }

            // Linked resources are provisioned first so prerequisites exist
            // when the primary row lands. Their failure does not abort us.
            if let Some(income_id) = master.linked_income_id
                && let Err(err) = self
                    .grant_income_inner(account_id, community_id, income_id, visited)
                    .await
            {
                tracing::warn!(
                    account_id,
                    master_item_id = master.id,
                    linked_income_id = income_id,
                    error = %err,
                    "linked income grant failed"
                );
            }

            with_tx!(self, |db_tx| {
                self.require_account(&db_tx, &AccountRef::Id(account_id))
                    .await?;
                user_items::Entity::insert(user_items::snapshot_model(
                    account_id,
                    community_id,
                    &master,
                ))
                .exec(&db_tx)
                .await?;
                Ok(())
            })
        })
    }

    fn grant_income_inner<'a>(
        &'a self,
        account_id: i64,
        community_id: &'a str,
        master_income_id: i64,
        visited: &'a mut HashSet<GrantKey>,
    ) -> GrantFuture<'a> {
        Box::pin(async move {
            let master = self.income(master_income_id).await?;

            if !visited.insert(GrantKey::Income(master.id)) {
                return Ok(());
            }

            if let Some(item_id) = master.linked_item_id
                && let Err(err) = self
                    .grant_item_inner(account_id, community_id, item_id, visited)
                    .await
            {
                tracing::warn!(
                    account_id,
                    master_income_id = master.id,
                    linked_item_id = item_id,
                    error = %err,
                    "linked item grant failed"
                );
            }

            with_tx!(self, |db_tx| {
                self.require_account(&db_tx, &AccountRef::Id(account_id))
                    .await?;
                user_incomes::Entity::insert(user_incomes::snapshot_model(
                    account_id,
                    community_id,
                    &master,
                ))
                .exec(&db_tx)
                .await?;
                Ok(())
            })
        })
    }

    /// List the item grants held by an account, in grant order.
    pub async fn user_items(&self, account_id: i64) -> ResultEngine<Vec<UserItem>> {
        let models = user_items::Entity::find()
            .filter(user_items::Column::AccountId.eq(account_id))
            .order_by_asc(user_items::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(UserItem::from).collect())
    }

    /// List the income grants held by an account, in grant order.
    pub async fn user_incomes(&self, account_id: i64) -> ResultEngine<Vec<UserIncome>> {
        let models = user_incomes::Entity::find()
            .filter(user_incomes::Column::AccountId.eq(account_id))
            .order_by_asc(user_incomes::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(UserIncome::from).collect())
    }
}
