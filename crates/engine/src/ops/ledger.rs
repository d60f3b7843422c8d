//! Balance engine: the only code path that changes account balances.

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    AccountRef, Ledger, ResultEngine, TransactionKind, TransactionRecord, accounts, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Apply a signed delta to one balance column of an account and append the
    /// matching transaction record, atomically.
    ///
    /// The update is relative (`balance = balance + amount`), so concurrent
    /// deltas against the same account serialize at the row and none is lost.
    /// Negative amounts debit; balances are not clamped, overdraft policy
    /// belongs to the caller. The returned record carries the store-assigned
    /// id and the server-assigned timestamp.
    pub async fn apply_delta(
        &self,
        account: AccountRef,
        ledger: Ledger,
        amount: i64,
        kind: TransactionKind,
        description: &str,
    ) -> ResultEngine<TransactionRecord> {
        with_tx!(self, |db_tx| {
            let account_model = self.require_account(&db_tx, &account).await?;

            let column = match ledger {
                Ledger::Cash => accounts::Column::Cash,
                Ledger::Bank => accounts::Column::Bank,
            };
            accounts::Entity::update_many()
                .col_expr(column, Expr::col(column).add(amount))
                .filter(accounts::Column::Id.eq(account_model.id))
                .exec(&db_tx)
                .await?;

            let occurred_at = Utc::now();
            let insert = transactions::Entity::insert(transactions::new_record_model(
                account_model.id,
                &account_model.community_id,
                kind,
                amount,
                occurred_at,
                description,
            ))
            .exec(&db_tx)
            .await?;

            tracing::debug!(
                account_id = account_model.id,
                ledger = ledger.as_str(),
                amount,
                kind = kind.as_str(),
                "applied balance delta"
            );

            Ok(TransactionRecord {
                id: insert.last_insert_id,
                account_id: account_model.id,
                community_id: account_model.community_id,
                kind,
                amount,
                occurred_at,
                description: description.to_string(),
            })
        })
    }

    /// List the most recent transaction records of an account, newest first.
    pub async fn list_transactions(
        &self,
        account_id: i64,
        limit: u64,
    ) -> ResultEngine<Vec<TransactionRecord>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect()
    }
}
