//! Maintenance: bulk reset of every ledger table, for tests and ops.

use sea_orm::{ConnectionTrait, Statement, TransactionTrait};

use crate::ResultEngine;

use super::{Engine, with_tx};

/// Wipe order: referencing tables first, referenced tables last.
const WIPE_ORDER: [&str; 6] = [
    "user_items",
    "user_incomes",
    "transactions",
    "master_items",
    "master_incomes",
    "accounts",
];

impl Engine {
    /// Delete every row from every ledger table, in dependency order, inside
    /// one transaction. FK enforcement is deferred for the duration of the
    /// wipe and resumes at commit. With `reset_sequences` the AUTOINCREMENT
    /// counters are cleared too, so ids restart from 1.
    ///
    /// Idempotent: wiping an empty store succeeds.
    pub async fn reset_all_data(&self, reset_sequences: bool) -> ResultEngine<()> {
        let backend = self.database.get_database_backend();
        with_tx!(self, |db_tx| {
            db_tx
                .execute(Statement::from_string(
                    backend,
                    "PRAGMA defer_foreign_keys = ON;",
                ))
                .await?;

            for table in WIPE_ORDER {
                db_tx
                    .execute(Statement::from_string(
                        backend,
                        format!("DELETE FROM {table};"),
                    ))
                    .await?;
            }

            if reset_sequences {
                let placeholders = WIPE_ORDER.map(|_| "?").join(", ");
                db_tx
                    .execute(Statement::from_sql_and_values(
                        backend,
                        format!("DELETE FROM sqlite_sequence WHERE name IN ({placeholders});"),
                        WIPE_ORDER.map(Into::into),
                    ))
                    .await?;
            }

            tracing::info!(reset_sequences, "wiped all ledger tables");
            Ok(())
        })
    }
}
