//! Ledger engine for a per-community virtual economy.
//!
//! The engine tracks one [`Account`] per (community, member) pair, each with a
//! cash and a bank balance, and records every balance change as an immutable
//! [`TransactionRecord`]. A catalog of [`MasterItem`]s and [`MasterIncome`]s can
//! be granted to accounts; granting copies the catalog definition into a
//! per-account snapshot and cascades over the optional item↔income links.
//!
//! All persistence goes through sea-orm; every mutating operation runs inside
//! one database transaction and rolls back on any error.

pub use accounts::{Account, AccountRef, Ledger};
pub use error::EngineError;
pub use incomes::{MasterIncome, NewMasterIncome};
pub use items::{MasterItem, NewMasterItem};
pub use ops::{Engine, EngineBuilder};
pub use transactions::{TransactionKind, TransactionRecord};
pub use user_incomes::UserIncome;
pub use user_items::UserItem;

mod accounts;
mod error;
mod incomes;
mod items;
mod ops;
mod transactions;
mod user_incomes;
mod user_items;

type ResultEngine<T> = Result<T, EngineError>;
