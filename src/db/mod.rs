//! Transaction-scoped database access.
//!
//! [`TxContext`] pairs a borrowed connection with at most one open
//! transaction and an explicit [`ExecContext`]. Handlers run through
//! [`TxContext::execute`] are committed on success and rolled back on
//! failure, exactly once.
//!
//! Drivers plug in through [`Database`] / [`TxHandle`]; SQLite
//! (`rusqlite::Connection`) is implemented here.

mod classify;
mod context;
mod options;
mod tx;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::warn;

use crate::error::TxError;

pub use classify::{DUPLICATE_ENTRY, INVALID_CONNECTION, is_duplicate_entry, is_invalid_connection};
pub use context::ExecContext;
pub use options::ExecOptions;
pub use tx::{TxContext, with_transaction};

/// How a transaction takes its locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxMode {
    /// Locks are taken on first read/write.
    #[default]
    Deferred,
    /// The write lock is taken at begin, blocking concurrent writers.
    Immediate,
}

/// An open transaction owned by its caller.
pub trait TxHandle {
    fn commit(self) -> Result<(), TxError>;
    fn rollback(self) -> Result<(), TxError>;

    /// Release the handle after a driver reported the connection dead. The
    /// default issues nothing; drivers whose connections cannot die
    /// underneath them override it to leave the connection usable.
    fn abandon(self)
    where
        Self: Sized,
    {
    }
}

/// A connection that can start transactions.
pub trait Database {
    type Tx<'a>: TxHandle
    where
        Self: 'a;

    fn begin(&self, mode: TxMode) -> Result<Self::Tx<'_>, TxError>;
}

impl Database for Connection {
    type Tx<'a> = Transaction<'a>;

    fn begin(&self, mode: TxMode) -> Result<Transaction<'_>, TxError> {
        let behavior = match mode {
            TxMode::Deferred => TransactionBehavior::Deferred,
            TxMode::Immediate => TransactionBehavior::Immediate,
        };
        Transaction::new_unchecked(self, behavior).map_err(|e| TxError::connection("begin", e))
    }
}

impl TxHandle for Transaction<'_> {
    fn commit(self) -> Result<(), TxError> {
        Transaction::commit(self).map_err(|e| TxError::connection("commit", e))
    }

    fn rollback(self) -> Result<(), TxError> {
        Transaction::rollback(self).map_err(|e| TxError::connection("rollback", e))
    }

    // sqlite handles do not go dead; restore autocommit so the connection
    // stays usable for the next unit of work.
    fn abandon(self) {
        if self.is_autocommit() {
            return;
        }
        if let Err(e) = Transaction::rollback(self) {
            warn!(error = %e, "rollback of abandoned transaction failed");
        }
    }
}
