use std::fmt::Display;

use tracing::{debug, warn};

use super::classify::is_invalid_connection;
use super::{Database, ExecContext, ExecOptions, TxHandle, TxMode};
use crate::error::TxError;

enum Slot<T> {
    Idle,
    Open(T),
    Finished,
}

/// A connection, its (at most one) open transaction and the execution
/// context handed to every handler.
///
/// The transaction is opened lazily and consumed exactly once by
/// [`execute`](Self::execute). A context is meant for one unit of work, e.g.
/// one incoming request; once finished it refuses further work with
/// [`TxError::Finished`].
pub struct TxContext<'c, D: Database + 'c> {
    exec: ExecContext,
    conn: &'c D,
    mode: TxMode,
    slot: Slot<D::Tx<'c>>,
}

impl<'c, D: Database + 'c> TxContext<'c, D> {
    pub fn new(exec: ExecContext, conn: &'c D) -> Self {
        Self {
            exec,
            conn,
            mode: TxMode::Deferred,
            slot: Slot::Idle,
        }
    }

    /// Build a context honouring `opts`: `block_write` selects
    /// [`TxMode::Immediate`], `open_tx` begins the transaction right away.
    pub fn open(exec: ExecContext, conn: &'c D, opts: ExecOptions) -> Result<Self, TxError> {
        let mut ctx = Self::new(exec, conn);
        if opts.block_write {
            ctx.mode = TxMode::Immediate;
        }
        if opts.open_tx {
            ctx.begin()?;
        }
        Ok(ctx)
    }

    pub fn conn(&self) -> &'c D {
        self.conn
    }

    pub fn exec(&self) -> &ExecContext {
        &self.exec
    }

    pub fn mode(&self) -> TxMode {
        self.mode
    }

    /// The open transaction, if any.
    pub fn transaction(&self) -> Option<&D::Tx<'c>> {
        match &self.slot {
            Slot::Open(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn in_transaction(&self) -> bool {
        matches!(self.slot, Slot::Open(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.slot, Slot::Finished)
    }

    /// Open a transaction unless one is already open.
    pub fn begin(&mut self) -> Result<(), TxError> {
        match self.slot {
            Slot::Open(_) => Ok(()),
            Slot::Finished => Err(TxError::Finished),
            Slot::Idle => {
                let conn: &'c D = self.conn;
                let tx = conn.begin(self.mode)?;
                debug!(mode = ?self.mode, "transaction opened");
                self.slot = Slot::Open(tx);
                Ok(())
            }
        }
    }

    /// Run `handler` inside the transaction, opening one if needed.
    ///
    /// On `Ok` the transaction is committed and a commit failure is returned.
    /// On `Err` it is rolled back and the handler's error is returned as-is;
    /// a failed rollback is only logged. When the error says the connection
    /// is invalid the rollback is skipped altogether.
    pub fn execute<T, E, F>(&mut self, handler: F) -> Result<T, E>
    where
        F: FnOnce(&ExecContext, &D::Tx<'c>) -> Result<T, E>,
        E: From<TxError> + Display,
    {
        self.begin()?;
        let tx = match std::mem::replace(&mut self.slot, Slot::Finished) {
            Slot::Open(tx) => tx,
            _ => return Err(TxError::Finished.into()),
        };

        match handler(&self.exec, &tx) {
            Ok(value) => {
                tx.commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if is_invalid_connection(&err) {
                    warn!(error = %err, "connection invalid, skipping rollback");
                    tx.abandon();
                } else if let Err(rb) = tx.rollback() {
                    warn!(error = %err, rollback_error = %rb, "rollback failed");
                } else {
                    debug!(error = %err, "transaction rolled back");
                }
                Err(err)
            }
        }
    }
}

/// Run `handler` in a fresh deferred transaction on `conn`.
///
/// Commits on `Ok`, rolls back on `Err` and returns the handler's error.
/// Unlike [`TxContext::execute`] the rollback is always attempted.
pub fn with_transaction<'c, D, T, E, F>(conn: &'c D, handler: F) -> Result<T, E>
where
    D: Database + 'c,
    F: FnOnce(&D::Tx<'c>) -> Result<T, E>,
    E: From<TxError> + Display,
{
    let tx = conn.begin(TxMode::Deferred)?;
    match handler(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rb) = tx.rollback() {
                warn!(error = %err, rollback_error = %rb, "rollback failed");
            }
            Err(err)
        }
    }
}
