use serde::Deserialize;

/// Flags a caller attaches when asking for a [`TxContext`](super::TxContext).
///
/// They are read by [`TxContext::open`](super::TxContext::open) only; a
/// context never consults them after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecOptions {
    /// Take the write lock up front so concurrent writers wait.
    pub block_write: bool,
    /// Begin the transaction when the context is created instead of lazily.
    pub open_tx: bool,
}

impl ExecOptions {
    pub const fn new() -> Self {
        Self {
            block_write: false,
            open_tx: false,
        }
    }

    pub const fn with_block_write(self) -> Self {
        Self {
            block_write: true,
            ..self
        }
    }

    pub const fn with_open_tx(self) -> Self {
        Self {
            open_tx: true,
            ..self
        }
    }
}
