use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::TxError;

/// Cancellation and deadline carried alongside database work.
///
/// Handlers receive it by reference and are expected to [`check`] it between
/// long-running steps. Nothing in this crate enforces it on their behalf.
///
/// [`check`]: ExecContext::check
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share cancellation with an existing token, e.g. a server shutdown token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Set a deadline. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// A context cancelled with this one but cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    pub fn check(&self) -> Result<(), TxError> {
        if self.token.is_cancelled() {
            return Err(TxError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(TxError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
