//! Cancellation and deadline carrier handed to [`DrillClient`](crate::DrillClient) calls.
//!
//! The connector never looks inside a [`Context`]; it only forwards it. Client
//! implementations decide how to honour it, typically through [`Context::run`].

use crate::error::{ClientError, ClientErrorKind};

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;


/// A request-scoped cancellation token plus an optional deadline.
#[derive(Clone, Debug, Default)]
pub struct Context {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Cancel operations that are still running after `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Attach an externally owned token; cancelling it cancels this context.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is cancelled or its deadline passes first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::new(ClientErrorKind::Cancelled));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ClientError::new(ClientErrorKind::Cancelled)),
            _ = deadline => Err(ClientError::new(ClientErrorKind::DeadlineExceeded)),
            result = fut => result,
        }
    }
}
