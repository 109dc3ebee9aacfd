//! Per-call cancellation and deadlines.
//!
//! Every API call takes a [`RequestContext`]. The pipeline races the whole
//! exchange, from sending the request to reading the last body byte, against
//! the context. When the context is cancelled the call returns
//! [`Error::Cancelled`]; when its deadline elapses the call returns
//! [`Error::Timeout`]. In both cases the in-flight request is dropped, which
//! closes the connection.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use sevalla_api::{CancellationToken, RequestContext};
//!
//! let (token, receiver) = CancellationToken::new();
//! let ctx = RequestContext::default()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancellation(receiver);
//!
//! tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//!     token.cancel();
//! });
//!
//! let result = client.applications().list(&ctx, None).await;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::clients::errors::Error;

/// The cancelling half of a cancellation pair.
///
/// Dropping the token without calling [`cancel`](Self::cancel) leaves the
/// receivers pending forever.
#[derive(Debug)]
pub struct CancellationToken {
    sender: watch::Sender<bool>,
}

impl CancellationToken {
    /// Creates a token and the receiver to pass into a [`RequestContext`].
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancellationReceiver { receiver })
    }

    /// Cancels every context holding a receiver of this token.
    ///
    /// Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

/// The observing half of a cancellation pair. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationReceiver {
    /// Returns `true` if the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                // Token dropped without cancelling
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Cancellation and deadline for a single API call.
///
/// `RequestContext::default()` has neither and lets the call run until the
/// transport's own timeout.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    timeout: Option<Duration>,
    cancellation: Option<CancellationReceiver>,
}

impl RequestContext {
    /// Creates a context with no deadline and no cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a deadline for the whole exchange.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation receiver.
    #[must_use]
    pub fn with_cancellation(mut self, receiver: CancellationReceiver) -> Self {
        self.cancellation = Some(receiver);
        self
    }

    /// Returns the deadline, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns `true` if the attached token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationReceiver::is_cancelled)
    }

    /// Runs `exchange` under this context.
    pub(crate) async fn run<F, T>(&self, exchange: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let guarded = async {
            match &self.cancellation {
                Some(receiver) => {
                    tokio::select! {
                        result = exchange => result,
                        () = receiver.cancelled() => Err(Error::Cancelled),
                    }
                }
                None => exchange.await,
            }
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, guarded)
                .await
                .map_err(|_| Error::Timeout { timeout })?,
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_receiver_pending_until_cancel() {
        let (token, receiver) = CancellationToken::new();
        let mut cancelled = task::spawn(receiver.cancelled());

        assert_pending!(cancelled.poll());
        assert!(!receiver.is_cancelled());

        token.cancel();
        assert!(cancelled.is_woken());
        assert_ready!(cancelled.poll());
        assert!(receiver.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (token, receiver) = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(receiver.is_cancelled());
    }

    #[test]
    fn test_dropped_token_never_cancels() {
        let (token, receiver) = CancellationToken::new();
        let mut cancelled = task::spawn(receiver.cancelled());
        assert_pending!(cancelled.poll());

        drop(token);
        assert_pending!(cancelled.poll());
        assert!(!receiver.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_without_limits_returns_result() {
        let ctx = RequestContext::default();
        let result = ctx.run(async { Ok::<_, Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_already_cancelled_short_circuits() {
        let (token, receiver) = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new().with_cancellation(receiver);

        let polled = AtomicBool::new(false);
        let result = ctx
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok::<_, Error>(())
            })
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_run_cancelled_mid_flight() {
        let (token, receiver) = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(receiver);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, Error>(())
            })
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_run_deadline_elapses() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(20));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, Error>(())
            })
            .await;
        match result {
            Err(Error::Timeout { timeout }) => assert_eq!(timeout, Duration::from_millis(20)),
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }
}
