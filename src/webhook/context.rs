//! Cancellation and deadline scope for a send.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use super::HttpError;

/// The caller's cancellation and deadline scope for a request.
///
/// A context is done once it has been cancelled through its
/// [`CancelHandle`] or once its deadline has passed. Cancellation is
/// reported ahead of the deadline when both apply.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use feishu_bot::webhook::Context;
///
/// let (ctx, handle) = Context::background()
///     .with_timeout(Duration::from_secs(5))
///     .with_cancel();
/// handle.cancel();
/// assert!(ctx.is_done());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels the [`Context`] it was created with, and every clone of it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancels the context. Calling it again has no further effect.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// Returns a context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Sets the deadline to `timeout` from now.
    ///
    /// An earlier existing deadline is kept. A timeout too large to
    /// represent as an instant leaves the context unchanged.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Sets the deadline.
    ///
    /// An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Makes the context cancellable and returns the handle that cancels it.
    ///
    /// Replaces any cancellation source the context already had.
    #[must_use]
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left until the deadline, if any.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Returns the error for a done context, or `None` if it is still live.
    #[must_use]
    pub fn err(&self) -> Option<HttpError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(HttpError::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Some(HttpError::DeadlineExceeded);
        }
        None
    }

    /// Returns true if the context has been cancelled or its deadline passed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Completes when the context is done, yielding the matching error.
    ///
    /// Never completes for a context without cancellation or deadline.
    pub async fn done(&self) -> HttpError {
        tokio::select! {
            biased;

            () = self.cancelled() => HttpError::Cancelled,
            () = self.deadline_reached() => HttpError::DeadlineExceeded,
        }
    }

    async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Handle dropped without cancelling
            std::future::pending::<()>().await;
        }
    }

    async fn deadline_reached(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
