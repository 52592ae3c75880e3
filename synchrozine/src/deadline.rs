use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DeadlineError;

/// Caller-owned capability that bounds a wait.
///
/// [`crate::Synchrozine::startup_sync`] and [`crate::Synchrozine::sync`] race
/// their gate against `expired`; the barrier never creates or owns one.
#[async_trait]
pub trait Deadline: Send + Sync {
  /// Resolves once the capability triggers, yielding why.
  async fn expired(&self) -> DeadlineError;

  /// Non-blocking check, `None` while the capability is still live.
  fn err(&self) -> Option<DeadlineError>;
}

/// A deadline that never triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Background;

#[async_trait]
impl Deadline for Background {
  async fn expired(&self) -> DeadlineError {
    std::future::pending().await
  }

  fn err(&self) -> Option<DeadlineError> {
    None
  }
}

#[async_trait]
impl Deadline for CancellationToken {
  async fn expired(&self) -> DeadlineError {
    self.cancelled().await;
    DeadlineError::Canceled
  }

  fn err(&self) -> Option<DeadlineError> {
    self.is_cancelled().then_some(DeadlineError::Canceled)
  }
}

#[async_trait]
impl Deadline for Instant {
  async fn expired(&self) -> DeadlineError {
    tokio::time::sleep_until(*self).await;
    DeadlineError::DeadlineExceeded
  }

  fn err(&self) -> Option<DeadlineError> {
    (Instant::now() >= *self).then_some(DeadlineError::DeadlineExceeded)
  }
}

/// Cancellation token plus optional point in time.
///
/// Clones share the token, so canceling any clone cancels them all.
/// Cancellation takes precedence over an elapsed deadline.
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
  token: CancellationToken,
  deadline: Option<Instant>,
}

impl SyncContext {
  pub fn background() -> Self {
    Self::default()
  }

  pub fn with_cancel(token: CancellationToken) -> Self {
    Self { token, deadline: None }
  }

  pub fn with_deadline(deadline: Instant) -> Self {
    Self {
      token: CancellationToken::new(),
      deadline: Some(deadline),
    }
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self::with_deadline(Instant::now() + timeout)
  }

  /// Derives a context canceled together with `self` but cancelable on its own.
  /// The deadline is the earlier of the inherited one and `timeout` from now.
  pub fn child_with_timeout(&self, timeout: Duration) -> Self {
    let at = Instant::now() + timeout;
    Self {
      token: self.token.child_token(),
      deadline: Some(self.deadline.map_or(at, |inherited| inherited.min(at))),
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
}

#[async_trait]
impl Deadline for SyncContext {
  async fn expired(&self) -> DeadlineError {
    match self.deadline {
      Some(at) => {
        tokio::select! {
          biased;
          _ = self.token.cancelled() => DeadlineError::Canceled,
          _ = tokio::time::sleep_until(at) => DeadlineError::DeadlineExceeded,
        }
      }
      None => {
        self.token.cancelled().await;
        DeadlineError::Canceled
      }
    }
  }

  fn err(&self) -> Option<DeadlineError> {
    Deadline::err(&self.token).or_else(|| self.deadline.as_ref().and_then(Deadline::err))
  }
}
