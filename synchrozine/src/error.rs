use std::error::Error;

use thiserror::Error;

/// Default payload carried by [`crate::Synchrozine`].
pub type ErrorReason = Box<dyn Error + Send + Sync>;

/// Why a wait on a [`crate::Deadline`] was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DeadlineError {
  #[error("context canceled")]
  Canceled,
  #[error("context deadline exceeded")]
  DeadlineExceeded,
}

/// Failure outcome of [`crate::Synchrozine::sync`].
#[derive(Debug, Error)]
pub enum SyncError<E> {
  /// The value passed to `inject`, returned verbatim.
  #[error("{0}")]
  Injected(E),
  /// Workers did not finish before the deadline. The injected value is dropped.
  #[error(transparent)]
  Deadline(#[from] DeadlineError),
  /// The injected value was already returned by an earlier `sync`.
  #[error("signal already delivered")]
  AlreadyDelivered,
}

impl<E> SyncError<E> {
  pub fn injected(&self) -> Option<&E> {
    match self {
      SyncError::Injected(e) => Some(e),
      _ => None,
    }
  }

  pub fn into_injected(self) -> Option<E> {
    match self {
      SyncError::Injected(e) => Some(e),
      _ => None,
    }
  }

  pub fn deadline(&self) -> Option<DeadlineError> {
    match self {
      SyncError::Deadline(e) => Some(*e),
      _ => None,
    }
  }

  pub fn is_deadline(&self) -> bool {
    matches!(self, SyncError::Deadline(_))
  }
}

static_assertions::assert_impl_all!(DeadlineError: Send, Sync, Copy);
static_assertions::assert_impl_all!(SyncError<ErrorReason>: Send, Sync);
