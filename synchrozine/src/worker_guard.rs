use std::fmt::{Debug, Formatter};

use crate::error::ErrorReason;
use crate::finish_signal::FinishSignal;
use crate::synchrozine::Synchrozine;

/// Registration of one worker, released exactly once.
///
/// Obtained from [`Synchrozine::register`]. Dropping the guard calls
/// [`Synchrozine::done`], so a worker that returns early or panics is still
/// deregistered.
#[must_use = "dropping the guard deregisters the worker immediately"]
pub struct WorkerGuard<E = ErrorReason> {
  synchrozine: Synchrozine<E>,
}

impl<E> WorkerGuard<E> {
  pub(crate) fn new(synchrozine: Synchrozine<E>) -> Self {
    Self { synchrozine }
  }

  /// Startup checkpoint of the guarded worker.
  pub fn append(&self) -> FinishSignal {
    self.synchrozine.append()
  }

  /// Deregisters the worker. Equivalent to dropping the guard.
  pub fn done(self) {
    drop(self);
  }
}

impl<E> Drop for WorkerGuard<E> {
  fn drop(&mut self) {
    self.synchrozine.done();
  }
}

impl<E> Debug for WorkerGuard<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WorkerGuard")
      .field("synchrozine", &self.synchrozine)
      .finish()
  }
}
