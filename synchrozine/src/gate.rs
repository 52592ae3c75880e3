use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Latched one-shot event.
///
/// `fire` releases every current waiter and every later call to `wait`
/// returns without suspending. A gate cannot be re-armed.
#[derive(Debug, Default)]
pub(crate) struct Gate {
  fired: AtomicBool,
  notify: Notify,
}

impl Gate {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Returns `true` only for the call that actually fired the gate.
  pub(crate) fn fire(&self) -> bool {
    if self.fired.swap(true, Ordering::AcqRel) {
      return false;
    }
    self.notify.notify_waiters();
    true
  }

  pub(crate) fn is_fired(&self) -> bool {
    self.fired.load(Ordering::Acquire)
  }

  pub(crate) async fn wait(&self) {
    loop {
      // `Notified` receives `notify_waiters` from the moment it is created,
      // so the flag check below cannot miss a concurrent `fire`.
      let notified = self.notify.notified();
      if self.is_fired() {
        return;
      }
      notified.await;
    }
  }
}
