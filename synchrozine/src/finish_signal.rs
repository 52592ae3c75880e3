use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::gate::Gate;

/// Read-only handle a worker waits on to learn when to terminate.
///
/// All handles of one barrier observe the same broadcast. A handle obtained
/// after the broadcast reports termination immediately.
///
/// ```rust
/// # use synchrozine::{Background, Synchrozine};
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let synchro = Synchrozine::<std::io::Error>::new();
/// synchro.add();
/// let finish = synchro.append();
/// assert!(!finish.is_finished());
///
/// synchro.inject(None);
/// let coordinator = synchro.clone();
/// let sync = tokio::spawn(async move { coordinator.sync(&Background).await });
///
/// finish.wait().await;
/// synchro.done();
/// assert!(sync.await.unwrap().is_ok());
/// # });
/// ```
#[derive(Clone)]
pub struct FinishSignal {
  gate: Arc<Gate>,
}

impl FinishSignal {
  pub(crate) fn new(gate: Arc<Gate>) -> Self {
    Self { gate }
  }

  /// Suspends until termination has been broadcast.
  pub async fn wait(&self) {
    self.gate.wait().await;
  }

  pub fn is_finished(&self) -> bool {
    self.gate.is_fired()
  }
}

impl Debug for FinishSignal {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FinishSignal")
      .field("finished", &self.is_finished())
      .finish()
  }
}

impl PartialEq for FinishSignal {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.gate, &other.gate)
  }
}

impl Eq for FinishSignal {}
