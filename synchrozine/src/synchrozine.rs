use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::config::Config;
use crate::config_option::ConfigOption;
use crate::deadline::Deadline;
use crate::error::{DeadlineError, ErrorReason, SyncError};
use crate::finish_signal::FinishSignal;
use crate::gate::Gate;
use crate::worker_guard::WorkerGuard;

/// Startup and shutdown barrier for a dynamic set of workers.
///
/// One round per instance:
///
/// 1. the coordinator calls [`add`](Self::add) before spawning each worker,
/// 2. every worker calls [`append`](Self::append) once it is initialized and
///    keeps the returned [`FinishSignal`],
/// 3. the coordinator waits in [`startup_sync`](Self::startup_sync),
/// 4. any task calls [`inject`](Self::inject) with the terminal result,
/// 5. the coordinator calls [`sync`](Self::sync), which broadcasts termination
///    and returns the injected value once every worker has called
///    [`done`](Self::done).
///
/// # Preconditions
///
/// `add` and `done` must be balanced and `inject` must eventually be called.
/// Violations are not reported: they show up as a wait that never completes
/// or as a counter that went negative.
pub struct Synchrozine<E = ErrorReason> {
  inner: Arc<Inner<E>>,
}

struct Inner<E> {
  name: String,
  counters: Mutex<Counters>,
  signal: Mutex<Signal<E>>,
  injected: Notify,
  started: Notify,
  finished: Notify,
  terminated: Arc<Gate>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
  live: isize,
  starting: isize,
}

enum Signal<E> {
  Empty,
  Committed(Option<E>),
  Delivered,
}

impl<E> Signal<E> {
  fn state(&self) -> &'static str {
    match self {
      Signal::Empty => "empty",
      Signal::Committed(_) => "committed",
      Signal::Delivered => "delivered",
    }
  }
}

impl<E> Synchrozine<E> {
  pub fn new() -> Self {
    Self::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Self {
    let synchrozine = Self {
      inner: Arc::new(Inner {
        name: config.name,
        counters: Mutex::new(Counters::default()),
        signal: Mutex::new(Signal::Empty),
        injected: Notify::new(),
        started: Notify::new(),
        finished: Notify::new(),
        terminated: Arc::new(Gate::new()),
      }),
    };
    synchrozine.add_many(config.initial_workers);
    synchrozine
  }

  pub fn from_options(options: impl IntoIterator<Item = ConfigOption>) -> Self {
    Self::with_config(Config::from(options))
  }

  pub fn name(&self) -> &str {
    &self.inner.name
  }

  /// Registers one worker. Call before the worker is spawned.
  pub fn add(&self) {
    self.add_many(1);
  }

  /// Registers `count` workers at once.
  pub fn add_many(&self, count: usize) {
    if count == 0 {
      return;
    }
    let n = isize::try_from(count).unwrap_or(isize::MAX);
    let counters = {
      let mut counters = self.inner.counters.lock();
      counters.live = counters.live.saturating_add(n);
      counters.starting = counters.starting.saturating_add(n);
      *counters
    };
    tracing::debug!(
      name = %self.inner.name,
      live = counters.live,
      starting = counters.starting,
      "workers registered"
    );
  }

  /// Registers one worker and returns a guard that deregisters it on drop.
  pub fn register(&self) -> WorkerGuard<E> {
    self.add();
    WorkerGuard::new(self.clone())
  }

  /// Deregisters one worker. The worker's last action before exiting.
  pub fn done(&self) {
    let live = {
      let mut counters = self.inner.counters.lock();
      counters.live -= 1;
      counters.live
    };
    tracing::debug!(name = %self.inner.name, live, "worker done");
    if live == 0 {
      tracing::debug!(name = %self.inner.name, "all workers finished");
      self.inner.finished.notify_waiters();
    }
  }

  /// Startup checkpoint. Returns the handle that reports termination.
  pub fn append(&self) -> FinishSignal {
    let starting = {
      let mut counters = self.inner.counters.lock();
      counters.starting -= 1;
      counters.starting
    };
    tracing::debug!(name = %self.inner.name, starting, "worker started");
    if starting <= 0 {
      tracing::debug!(name = %self.inner.name, "all workers started");
      self.inner.started.notify_waiters();
    }
    FinishSignal::new(self.inner.terminated.clone())
  }

  /// Waits until every registered worker has called [`append`](Self::append).
  ///
  /// Returns immediately when no worker is pending, including when none was
  /// ever registered.
  pub async fn startup_sync<D>(&self, deadline: &D) -> Result<(), DeadlineError>
  where
    D: Deadline + ?Sized, {
    let started = async {
      loop {
        let notified = self.inner.started.notified();
        if self.counters().starting <= 0 {
          return;
        }
        notified.await;
      }
    };

    tokio::select! {
      biased;
      _ = started => Ok(()),
      reason = deadline.expired() => {
        tracing::warn!(name = %self.inner.name, pending = self.counters().starting, %reason, "startup wait interrupted");
        Err(reason)
      }
    }
  }

  /// Commits the terminal result. Only the first call has effect.
  ///
  /// `None` requests a clean shutdown. Returns `true` if this call's value was
  /// the one committed.
  pub fn inject(&self, signal: Option<E>) -> bool {
    let rejected = {
      let mut slot = self.inner.signal.lock();
      match *slot {
        Signal::Empty => {
          *slot = Signal::Committed(signal);
          None
        }
        _ => Some(signal),
      }
    };
    match rejected {
      None => {
        tracing::debug!(name = %self.inner.name, "signal injected");
        self.inner.injected.notify_waiters();
        true
      }
      Some(_) => {
        tracing::trace!(name = %self.inner.name, "signal already injected, ignoring");
        false
      }
    }
  }

  pub fn inject_err(&self, err: E) -> bool {
    self.inject(Some(err))
  }

  /// Waits for the injected signal, broadcasts termination to every
  /// [`FinishSignal`] and waits for all workers to call [`done`](Self::done).
  ///
  /// `Ok(())` means a clean shutdown was injected. If the deadline triggers
  /// first the injected value is dropped, and workers may still be running.
  pub async fn sync<D>(&self, deadline: &D) -> Result<(), SyncError<E>>
  where
    D: Deadline + ?Sized, {
    let injected = async {
      loop {
        let notified = self.inner.injected.notified();
        if let Some(signal) = self.take_signal() {
          return signal;
        }
        notified.await;
      }
    };

    let signal = tokio::select! {
      biased;
      signal = injected => signal?,
      reason = deadline.expired() => {
        tracing::warn!(name = %self.inner.name, %reason, "wait for signal interrupted");
        return Err(reason.into());
      }
    };

    if self.inner.terminated.fire() {
      tracing::debug!(name = %self.inner.name, "termination broadcast");
    }

    let drained = async {
      loop {
        let notified = self.inner.finished.notified();
        if self.counters().live <= 0 {
          return;
        }
        notified.await;
      }
    };

    tokio::select! {
      biased;
      _ = drained => {}
      reason = deadline.expired() => {
        tracing::warn!(name = %self.inner.name, live = self.counters().live, %reason, "drain interrupted");
        return Err(reason.into());
      }
    }

    tracing::debug!(name = %self.inner.name, clean = signal.is_none(), "signal delivered");
    match signal {
      None => Ok(()),
      Some(err) => Err(SyncError::Injected(err)),
    }
  }

  pub fn live_count(&self) -> usize {
    self.counters().live.max(0) as usize
  }

  pub fn pending_startup(&self) -> usize {
    self.counters().starting.max(0) as usize
  }

  pub fn is_injected(&self) -> bool {
    !matches!(*self.inner.signal.lock(), Signal::Empty)
  }

  pub fn is_terminated(&self) -> bool {
    self.inner.terminated.is_fired()
  }

  fn counters(&self) -> Counters {
    *self.inner.counters.lock()
  }

  /// `None` while nothing is committed.
  fn take_signal(&self) -> Option<Result<Option<E>, SyncError<E>>> {
    let mut slot = self.inner.signal.lock();
    match std::mem::replace(&mut *slot, Signal::Delivered) {
      Signal::Empty => {
        *slot = Signal::Empty;
        None
      }
      Signal::Committed(signal) => Some(Ok(signal)),
      Signal::Delivered => Some(Err(SyncError::AlreadyDelivered)),
    }
  }
}

impl<E> Clone for Synchrozine<E> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<E> Default for Synchrozine<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> PartialEq for Synchrozine<E> {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl<E> Eq for Synchrozine<E> {}

impl<E> Debug for Synchrozine<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let counters = self.counters();
    let signal = self.inner.signal.lock().state();
    f.debug_struct("Synchrozine")
      .field("name", &self.inner.name)
      .field("live", &counters.live)
      .field("starting", &counters.starting)
      .field("signal", &signal)
      .field("terminated", &self.is_terminated())
      .finish()
  }
}

static_assertions::assert_impl_all!(Synchrozine: Send, Sync, Clone);
