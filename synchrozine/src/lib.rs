//! Startup and shutdown synchronization for a dynamic set of async workers.
//!
//! A [`Synchrozine`] counts the workers a coordinator launches, lets the
//! coordinator wait until all of them are initialized, carries a single
//! terminal result injected from any task, broadcasts termination to the
//! workers and waits until every one of them has exited.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use synchrozine::{Background, SyncContext, SyncError, Synchrozine};
//!
//! #[derive(Debug, thiserror::Error, PartialEq)]
//! #[error("stop workers")]
//! struct Stop;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let synchro = Synchrozine::<Stop>::new();
//!
//! for _ in 0..2 {
//!   synchro.add();
//!   let synchro = synchro.clone();
//!   tokio::spawn(async move {
//!     let finish = synchro.append();
//!     finish.wait().await;
//!     synchro.done();
//!   });
//! }
//!
//! synchro.startup_sync(&Background).await.unwrap();
//! synchro.inject_err(Stop);
//!
//! let result = synchro.sync(&SyncContext::with_timeout(Duration::from_secs(1))).await;
//! assert!(matches!(result, Err(SyncError::Injected(Stop))));
//! # });
//! ```

mod config;
mod config_option;
mod deadline;
mod error;
mod finish_signal;
mod gate;
mod synchrozine;
mod worker_guard;

pub use self::{
  config::{Config, DEFAULT_NAME},
  config_option::ConfigOption,
  deadline::{Background, Deadline, SyncContext},
  error::{DeadlineError, ErrorReason, SyncError},
  finish_signal::FinishSignal,
  synchrozine::Synchrozine,
  worker_guard::WorkerGuard,
};
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;
