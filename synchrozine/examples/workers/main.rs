use std::time::Duration;

use clap::Parser;
use synchrozine::{ConfigOption, ErrorReason, SyncContext, SyncError, Synchrozine};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Runs ticking workers until a signal is injected")]
struct Args {
  /// Number of workers to spawn.
  #[arg(short, long, default_value_t = 4)]
  workers: usize,
  /// Milliseconds to run before injecting the signal.
  #[arg(short, long, default_value_t = 250)]
  run_ms: u64,
  /// Inject an error instead of a clean shutdown.
  #[arg(long)]
  fail: bool,
  /// Milliseconds the workers get to finish after the broadcast.
  #[arg(long, default_value_t = 1000)]
  drain_ms: u64,
}

#[tokio::main]
async fn main() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .try_init();
  let args = Args::parse();

  let synchro: Synchrozine = Synchrozine::from_options([ConfigOption::with_name("workers-example")]);

  for id in 0..args.workers {
    let guard = synchro.register();
    tokio::spawn(async move {
      let finish = guard.append();
      let mut ticker = tokio::time::interval(Duration::from_millis(50));
      let mut ticks = 0_u64;
      loop {
        tokio::select! {
          _ = finish.wait() => break,
          _ = ticker.tick() => ticks += 1,
        }
      }
      tracing::info!(id, ticks, "worker stopping");
    });
  }

  if let Err(err) = synchro.startup_sync(&SyncContext::with_timeout(Duration::from_secs(1))).await {
    tracing::error!(%err, "workers failed to start");
    return;
  }
  tracing::info!(workers = args.workers, "all workers started");

  let injector = synchro.clone();
  let (run_ms, fail) = (args.run_ms, args.fail);
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(run_ms)).await;
    if fail {
      let err: ErrorReason = "simulated failure".into();
      injector.inject_err(err);
    } else {
      injector.inject(None);
    }
  });

  let ctx = SyncContext::background().child_with_timeout(Duration::from_millis(args.run_ms + args.drain_ms));
  match synchro.sync(&ctx).await {
    Ok(()) => println!("clean shutdown"),
    Err(SyncError::Injected(err)) => println!("stopped by error: {}", err),
    Err(err) => println!("shutdown incomplete: {}", err),
  }
}
