use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use crate::state::AppState;

/// Fixed-period driver for [`AppState::tick`].
pub struct SimulationClock;

/// Owns the running clock task.
///
/// Only [`ClockHandle::stop`] guarantees that no tick fires once it returns.
/// Dropping the handle requests an abort, but on a multi-thread runtime a
/// tick already being polled on another worker may still complete.
pub struct ClockHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SimulationClock {
    pub fn start(state: Arc<AppState>, period: Duration) -> ClockHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_clock(state, period, shutdown_rx));

        ClockHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run_clock(state: Arc<AppState>, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_ms = period.as_millis() as u64, "simulation clock started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            _ = ticker.tick() => {
                state.tick().await;
            }
        }
    }

    info!("simulation clock stopped");
}

impl ClockHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the clock and waits for an in-flight tick to finish. No tick
    /// fires after this returns.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    error!(error = %err, "simulation clock task failed");
                }
            }
        }
    }
}

// Best-effort fallback when the handle is dropped without `stop`.
impl Drop for ClockHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
