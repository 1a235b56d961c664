//! Sweep runner: drives the retention sweeper until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::jobs::RetentionSweeper;

/// Runs [`RetentionSweeper::sweep_once`] on a fixed interval.
#[derive(Debug)]
pub struct SweepRunner {
    /// The sweeper to drive
    sweeper: Arc<RetentionSweeper>,
    /// Time between sweeps
    interval: Duration,
}

impl SweepRunner {
    /// Create a new sweep runner
    pub fn new(sweeper: Arc<RetentionSweeper>, interval: Duration) -> Self {
        Self { sweeper, interval }
    }

    /// Run until the cancel signal turns `true` or its sender is dropped.
    /// The first sweep happens one interval after start.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Retention sweeper started"
        );

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Retention sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let report = self.sweeper.sweep_once(time::Instant::now().into_std()).await;
                    if report.is_empty() {
                        tracing::debug!("Retention sweep found nothing to reclaim");
                    } else {
                        tracing::info!(
                            uploads_removed = report.uploads_removed,
                            jobs_removed = report.jobs_removed,
                            drivers_aborted = report.drivers_aborted,
                            "Retention sweep completed"
                        );
                    }
                }
            }
        }

        tracing::info!("Retention sweeper stopped");
    }
}
