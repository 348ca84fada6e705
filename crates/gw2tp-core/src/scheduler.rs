use std::{sync::Arc, time::Duration};

use chrono::{TimeDelta, Utc};
use tokio::{
    sync::{Mutex, mpsc},
    time::MissedTickBehavior,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    feed::PriceFetcher,
    history::{DEFAULT_RETENTION_DAYS, retention_days},
    refresh::RefreshCycle,
};

/// Capacity of the command channel into [`run_scheduler`]. Commands are
/// human-paced.
pub const SCHEDULER_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub refresh_every: Duration,
    pub cleanup_every: Duration,
    pub retention: TimeDelta,
}

impl Schedule {
    /// Refresh every 15 minutes, clean up once a day.
    pub fn production() -> Self {
        Self {
            refresh_every: Duration::from_secs(15 * 60),
            cleanup_every: Duration::from_secs(24 * 60 * 60),
            retention: retention_days(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Refresh every 10 seconds, clean up hourly.
    pub fn dev() -> Self {
        Self {
            refresh_every: Duration::from_secs(10),
            cleanup_every: Duration::from_secs(60 * 60),
            retention: retention_days(DEFAULT_RETENTION_DAYS),
        }
    }

    pub fn with_retention(mut self, retention: TimeDelta) -> Self {
        self.retention = retention;
        self
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::production()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    RefreshNow,
    Stop,
}

/// Periodically refresh prices and prune history until told to stop.
///
/// Exits on [`SchedulerCommand::Stop`] or when every command sender has been
/// dropped. Failed refreshes are logged and retried on the next tick.
#[instrument(skip_all, fields(
    refresh_secs = schedule.refresh_every.as_secs(),
    cleanup_secs = schedule.cleanup_every.as_secs(),
))]
pub async fn run_scheduler<F: PriceFetcher>(
    cycle: Arc<Mutex<RefreshCycle<F>>>,
    schedule: Schedule,
    mut commands: mpsc::Receiver<SchedulerCommand>,
) {
    let mut refresh_timer = tokio::time::interval(schedule.refresh_every);
    refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cleanup_timer = tokio::time::interval(schedule.cleanup_every);
    cleanup_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately. Consume it so both timers
    // start from now.
    refresh_timer.tick().await;
    cleanup_timer.tick().await;

    info!("scheduler started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(SchedulerCommand::RefreshNow) => {
                        refresh(&cycle).await;
                        refresh_timer.reset();
                    }
                    Some(SchedulerCommand::Stop) | None => break,
                }
            }
            _ = refresh_timer.tick() => refresh(&cycle).await,
            _ = cleanup_timer.tick() => {
                let removed = cycle.lock().await.cleanup(Utc::now(), schedule.retention);
                info!(removed, "history cleanup completed");
            }
        }
    }

    info!("scheduler exiting");
}

async fn refresh<F: PriceFetcher>(cycle: &Mutex<RefreshCycle<F>>) {
    match cycle.lock().await.refresh().await {
        Ok(prices) => debug!(fetched = prices.len(), "scheduled refresh done"),
        Err(e) => warn!(error = ?e, "scheduled refresh failed"),
    }
}
