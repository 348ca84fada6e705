//! Self-updating "last updated N seconds ago" label.
//!
//! [`LastUpdated`] owns the one repeating task that rewrites the label.
//! Restarting it resets the anchor and replaces the task; at most one task
//! per `LastUpdated` is ever live.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::widget::Label;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const JUST_NOW: &str = "Just now";

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;

/// Render whole elapsed seconds the way the label shows them.
///
/// Units are never mixed and never singularized: 60 seconds is
/// `"1 minutes ago"`, 70 minutes is `"1 hours ago"`.
pub fn format_elapsed(diff_secs: u64) -> String {
    if diff_secs < SECS_PER_MINUTE {
        format!("{diff_secs} seconds ago")
    } else if diff_secs < SECS_PER_HOUR {
        format!("{} minutes ago", diff_secs / SECS_PER_MINUTE)
    } else {
        format!("{} hours ago", diff_secs / SECS_PER_HOUR)
    }
}

pub struct LastUpdated {
    label: Label,
    period: Duration,
    anchor: Option<Instant>,
    /// Bumped on every restart/stop; a task only writes while it matches.
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl LastUpdated {
    pub fn new(label: Label) -> Self {
        Self::with_period(label, TICK_INTERVAL)
    }

    pub fn with_period(label: Label, period: Duration) -> Self {
        Self {
            label,
            period,
            anchor: None,
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// When the current anchor was set, if the ticker was ever started.
    pub fn anchor(&self) -> Option<Instant> {
        self.anchor
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Reset the anchor to now, show [`JUST_NOW`] and start a fresh repeating
    /// update, cancelling the previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restart(&mut self) {
        let generation = self.cancel();
        let anchor = Instant::now();
        self.anchor = Some(anchor);
        self.label.set_timestamp(Utc::now());
        self.label.set_text(JUST_NOW);

        let label = self.label.clone();
        let current = Arc::clone(&self.generation);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(anchor + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let text = format_elapsed(anchor.elapsed().as_secs());
                label.set_text_if(text, || current.load(Ordering::Acquire) == generation);
            }
        }));
    }

    /// Cancel the repeating update. The label keeps its last text.
    pub fn stop(&mut self) {
        self.cancel();
    }

    /// Abort the live task, if any, and return the new generation.
    fn cancel(&mut self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("cancelled previous last-updated ticker");
        }
        generation
    }
}

impl Drop for LastUpdated {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
