use chrono::{DateTime, TimeDelta, Utc};
use gw2tp_primitives::ItemId;
use tracing::debug;

use crate::feed::PriceSnapshot;

pub const DEFAULT_RETENTION_DAYS: u32 = 14;

/// How far back [`PriceHistory::last_day`] looks.
pub const LAST_DAY_HOURS: i64 = 24;

/// In-memory record of fetched prices, oldest first.
#[derive(Debug, Default, Clone)]
pub struct PriceHistory {
    snapshots: Vec<PriceSnapshot>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: PriceSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot recorded before `now - retention`. Returns how
    /// many were removed.
    pub fn cleanup_older_than(&mut self, now: DateTime<Utc>, retention: TimeDelta) -> usize {
        let cutoff = now - retention;
        let before = self.snapshots.len();
        self.snapshots.retain(|s| s.recorded_at >= cutoff);
        let removed = before - self.snapshots.len();
        debug!(removed, %cutoff, "history cleanup");
        removed
    }

    /// Snapshots of `item` with `start <= recorded_at <= end`. Missing bounds
    /// are open.
    pub fn range(
        &self,
        item: ItemId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<PriceSnapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.price.id == item)
            .filter(|s| start.is_none_or(|start| s.recorded_at >= start))
            .filter(|s| end.is_none_or(|end| s.recorded_at <= end))
            .copied()
            .collect()
    }

    /// Snapshots of `item` from the 24 hours up to `now`.
    pub fn last_day(&self, item: ItemId, now: DateTime<Utc>) -> Vec<PriceSnapshot> {
        self.range(item, Some(now - TimeDelta::hours(LAST_DAY_HOURS)), Some(now))
    }

    pub fn latest(&self, item: ItemId) -> Option<&PriceSnapshot> {
        self.snapshots.iter().rev().find(|s| s.price.id == item)
    }
}

pub fn retention_days(days: u32) -> TimeDelta {
    TimeDelta::days(i64::from(days))
}
