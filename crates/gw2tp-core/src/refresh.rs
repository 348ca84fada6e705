//! Price refresh orchestration: fetch, then re-anchor the "last updated"
//! label, then flash the popup.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use gw2tp_primitives::ItemId;
use tracing::{info, instrument};

use crate::{
    error::CoreError,
    feed::{ItemPrice, PriceFetcher, PriceSnapshot},
    history::PriceHistory,
    last_updated::LastUpdated,
    notifier::Notifier,
};

pub struct RefreshCycle<F: PriceFetcher> {
    fetcher: F,
    watch: Vec<ItemId>,
    ticker: LastUpdated,
    notifier: Notifier,
    history: PriceHistory,
}

impl<F: PriceFetcher> RefreshCycle<F> {
    pub fn new(fetcher: F, watch: Vec<ItemId>, ticker: LastUpdated, notifier: Notifier) -> Self {
        Self {
            fetcher,
            watch,
            ticker,
            notifier,
            history: PriceHistory::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn watch_list(&self) -> &[ItemId] {
        &self.watch
    }

    /// Add `id` to the watch list. Returns `false` if it was already there.
    pub fn watch(&mut self, id: ItemId) -> bool {
        if self.watch.contains(&id) {
            return false;
        }
        self.watch.push(id);
        true
    }

    /// Remove `id` from the watch list. Returns `false` if it was not there.
    pub fn unwatch(&mut self, id: ItemId) -> bool {
        let before = self.watch.len();
        self.watch.retain(|w| *w != id);
        self.watch.len() != before
    }

    pub fn ticker(&self) -> &LastUpdated {
        &self.ticker
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Fetch the watched prices, record them, then restart the
    /// "last updated" ticker and show the popup, in that order.
    ///
    /// A failed fetch, or one that comes back with no quotes, returns early
    /// and leaves the label and popup alone.
    #[instrument(skip(self), fields(source = self.fetcher.id(), items = self.watch.len()))]
    pub async fn refresh(&mut self) -> Result<Vec<ItemPrice>> {
        if self.watch.is_empty() {
            return Err(CoreError::EmptyWatchList.into());
        }

        let prices = self
            .fetcher
            .fetch_prices(&self.watch)
            .await
            .with_context(|| format!("failed to fetch prices from {}", self.fetcher.id()))?;
        if prices.is_empty() {
            return Err(CoreError::NoPrices.into());
        }

        let now = Utc::now();
        for price in &prices {
            self.history.record(PriceSnapshot::new(*price, now));
        }

        self.ticker.restart();
        self.notifier.show();
        info!(fetched = prices.len(), "prices fetched and updated");

        Ok(prices)
    }

    /// A manual refresh: [`Self::refresh`], then drop history older than
    /// `retention` as of `now` whether or not the fetch succeeded.
    pub async fn refresh_and_cleanup(
        &mut self,
        now: DateTime<Utc>,
        retention: TimeDelta,
    ) -> Result<Vec<ItemPrice>> {
        let outcome = self.refresh().await;
        let removed = self.cleanup(now, retention);
        if removed > 0 {
            info!(removed, "pruned history after refresh");
        }
        outcome
    }

    /// Drop history older than `retention`; returns the number removed.
    pub fn cleanup(&mut self, now: DateTime<Utc>, retention: TimeDelta) -> usize {
        self.history.cleanup_older_than(now, retention)
    }
}
