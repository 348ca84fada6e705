use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use gw2tp_core::{
    Schedule, TradingPostFee,
    history::{DEFAULT_RETENTION_DAYS, retention_days},
};
use rust_decimal::Decimal;

pub const DEFAULT_API_URL: &str = "https://api.guildwars2.com";

/// Configuration for the `gw2tp` terminal client.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Guild Wars 2 Trading Post toolkit")]
pub struct AppConfig {
    /// Base URL of the GW2 API (or a mirror).
    #[arg(long, env = "GW2TP_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Trading Post fee deducted from sell totals, in percent.
    #[arg(long, env = "GW2TP_FEE_PERCENT", default_value = "15")]
    pub fee_percent: Decimal,

    /// Refresh prices in the background on a fixed schedule.
    #[arg(long, env = "GW2TP_AUTO_REFRESH")]
    pub auto_refresh: bool,

    /// Use the short development schedule.
    #[arg(long, env = "GW2TP_DEV")]
    pub dev: bool,

    /// Days of price history to keep.
    #[arg(long, env = "GW2TP_RETENTION_DAYS", default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Serve prices from a built-in board instead of the API.
    #[arg(long, env = "GW2TP_OFFLINE")]
    pub offline: bool,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    /// Load configuration from CLI args and environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn fee(&self) -> Result<TradingPostFee> {
        TradingPostFee::from_percent(self.fee_percent)
            .with_context(|| format!("invalid --fee-percent: {}", self.fee_percent))
    }

    pub fn retention(&self) -> TimeDelta {
        retention_days(self.retention_days)
    }

    /// The production or dev schedule, with the configured retention.
    pub fn schedule(&self) -> Schedule {
        let base = if self.dev {
            Schedule::dev()
        } else {
            Schedule::production()
        };
        base.with_retention(self.retention())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_app_config_defaults() -> Result<()> {
        let config = AppConfig::parse_from(["test"]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.fee_percent, Decimal::from(15));
        assert!(!config.auto_refresh);
        assert!(!config.dev);
        assert!(!config.offline);
        assert!(!config.verbose);
        assert_eq!(config.retention_days, 14);
        assert_eq!(config.fee()?, TradingPostFee::default());
        assert_eq!(config.schedule(), Schedule::production());
        Ok(())
    }

    #[test]
    fn test_app_config_custom_args() -> Result<()> {
        let config = AppConfig::parse_from([
            "test",
            "--api-url",
            "http://127.0.0.1:9000",
            "--fee-percent",
            "12.5",
            "--auto-refresh",
            "--dev",
            "--retention-days",
            "3",
            "--offline",
            "-v",
        ]);
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.fee()?.rate(), Decimal::new(125, 3));
        assert!(config.auto_refresh);
        assert!(config.offline);
        assert!(config.verbose);

        let schedule = config.schedule();
        assert_eq!(schedule.refresh_every, Duration::from_secs(10));
        assert_eq!(schedule.retention, TimeDelta::days(3));
        Ok(())
    }

    #[test]
    fn test_app_config_rejects_out_of_range_fee() {
        let config = AppConfig::parse_from(["test", "--fee-percent", "150"]);
        assert!(config.fee().is_err());
    }

    #[test]
    fn test_app_config_rejects_non_numeric_fee() {
        let result = AppConfig::try_parse_from(["test", "--fee-percent", "lots"]);
        assert!(result.is_err());
    }
}
