//! Manual flip calculator: buy price in, sell price in, net profit out.

use std::fmt;

use gw2tp_primitives::{Coins, Gsc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use tracing::debug;

use crate::{
    error::CoreError,
    widget::{Color, Label},
};

/// The Trading Post keeps this share of every sale (listing fee plus
/// exchange fee).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingPostFee {
    rate: Decimal,
}

impl TradingPostFee {
    /// `rate` is the fraction withheld, e.g. `0.15`.
    pub fn new(rate: Decimal) -> Result<Self, CoreError> {
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(CoreError::InvalidFee(rate));
        }
        Ok(Self { rate })
    }

    pub fn from_percent(percent: Decimal) -> Result<Self, CoreError> {
        Self::new(percent / Decimal::ONE_HUNDRED)
    }

    pub fn rate(self) -> Decimal {
        self.rate
    }

    pub fn percent(self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }

    /// What the seller receives for `gross`, rounded down to whole copper.
    pub fn apply(self, gross: Coins) -> Coins {
        let net = (Decimal::from(gross.copper()) * (Decimal::ONE - self.rate)).floor();
        let copper = net.to_i64().unwrap_or(if net.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Coins::from_copper(copper)
    }
}

impl Default for TradingPostFee {
    fn default() -> Self {
        Self {
            rate: Decimal::new(15, 2),
        }
    }
}

/// Parse a form field the lenient way: optional leading whitespace and sign,
/// then as many digits as are present. Anything unparseable is 0.
///
/// `"12abc"` is 12, `"3.9"` is 3, `""` and `"abc"` are 0. Values beyond the
/// `i64` range saturate.
pub fn parse_field(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// One side of a manual entry, in the three denominations as typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceEntry {
    pub gold: i64,
    pub silver: i64,
    pub copper: i64,
}

impl PriceEntry {
    pub fn new(gold: i64, silver: i64, copper: i64) -> Self {
        Self {
            gold,
            silver,
            copper,
        }
    }

    /// Build from raw field contents; see [`parse_field`].
    pub fn parse(gold: Option<&str>, silver: Option<&str>, copper: Option<&str>) -> Self {
        Self::new(parse_field(gold), parse_field(silver), parse_field(copper))
    }

    pub fn total(self) -> Coins {
        Coins::from_gsc(self.gold, self.silver, self.copper)
    }
}

impl fmt::Display for PriceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g {}s {}c", self.gold, self.silver, self.copper)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualTrade {
    pub buy: PriceEntry,
    pub sell: PriceEntry,
}

impl ManualTrade {
    pub fn new(buy: PriceEntry, sell: PriceEntry) -> Self {
        Self { buy, sell }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitReport {
    pub buy_total: Coins,
    pub sell_total: Coins,
    pub sell_after_fee: Coins,
    pub profit: Coins,
}

impl ProfitReport {
    pub fn compute(trade: &ManualTrade, fee: TradingPostFee) -> Self {
        let buy_total = trade.buy.total();
        let sell_total = trade.sell.total();
        let sell_after_fee = fee.apply(sell_total);
        Self {
            buy_total,
            sell_total,
            sell_after_fee,
            profit: sell_after_fee - buy_total,
        }
    }

    pub fn is_loss(&self) -> bool {
        self.profit.is_sign_negative()
    }

    /// Denominations of the absolute profit; identical for a profit and a
    /// loss of the same size.
    pub fn breakdown(&self) -> Gsc {
        self.profit.magnitude()
    }

    pub fn color(&self) -> Color {
        if self.is_loss() { Color::Red } else { Color::Gold }
    }
}

impl fmt::Display for ProfitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_loss() { "Loss" } else { "Profit" };
        write!(f, "{kind}: {}", self.breakdown())
    }
}

/// Compute the profit of a manual entry and write it to `result`.
pub fn calculate_manual_profit(
    trade: &ManualTrade,
    fee: TradingPostFee,
    result: &Label,
) -> ProfitReport {
    debug!(buy = %trade.buy, sell = %trade.sell, "calculating profit");

    let report = ProfitReport::compute(trade, fee);
    debug!(profit = report.profit.copper(), "profit calculated");

    result.set_text(report.to_string());
    result.set_color(report.color());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(buy: (i64, i64, i64), sell: (i64, i64, i64)) -> ManualTrade {
        ManualTrade::new(
            PriceEntry::new(buy.0, buy.1, buy.2),
            PriceEntry::new(sell.0, sell.1, sell.2),
        )
    }

    #[test]
    fn test_parse_field_leading_integer() {
        assert_eq!(parse_field(Some("42")), 42);
        assert_eq!(parse_field(Some("  7")), 7);
        assert_eq!(parse_field(Some("12abc")), 12);
        assert_eq!(parse_field(Some("3.9")), 3);
        assert_eq!(parse_field(Some("+5")), 5);
        assert_eq!(parse_field(Some("-8")), -8);
    }

    #[test]
    fn test_parse_field_garbage_is_zero() {
        assert_eq!(parse_field(None), 0);
        assert_eq!(parse_field(Some("")), 0);
        assert_eq!(parse_field(Some("abc")), 0);
        assert_eq!(parse_field(Some("-")), 0);
        assert_eq!(parse_field(Some("-0")), 0);
        assert_eq!(parse_field(Some("g12")), 0);
        // no radix prefixes: reads the leading 0 and stops at 'x'
        assert_eq!(parse_field(Some("0x10")), 0);
    }

    #[test]
    fn test_parse_field_saturates() {
        assert_eq!(parse_field(Some("99999999999999999999999")), i64::MAX);
        assert_eq!(parse_field(Some("-99999999999999999999999")), i64::MIN);
    }

    #[test]
    fn test_price_entry_parse_treats_missing_as_zero() {
        let entry = PriceEntry::parse(Some("1"), None, Some("x"));
        assert_eq!(entry, PriceEntry::new(1, 0, 0));
        assert_eq!(entry.total(), Coins::from_copper(10_000));
    }

    #[test]
    fn test_fee_default_is_fifteen_percent() {
        let fee = TradingPostFee::default();
        assert_eq!(fee.rate(), Decimal::new(15, 2));
        assert_eq!(fee.apply(Coins::from_copper(20_000)), Coins::from_copper(17_000));
        // 0.85 * 101 = 85.85
        assert_eq!(fee.apply(Coins::from_copper(101)), Coins::from_copper(85));
        assert_eq!(fee.apply(Coins::from_copper(1)), Coins::ZERO);
    }

    #[test]
    fn test_fee_rounds_negative_totals_down() {
        let fee = TradingPostFee::default();
        // 0.85 * -1 = -0.85
        assert_eq!(fee.apply(Coins::from_copper(-1)), Coins::from_copper(-1));
    }

    #[test]
    fn test_fee_from_percent_and_bounds() -> anyhow::Result<()> {
        let fee = TradingPostFee::from_percent(Decimal::from(15))?;
        assert_eq!(fee, TradingPostFee::default());
        assert_eq!(fee.percent().to_string(), "15");
        assert_eq!(
            TradingPostFee::new(Decimal::new(125, 3))?.percent().to_string(),
            "12.5"
        );

        assert_eq!(
            TradingPostFee::new(Decimal::new(-1, 2)),
            Err(CoreError::InvalidFee(Decimal::new(-1, 2)))
        );
        assert!(TradingPostFee::from_percent(Decimal::from(101)).is_err());
        assert!(TradingPostFee::from_percent(Decimal::ZERO).is_ok());
        Ok(())
    }

    #[test]
    fn test_fee_apply_extremes_do_not_panic() {
        let fee = TradingPostFee::default();
        assert!(fee.apply(Coins::from_copper(i64::MAX)).copper() > 0);
        assert!(fee.apply(Coins::from_copper(i64::MIN)).copper() < 0);
    }

    #[test]
    fn test_profit_one_gold_to_two_gold() {
        let report = ProfitReport::compute(&trade((1, 0, 0), (2, 0, 0)), TradingPostFee::default());
        assert_eq!(report.buy_total.copper(), 10_000);
        assert_eq!(report.sell_total.copper(), 20_000);
        assert_eq!(report.sell_after_fee.copper(), 17_000);
        assert_eq!(report.profit.copper(), 7_000);
        assert_eq!(report.to_string(), "Profit: 0g 70s 0c");
        assert_eq!(report.color(), Color::Gold);
    }

    #[test]
    fn test_loss_five_gold_to_three_gold() {
        let report = ProfitReport::compute(&trade((5, 0, 0), (3, 0, 0)), TradingPostFee::default());
        assert_eq!(report.sell_after_fee.copper(), 25_500);
        assert_eq!(report.profit.copper(), -24_500);
        assert!(report.is_loss());
        assert_eq!(report.to_string(), "Loss: 2g 45s 0c");
        assert_eq!(report.color(), Color::Red);
    }

    #[test]
    fn test_all_zero_is_zero_profit() {
        let report = ProfitReport::compute(&ManualTrade::default(), TradingPostFee::default());
        assert_eq!(report.profit, Coins::ZERO);
        assert!(!report.is_loss());
        assert_eq!(report.to_string(), "Profit: 0g 0s 0c");
        assert_eq!(report.color(), Color::Gold);
    }

    #[test]
    fn test_loss_and_profit_share_magnitude() -> anyhow::Result<()> {
        let fee = TradingPostFee::new(Decimal::ZERO)?;
        let gain = ProfitReport::compute(&trade((1, 0, 0), (2, 3, 4)), fee);
        let loss = ProfitReport::compute(&trade((2, 3, 4), (1, 0, 0)), fee);
        assert_eq!(gain.breakdown(), loss.breakdown());
        assert_eq!(gain.to_string(), "Profit: 1g 3s 4c");
        assert_eq!(loss.to_string(), "Loss: 1g 3s 4c");
        Ok(())
    }

    #[test]
    fn test_negative_inputs_are_accepted() {
        let report = ProfitReport::compute(&trade((-1, 0, 0), (0, 0, 0)), TradingPostFee::default());
        assert_eq!(report.profit.copper(), 10_000);
        assert_eq!(report.to_string(), "Profit: 1g 0s 0c");
    }

    #[test]
    fn test_calculate_writes_label() {
        let label = Label::new();
        let entry = ManualTrade::new(
            PriceEntry::parse(Some("5"), Some(""), None),
            PriceEntry::parse(Some("3"), Some("abc"), Some("0")),
        );
        let report = calculate_manual_profit(&entry, TradingPostFee::default(), &label);

        assert_eq!(label.text(), "Loss: 2g 45s 0c");
        assert_eq!(label.color(), Some(Color::Red));
        assert_eq!(report.profit.copper(), -24_500);
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let label = Label::new();
        let entry = trade((0, 12, 34), (0, 56, 78));
        let first = calculate_manual_profit(&entry, TradingPostFee::default(), &label);
        let second = calculate_manual_profit(&entry, TradingPostFee::default(), &label);
        assert_eq!(first, second);
        // floor(5678 * 0.85) = 4826; 4826 - 1234 = 3592
        assert_eq!(label.text(), "Profit: 0g 35s 92c");
    }
}
