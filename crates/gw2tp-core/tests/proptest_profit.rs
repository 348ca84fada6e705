//! Property-based tests for the manual profit calculator.
//!
//! Invariants verified:
//! - profit is `floor(sell * 0.85) - buy` for the default fee
//! - a loss is reported in red with a `Loss:` prefix, anything else in gold
//! - calculating twice on the same input gives the same label
//! - any fee keeps a non-negative sale between zero and its gross value
//! - the lenient field parser reads back every `i64` it is given

use gw2tp_core::{
    Color, Label, ManualTrade, PriceEntry, TradingPostFee, calculate_manual_profit,
    profit::parse_field,
};
use gw2tp_primitives::Coins;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Gold/silver/copper as a player might type them, sign included.
fn entry_strat() -> impl Strategy<Value = PriceEntry> {
    (-100_000_i64..=100_000, -500_i64..=500, -500_i64..=500)
        .prop_map(|(g, s, c)| PriceEntry::new(g, s, c))
}

/// Every fee from 0% to 100% in hundredths of a percent.
fn fee_strat() -> impl Strategy<Value = TradingPostFee> {
    (0_i64..=10_000).prop_filter_map("fee out of range", |bp| {
        TradingPostFee::new(Decimal::new(bp, 4)).ok()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn profit_matches_integer_formula(buy in entry_strat(), sell in entry_strat()) {
        let label = Label::new();
        let report = calculate_manual_profit(
            &ManualTrade::new(buy, sell),
            TradingPostFee::default(),
            &label,
        );

        let sell_total = sell.total().copper();
        let expected = (sell_total * 85).div_euclid(100) - buy.total().copper();
        prop_assert_eq!(report.profit, Coins::from_copper(expected));
    }

    #[test]
    fn loss_is_red_and_prefixed(buy in entry_strat(), sell in entry_strat()) {
        let label = Label::new();
        let report = calculate_manual_profit(
            &ManualTrade::new(buy, sell),
            TradingPostFee::default(),
            &label,
        );

        let text = label.text();
        if report.profit.copper() < 0 {
            prop_assert_eq!(label.color(), Some(Color::Red));
            prop_assert!(text.starts_with("Loss: "), "{}", text);
        } else {
            prop_assert_eq!(label.color(), Some(Color::Gold));
            prop_assert!(text.starts_with("Profit: "), "{}", text);
        }
    }

    #[test]
    fn calculation_is_idempotent(buy in entry_strat(), sell in entry_strat()) {
        let trade = ManualTrade::new(buy, sell);
        let label = Label::new();

        let first = calculate_manual_profit(&trade, TradingPostFee::default(), &label);
        let first_text = label.text();
        let second = calculate_manual_profit(&trade, TradingPostFee::default(), &label);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_text, label.text());
    }

    #[test]
    fn fee_never_exceeds_gross(gross in 0_i64..=1_000_000_000_000, fee in fee_strat()) {
        let net = fee.apply(Coins::from_copper(gross)).copper();
        prop_assert!(net >= 0);
        prop_assert!(net <= gross);
    }

    #[test]
    fn parse_field_reads_integers(n in any::<i64>()) {
        let plain = n.to_string();
        let padded = format!("  {n}");
        let trailing = format!("{n}.75abc");
        prop_assert_eq!(parse_field(Some(&plain)), n);
        prop_assert_eq!(parse_field(Some(&padded)), n);
        prop_assert_eq!(parse_field(Some(&trailing)), n);
    }
}
