/// End-to-end scenarios for the receipt aggregator
///
/// These walk one customer's tab through realistic sequences of charges
/// and payments and verify the aggregated receipt: grouped purchase
/// lines, payment lines, net total, and the debt-limit flag.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use bartab_shared::ledger::receipt::{build_receipt, PurchaseLine};
use bartab_shared::models::transaction::Transaction;

fn history(entries: &[(&str, Decimal)]) -> Vec<Transaction> {
    let customer_id = Uuid::new_v4();
    entries
        .iter()
        .enumerate()
        .map(|(i, (label, amount))| Transaction {
            id: Uuid::new_v4(),
            customer_id,
            label: label.to_string(),
            amount: *amount,
            actor: "anna".to_string(),
            created_at: Utc
                .with_ymd_and_hms(2025, 8, 12, 20, 0, i as u32)
                .unwrap(),
        })
        .collect()
}

/// Alice starts at 0, is charged two beers, pays 7 in cash.
#[test]
fn two_beers_and_a_cash_payment() {
    let txs = history(&[("Beer", dec!(-5)), ("Beer", dec!(-5)), ("Cash", dec!(7))]);

    let receipt = build_receipt(&txs);

    assert_eq!(
        receipt.grouped_purchases,
        vec![PurchaseLine {
            label: "Beer".to_string(),
            quantity: 2,
            total: dec!(10),
        }]
    );
    assert_eq!(receipt.payments.len(), 1);
    assert_eq!(receipt.payments[0].label, "Payment (Cash)");
    assert_eq!(receipt.payments[0].amount, dec!(7));
    assert_eq!(receipt.net_total, dec!(-3));
    assert!(!receipt.over_limit);
}

/// Charges totalling -80 push the tab past the ceiling.
#[test]
fn heavy_tab_is_flagged_over_limit() {
    let txs = history(&[
        ("Beer", dec!(-20)),
        ("Whisky", dec!(-30)),
        ("Whisky", dec!(-30)),
    ]);

    let receipt = build_receipt(&txs);

    assert_eq!(receipt.net_total, dec!(-80));
    assert!(receipt.over_limit);
}

/// A payment that clears the ceiling also clears the flag.
#[test]
fn settling_the_tab_clears_the_flag() {
    let txs = history(&[("Beer", dec!(-80)), ("card", dec!(80))]);

    let receipt = build_receipt(&txs);

    assert_eq!(receipt.net_total, Decimal::ZERO);
    assert!(!receipt.over_limit);
    assert_eq!(receipt.payments[0].label, "Payment (Card)");
}

/// The net total is invariant under permutation of the history, and the
/// grouped lines come out identical; only payment ordering follows input.
#[test]
fn net_total_is_order_insensitive() {
    let forward = history(&[
        ("Beer", dec!(-5)),
        ("Cider", dec!(-4)),
        ("Cash", dec!(10)),
        ("Beer", dec!(-5)),
    ]);
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = build_receipt(&forward);
    let b = build_receipt(&reversed);

    assert_eq!(a.net_total, b.net_total);
    assert_eq!(a.grouped_purchases, b.grouped_purchases);
    assert_eq!(a.over_limit, b.over_limit);
}

/// Mixed free-text payment labels normalize; unknown ones pass through.
#[test]
fn payment_labels_normalize_for_display() {
    let txs = history(&[
        ("paid CASH at bar", dec!(5)),
        ("Deposit", dec!(5)),
        ("IOU from Bob", dec!(5)),
    ]);

    let receipt = build_receipt(&txs);

    let labels: Vec<&str> = receipt.payments.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Payment (Cash)", "Payment", "IOU from Bob"]);
}
