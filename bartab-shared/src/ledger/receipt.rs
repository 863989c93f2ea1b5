/// The receipt aggregator
///
/// Derives the human-readable summary of one customer's transaction
/// history: grouped purchase lines, individual payment lines, the net
/// total, and the debt-limit flag. Pure and deterministic; aggregation has
/// no side effects and running it twice on the same history yields
/// identical output.
///
/// Summation is order-insensitive. The payments list is order-sensitive:
/// it preserves the chronological order of the input, which is why
/// callers hand over histories oldest-first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;

/// Debt ceiling: a receipt whose net total is at or below this flags the
/// tab for settlement. Advisory only; it never blocks further recording.
pub const DEBT_LIMIT: i64 = -75;

/// One grouped purchase line: all charges with the same label merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    /// Charge label (drink name or free text)
    pub label: String,

    /// How many times this label was charged
    pub quantity: u32,

    /// Absolute sum of the merged charges
    pub total: Decimal,
}

/// One payment line; payments are never merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    /// When the payment was recorded
    pub at: DateTime<Utc>,

    /// Normalized display label
    pub label: String,

    /// Payment amount (positive)
    pub amount: Decimal,
}

/// The aggregated receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Purchase lines, sorted by label ascending (case-insensitive)
    pub grouped_purchases: Vec<PurchaseLine>,

    /// Payment lines in chronological order
    pub payments: Vec<PaymentLine>,

    /// Sum of all amounts; equals the customer's stored balance
    pub net_total: Decimal,

    /// Whether the tab is at or past the debt ceiling
    pub over_limit: bool,
}

/// Normalizes a payment label for display
///
/// Free-text variants map to a canonical label:
/// - substring "cash" (case-insensitive) -> "Payment (Cash)"
/// - substring "card" (case-insensitive) -> "Payment (Card)"
/// - exactly "payment", "deposit", or "payback" (case-folded) -> "Payment"
/// - empty -> "Payment"
///
/// Anything else passes through verbatim.
pub fn normalize_payment_label(label: &str) -> String {
    let trimmed = label.trim();
    let folded = trimmed.to_lowercase();

    if folded.contains("cash") {
        "Payment (Cash)".to_string()
    } else if folded.contains("card") {
        "Payment (Card)".to_string()
    } else if folded == "payment" || folded == "deposit" || folded == "payback" {
        "Payment".to_string()
    } else if trimmed.is_empty() {
        "Payment".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Builds the receipt for one customer's history
///
/// - Charges (amount < 0) merge into per-label lines with an occurrence
///   count and the absolute sum.
/// - Payments (amount > 0) each stay a distinct line, in input order,
///   with their label normalized.
/// - Zero amounts count toward the net total but join neither group.
pub fn build_receipt(transactions: &[Transaction]) -> Receipt {
    let mut net_total = Decimal::ZERO;
    let mut charges: HashMap<String, (u32, Decimal)> = HashMap::new();
    let mut payments = Vec::new();

    for tx in transactions {
        net_total += tx.amount;

        if tx.amount < Decimal::ZERO {
            let label = {
                let trimmed = tx.label.trim();
                if trimmed.is_empty() { "Drink" } else { trimmed }
            };
            let entry = charges.entry(label.to_string()).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += tx.amount.abs();
        } else if tx.amount > Decimal::ZERO {
            payments.push(PaymentLine {
                at: tx.created_at,
                label: normalize_payment_label(&tx.label),
                amount: tx.amount,
            });
        }
    }

    let mut grouped_purchases: Vec<PurchaseLine> = charges
        .into_iter()
        .map(|(label, (quantity, total))| PurchaseLine {
            label,
            quantity,
            total,
        })
        .collect();

    // Case-insensitive label order, exact label as the tie-break so equal
    // folds still sort deterministically
    grouped_purchases.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.label.cmp(&b.label))
    });

    let over_limit = net_total <= Decimal::from(DEBT_LIMIT);

    Receipt {
        grouped_purchases,
        payments,
        net_total,
        over_limit,
    }
}
