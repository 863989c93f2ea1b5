/// The ledger core
///
/// Two pieces live here:
///
/// - [`protocol`]: the ledger update protocol. Recording a transaction
///   appends the event and adjusts the customer's balance by the same
///   signed amount; both effects commit together.
/// - [`receipt`]: the receipt aggregator. A pure derivation of grouped
///   purchases, payment lines, net total, and the debt-limit flag from one
///   customer's transaction history.
///
/// Everything else in the system is entity plumbing around these two.

pub mod protocol;
pub mod receipt;
