/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (login, refresh)
/// - `users`: Operator account management
/// - `customers`: Tab customers and receipts
/// - `transactions`: The transaction log
/// - `drinks`: The drink catalog

pub mod auth;
pub mod customers;
pub mod drinks;
pub mod health;
pub mod transactions;
pub mod users;
