//! interviewbot-store — SQLite session log.
//!
//! One append-only `sessions` table, one row per evaluated answer. Every
//! call opens its own connection; SQLite's locking handles concurrent
//! writers.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::SessionStore;
