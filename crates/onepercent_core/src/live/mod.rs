//! Reactive reads over the journal store.
//!
//! # Responsibility
//! - Notify subscribers when a table commits a mutation (`hub`).
//! - Re-run reads for views that must reflect the latest state (`query`).
//!
//! # Invariants
//! - No cross-query consistency: each live query reflects the latest
//!   committed state at the moment it re-evaluates.

mod hub;
mod query;

pub use hub::{ChangeHub, Subscription, Table};
pub use query::LiveQuery;
