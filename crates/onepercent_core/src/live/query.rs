//! Live queries: re-evaluate a read whenever a watched table changes.

use super::hub::{ChangeHub, Subscription, Table};
use crate::repo::RepoResult;
use std::time::Duration;

/// A restartable stream of query results.
///
/// The query runs on demand; the subscription only records that something it
/// depends on has changed since the last evaluation.
pub struct LiveQuery<'a, T> {
    subscription: Subscription,
    query: Box<dyn Fn() -> RepoResult<T> + 'a>,
}

impl<'a, T> LiveQuery<'a, T> {
    /// Watches `tables` on `hub` and evaluates `query` on change.
    pub fn new(
        hub: &ChangeHub,
        tables: &[Table],
        query: impl Fn() -> RepoResult<T> + 'a,
    ) -> Self {
        Self {
            subscription: hub.subscribe(tables),
            query: Box::new(query),
        }
    }

    /// Evaluates now and marks the result up to date.
    pub fn current(&self) -> RepoResult<T> {
        self.subscription.drain();
        (self.query)()
    }

    /// Re-evaluates only when a watched table changed since the last call.
    pub fn poll(&self) -> Option<RepoResult<T>> {
        if self.subscription.drain() == 0 {
            return None;
        }
        Some((self.query)())
    }

    /// Blocks up to `timeout` for a change, then re-evaluates.
    pub fn wait(&self, timeout: Duration) -> Option<RepoResult<T>> {
        self.subscription.wait(timeout)?;
        self.subscription.drain();
        Some((self.query)())
    }

    /// Derives a live query whose results are transformed by `f`.
    pub fn map<U>(self, f: impl Fn(T) -> U + 'a) -> LiveQuery<'a, U>
    where
        T: 'a,
    {
        let query = self.query;
        LiveQuery {
            subscription: self.subscription,
            query: Box::new(move || query().map(&f)),
        }
    }
}
