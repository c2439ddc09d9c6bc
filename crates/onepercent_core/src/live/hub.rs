//! Table-level change notification hub.
//!
//! # Responsibility
//! - Fan out "table mutated" events to independent subscribers.
//! - Prune subscribers whose receiving side has been dropped.
//!
//! # Invariants
//! - Repositories notify only after a write has committed.
//! - A subscriber receives events only for the tables it asked for.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Journal tables that can be watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Tasks,
    Entries,
    Sections,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Entries => "entries",
            Self::Sections => "sections",
        }
    }
}

struct Subscriber {
    tables: Vec<Table>,
    sender: Sender<Table>,
}

/// Publish/subscribe hub for committed table mutations.
#[derive(Default)]
pub struct ChangeHub {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a new subscriber watching `tables`.
    pub fn subscribe(&self, tables: &[Table]) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        self.lock().push(Subscriber {
            tables: tables.to_vec(),
            sender,
        });
        Subscription { receiver }
    }

    /// Publishes a committed mutation of `tables`.
    pub fn notify(&self, tables: &[Table]) {
        let mut subscribers = self.lock();
        subscribers.retain(|subscriber| {
            for table in tables {
                if subscriber.tables.contains(table) && subscriber.sender.send(*table).is_err() {
                    return false;
                }
            }
            true
        });
    }

    /// Number of attached subscribers, as of the last prune.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        // Poisoning only means a panic happened while holding the lock; the
        // subscriber list itself is still consistent.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receiving side of one hub subscription. Dropping it detaches.
pub struct Subscription {
    receiver: Receiver<Table>,
}

impl Subscription {
    /// Consumes every pending event; returns how many were pending.
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }

    /// Blocks until one event arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<Table> {
        match self.receiver.recv_timeout(timeout) {
            Ok(table) => Some(table),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeHub, Table};
    use std::time::Duration;

    #[test]
    fn subscriber_receives_only_watched_tables() {
        let hub = ChangeHub::new();
        let entries = hub.subscribe(&[Table::Entries]);

        hub.notify(&[Table::Tasks]);
        assert_eq!(entries.drain(), 0);

        hub.notify(&[Table::Entries, Table::Sections]);
        assert_eq!(entries.drain(), 1);
    }

    #[test]
    fn dropped_subscription_is_pruned_on_notify() {
        let hub = ChangeHub::new();
        let kept = hub.subscribe(&[Table::Sections]);
        let dropped = hub.subscribe(&[Table::Sections]);
        assert_eq!(hub.subscriber_count(), 2);

        drop(dropped);
        hub.notify(&[Table::Sections]);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(kept.wait(Duration::from_millis(10)), Some(Table::Sections));
    }
}
