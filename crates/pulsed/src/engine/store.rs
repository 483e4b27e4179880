use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use pulse_api::models::Hub;
use serde::Serialize;
use tokio::sync::watch;

/// Totals from one discovery cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryCounts {
    pub hubs: usize,
    pub devices: usize,
    pub metrics: usize,
}

/// The hub topology recorded by the latest discovery cycle.
///
/// Snapshots are immutable. Discovery builds a fresh one and swaps it in
/// wholesale; readers keep whatever `Arc` they loaded and never observe a
/// half-updated topology.
#[derive(Debug, Clone, Serialize)]
pub struct TopologySnapshot {
    pub hubs: Vec<Hub>,
    pub counts: DiscoveryCounts,
    pub discovered_at: DateTime<Utc>,
}

/// Shared daemon state: the latest topology snapshot and the live poll
/// intervals.
///
/// Interval changes are broadcast over watch channels so whoever owns the
/// scheduled jobs can reschedule without polling the store.
pub struct StateStore {
    topology: ArcSwapOption<TopologySnapshot>,
    update_interval: watch::Sender<Duration>,
    discovery_interval: watch::Sender<Duration>,
}

impl StateStore {
    pub fn new(update_interval: Duration, discovery_interval: Duration) -> Self {
        Self {
            topology: ArcSwapOption::empty(),
            update_interval: watch::Sender::new(update_interval),
            discovery_interval: watch::Sender::new(discovery_interval),
        }
    }

    /// Latest topology snapshot, or `None` before the first successful
    /// discovery.
    pub fn topology(&self) -> Option<Arc<TopologySnapshot>> {
        self.topology.load_full()
    }

    /// Replace the topology wholesale.
    pub fn replace_topology(&self, snapshot: TopologySnapshot) {
        self.topology.store(Some(Arc::new(snapshot)));
    }

    pub fn update_interval(&self) -> Duration {
        *self.update_interval.borrow()
    }

    pub fn discovery_interval(&self) -> Duration {
        *self.discovery_interval.borrow()
    }

    /// Change the state-publish interval. Watchers are only woken when the
    /// value actually changes.
    pub fn set_update_interval(&self, interval: Duration) {
        self.update_interval.send_if_modified(|current| {
            if *current == interval {
                false
            } else {
                *current = interval;
                true
            }
        });
    }

    /// Change the discovery interval. Watchers are only woken when the
    /// value actually changes.
    pub fn set_discovery_interval(&self, interval: Duration) {
        self.discovery_interval.send_if_modified(|current| {
            if *current == interval {
                false
            } else {
                *current = interval;
                true
            }
        });
    }

    pub fn watch_update_interval(&self) -> watch::Receiver<Duration> {
        self.update_interval.subscribe()
    }

    pub fn watch_discovery_interval(&self) -> watch::Receiver<Duration> {
        self.discovery_interval.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StateStore {
        StateStore::new(Duration::from_secs(60), Duration::from_secs(3600))
    }

    #[test]
    fn test_topology_starts_empty() {
        assert!(store().topology().is_none());
    }

    #[test]
    fn test_replace_topology_is_wholesale() {
        let store = store();
        store.replace_topology(TopologySnapshot {
            hubs: vec![],
            counts: DiscoveryCounts {
                hubs: 2,
                devices: 5,
                metrics: 12,
            },
            discovered_at: Utc::now(),
        });

        let old = store.topology().unwrap();
        assert_eq!(old.counts.hubs, 2);

        store.replace_topology(TopologySnapshot {
            hubs: vec![],
            counts: DiscoveryCounts::default(),
            discovered_at: Utc::now(),
        });

        // The reader's snapshot is unaffected by the swap.
        assert_eq!(old.counts.hubs, 2);
        assert_eq!(store.topology().unwrap().counts.hubs, 0);
    }

    #[test]
    fn test_interval_change_notifies_watchers() {
        let store = store();
        let rx = store.watch_update_interval();

        store.set_update_interval(Duration::from_secs(30));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), Duration::from_secs(30));
        assert_eq!(store.update_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_same_interval_does_not_notify() {
        let store = store();
        let rx = store.watch_discovery_interval();

        store.set_discovery_interval(Duration::from_secs(3600));
        assert!(!rx.has_changed().unwrap());
    }
}
