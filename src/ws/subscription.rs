//! Per-connection subscription manager.
//!
//! Tracks which sports a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::Sport;

/// Manages the set of sport subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed sports. If `subscribe_all` is true, this set is ignored.
    sports: HashSet<Sport>,
    /// Whether the client follows every sport (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds sports to the subscription set.
    pub fn subscribe(&mut self, sports: &[Sport], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.sports.extend(sports.iter().cloned());
    }

    /// Removes sports from the subscription set. `wildcard` clears the
    /// follow-everything flag.
    pub fn unsubscribe(&mut self, sports: &[Sport], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for sport in sports {
            self.sports.remove(sport);
        }
    }

    /// Returns `true` if events of `sport` pass the subscription filter.
    #[must_use]
    pub fn matches(&self, sport: &Sport) -> bool {
        self.subscribe_all || self.sports.contains(sport)
    }

    /// Returns the number of explicitly subscribed sports.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sports.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
