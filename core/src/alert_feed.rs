//! In-memory list of alerts received over the live channel.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use raksha_protocol::Alert;

/// How many alerts the feed keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertRetention {
    /// Keep everything for the lifetime of the process.
    #[default]
    Unbounded,
    /// Keep only the most recent `n` alerts.
    Latest(NonZeroUsize),
}

impl AlertRetention {
    /// `0` means unbounded.
    pub fn from_limit(limit: usize) -> Self {
        NonZeroUsize::new(limit).map_or(AlertRetention::Unbounded, AlertRetention::Latest)
    }

    pub fn limit(self) -> Option<usize> {
        match self {
            AlertRetention::Unbounded => None,
            AlertRetention::Latest(n) => Some(n.get()),
        }
    }
}

/// Alerts in receipt order, newest first. No deduplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    retention: AlertRetention,
}

impl AlertFeed {
    pub fn new(retention: AlertRetention) -> Self {
        Self {
            alerts: VecDeque::new(),
            retention,
        }
    }

    /// Prepend `alert`, evicting the oldest entries beyond the retention
    /// bound.
    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        if let Some(limit) = self.retention.limit() {
            self.alerts.truncate(limit);
        }
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn retention(&self) -> AlertRetention {
        self.retention
    }
}
