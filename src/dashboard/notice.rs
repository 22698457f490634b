use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    posted: Instant,
}

/// Transient, dismissable messages shown under the active screen
#[derive(Debug)]
pub struct Notices {
    items: VecDeque<Notice>,
    ttl: Duration,
    capacity: usize,
}

impl Notices {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            severity,
            message: message.into(),
            posted: now,
        });
    }

    /// Drop notices older than the TTL. Returns true if anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| now.saturating_duration_since(n.posted) < ttl);
        self.items.len() != before
    }

    pub fn dismiss_all(&mut self) -> bool {
        let had_any = !self.items.is_empty();
        self.items.clear();
        had_any
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_ttl() {
        let start = Instant::now();
        let mut notices = Notices::new(Duration::from_secs(4), 5);
        notices.push(Severity::Info, "first", start);
        notices.push(Severity::Warning, "second", start + Duration::from_secs(3));

        assert!(!notices.expire(start + Duration::from_secs(2)));
        assert!(notices.expire(start + Duration::from_secs(5)));
        assert_eq!(notices.iter().map(|n| n.message.as_str()).collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn oldest_notice_is_dropped_at_capacity() {
        let now = Instant::now();
        let mut notices = Notices::new(Duration::from_secs(4), 2);
        for msg in ["a", "b", "c"] {
            notices.push(Severity::Error, msg, now);
        }
        assert_eq!(notices.iter().map(|n| n.message.as_str()).collect::<Vec<_>>(), vec!["b", "c"]);

        assert!(notices.dismiss_all());
        assert!(notices.is_empty());
        assert!(!notices.dismiss_all());
    }
}
