//! Ephemeral, auto-expiring user notifications

use std::time::{Duration, Instant};

/// How long an alert stays visible regardless of interaction
pub const ALERT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

/// Insertion-ordered alert queue; newest entries sit at the head
#[derive(Debug, Default)]
pub struct AlertQueue {
    alerts: Vec<Alert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an alert; it expires [`ALERT_TTL`] after this call
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.alerts.insert(
            0,
            Alert {
                message: message.into(),
                severity,
                created: Instant::now(),
            },
        );
    }

    /// Drop every alert older than its TTL as of `now`
    pub fn prune(&mut self, now: Instant) {
        self.alerts
            .retain(|a| now.duration_since(a.created) < ALERT_TTL);
    }

    /// Manually dismiss the newest alert; a no-op when none remain
    pub fn dismiss(&mut self) {
        if !self.alerts.is_empty() {
            self.alerts.remove(0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_alert_is_first() {
        let mut queue = AlertQueue::new();
        queue.notify("first", Severity::Info);
        queue.notify("second", Severity::Success);
        let messages: Vec<&str> = queue.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_alert_expires_after_ttl_without_dismissal() {
        let mut queue = AlertQueue::new();
        queue.notify("transient", Severity::Warning);
        let created = queue.iter().next().unwrap().created;

        // One millisecond before the deadline it is still visible
        queue.prune(created + ALERT_TTL - Duration::from_millis(1));
        assert_eq!(queue.len(), 1);

        // At t + 5001ms it is gone
        queue.prune(created + ALERT_TTL + Duration::from_millis(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss_on_empty_queue_is_noop() {
        let mut queue = AlertQueue::new();
        queue.dismiss();
        assert!(queue.is_empty());

        queue.notify("once", Severity::Danger);
        queue.dismiss();
        queue.dismiss();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_prune_keeps_fresh_alerts() {
        let mut queue = AlertQueue::new();
        queue.notify("fresh", Severity::Info);
        queue.prune(Instant::now());
        assert_eq!(queue.len(), 1);
    }
}
