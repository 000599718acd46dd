//! Notification system for the TUI.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

/// Footer notifications, newest last, capped at [`MAX_NOTIFICATIONS`].
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.entries.push_back(Notification::new(level, message));
        while self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.pop_front();
        }
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.entries.retain(|n| !n.is_expired(now, ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_drops_oldest() {
        let mut notifications = Notifications::new();
        for i in 0..MAX_NOTIFICATIONS + 5 {
            notifications.push(NotificationLevel::Info, format!("note {}", i));
        }
        assert_eq!(notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(notifications.iter().next().map(|n| n.message.as_str()), Some("note 5"));
        let last = format!("note {}", MAX_NOTIFICATIONS + 4);
        assert_eq!(notifications.last().map(|n| n.message.clone()), Some(last));
    }

    #[test]
    fn test_expire_keeps_fresh_entries() {
        let mut notifications = Notifications::new();
        notifications.push(NotificationLevel::Success, "saved");
        let created = notifications.iter().next().map(|n| n.created_at).unwrap();
        notifications.expire(created, Duration::seconds(5));
        assert_eq!(notifications.len(), 1);
        notifications.expire(created + Duration::seconds(6), Duration::seconds(5));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_expiry() {
        let notification = Notification::new(NotificationLevel::Info, "saved");
        let ttl = Duration::seconds(5);
        assert!(!notification.is_expired(notification.created_at, ttl));
        assert!(notification.is_expired(notification.created_at + Duration::seconds(6), ttl));
    }
}
