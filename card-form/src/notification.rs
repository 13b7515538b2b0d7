use chrono::{DateTime, Duration, Utc};

pub const DISPLAY_SECS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.shown_at) >= ttl
    }
}

/// Transient toast. A new message replaces the current one and restarts the timer.
#[derive(Debug)]
pub struct Notifier {
    current: Option<Notification>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.show_at(message, Utc::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        let message = message.into();
        tracing::debug!(message = %message, "Notification shown");
        self.current = Some(Notification {
            message,
            shown_at: now,
        });
    }

    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|notification| !notification.is_expired(now, self.ttl))
            .map(|notification| notification.message.as_str())
    }

    pub fn visible(&self) -> Option<&str> {
        self.visible_at(Utc::now())
    }

    /// Most recent message, even if it already auto-dismissed.
    pub fn last_message(&self) -> Option<&str> {
        self.current.as_ref().map(|notification| notification.message.as_str())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::seconds(DISPLAY_SECS))
    }
}
