use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
}

/// Short-lived confirmation shown after a user action
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    queue: VecDeque<Toast>,
    lifetime: Duration,
    enabled: bool,
}

impl Toasts {
    pub fn new(lifetime: Duration, enabled: bool) -> Self {
        Self {
            queue: VecDeque::new(),
            lifetime,
            enabled,
        }
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(message.into(), ToastKind::Success, now);
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.push(message.into(), ToastKind::Info, now);
    }

    fn push(&mut self, message: String, kind: ToastKind, now: Instant) {
        if !self.enabled {
            return;
        }
        self.queue.push_back(Toast {
            message,
            kind,
            expires_at: now + self.lifetime,
        });
        while self.queue.len() > MAX_TOASTS {
            self.queue.pop_front();
        }
    }

    /// Drop expired toasts; returns true if anything was removed
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.expires_at > now);
        self.queue.len() != before
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.queue.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.iter().map(|t| t.expires_at).min()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_lifetime() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_millis(100), true);
        toasts.success("Session started!", now);
        assert!(!toasts.prune(now + Duration::from_millis(50)));
        assert_eq!(toasts.len(), 1);
        assert!(toasts.prune(now + Duration::from_millis(100)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn keeps_only_newest() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        for i in 0..5 {
            toasts.info(format!("toast {i}"), now);
        }
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.latest().unwrap().message, "toast 4");
        assert_eq!(toasts.iter().next().unwrap().message, "toast 2");
    }

    #[test]
    fn disabled_toasts_are_dropped() {
        let mut toasts = Toasts::new(Duration::from_secs(1), false);
        toasts.success("ignored", Instant::now());
        assert!(toasts.is_empty());
        assert_eq!(toasts.next_expiry(), None);
    }

    #[test]
    fn next_expiry_is_earliest() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(2), true);
        toasts.info("a", now);
        toasts.info("b", now + Duration::from_secs(1));
        assert_eq!(toasts.next_expiry(), Some(now + Duration::from_secs(2)));
        assert_eq!(toasts.latest().unwrap().kind, ToastKind::Info);
    }
}
