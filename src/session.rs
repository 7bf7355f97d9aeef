use std::fmt;

use chrono::{DateTime, Duration, Local, Utc};
use uuid::Uuid;

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First block of the uuid, enough to tell sessions apart on screen
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    /// Only observable before a session exists; sessions are created active.
    Idle,
    Active,
    Paused,
}

/// The fixed set of things a player can record during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum EventKind {
    Kill,
    Death,
    #[strum(serialize = "Level Up")]
    LevelUp,
    #[strum(serialize = "Boss Fight")]
    BossFight,
    Checkpoint,
    #[strum(serialize = "Item Found")]
    ItemFound,
    Achievement,
}

impl EventKind {
    /// Display order of the event grid
    pub const ALL: [EventKind; 7] = [
        EventKind::Kill,
        EventKind::Death,
        EventKind::LevelUp,
        EventKind::BossFight,
        EventKind::Checkpoint,
        EventKind::ItemFound,
        EventKind::Achievement,
    ];

    /// Number key that records this kind ('1' for the first grid entry)
    pub fn hotkey(self) -> char {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        char::from(b'1' + idx as u8)
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        let digit = c.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub timestamp: DateTime<Local>,
    pub kind: EventKind,
}

impl SessionEvent {
    pub fn new(timestamp: DateTime<Local>, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub status: SessionStatus,
    pub events: Vec<SessionEvent>,
    /// Reference point for the elapsed clock; moved forward on resume so that
    /// `now - start_time` equals the time accumulated before the pause.
    pub start_time: DateTime<Utc>,
    pub created_at: DateTime<Local>,
}

impl Session {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            name,
            status: SessionStatus::Active,
            events: Vec::new(),
            start_time: now,
            created_at: now.with_timezone(&Local),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }

    /// Time between the start reference and `now`, never negative
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_kind_labels() {
        assert_eq!(EventKind::Kill.to_string(), "Kill");
        assert_eq!(EventKind::LevelUp.to_string(), "Level Up");
        assert_eq!(EventKind::BossFight.to_string(), "Boss Fight");
        assert_eq!(EventKind::ItemFound.to_string(), "Item Found");
        assert_eq!(EventKind::Achievement.to_string(), "Achievement");
    }

    #[test]
    fn hotkeys_follow_grid_order() {
        assert_eq!(EventKind::Kill.hotkey(), '1');
        assert_eq!(EventKind::Achievement.hotkey(), '7');
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_hotkey(kind.hotkey()), Some(kind));
        }
    }

    #[test]
    fn from_hotkey_rejects_out_of_range() {
        assert_eq!(EventKind::from_hotkey('0'), None);
        assert_eq!(EventKind::from_hotkey('8'), None);
        assert_eq!(EventKind::from_hotkey('a'), None);
    }

    #[test]
    fn new_session_starts_active_and_empty() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let session = Session::new("Session 1".into(), now);
        assert!(session.is_active());
        assert!(session.events.is_empty());
        assert_eq!(session.start_time, now);
    }

    #[test]
    fn elapsed_at_clamps_negative() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let session = Session::new("s".into(), now);
        assert_eq!(session.elapsed_at(now - Duration::seconds(5)), Duration::zero());
        assert_eq!(
            session.elapsed_at(now + Duration::milliseconds(2900)),
            Duration::milliseconds(2900)
        );
    }

    #[test]
    fn session_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }
}
