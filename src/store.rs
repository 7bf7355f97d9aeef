use std::collections::HashMap;

use chrono::Duration;
use itertools::Itertools;
use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::session::{EventKind, Session, SessionEvent, SessionId, SessionStatus};

pub const DEFAULT_NAME_PREFIX: &str = "Session";

/// In-memory collection of sessions and every mutation on them.
///
/// At most one session is active at a time. Operations on unknown ids are
/// ignored and report `false`.
#[derive(Debug)]
pub struct SessionStore<C: Clock = SystemClock> {
    clock: C,
    sessions: Vec<Session>,
    elapsed: HashMap<SessionId, Duration>,
    name_prefix: String,
    created_count: usize,
}

impl SessionStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            sessions: Vec::new(),
            elapsed: HashMap::new(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            created_count: 0,
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn create_session(&mut self) -> SessionId {
        let now = self.clock.now_utc();
        self.demote_active(None);

        self.created_count += 1;
        let name = format!("{} {}", self.name_prefix, self.created_count);
        let session = Session::new(name, now);
        let id = session.id;

        info!("created session {} ({})", session.name, id.short());
        self.elapsed.insert(id, Duration::zero());
        self.sessions.push(session);
        id
    }

    pub fn pause(&mut self, id: SessionId) -> bool {
        let now = self.clock.now_utc();
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            debug!("pause ignored: unknown session {}", id.short());
            return false;
        };
        if !session.is_active() {
            debug!("pause ignored: session {} is {}", id.short(), session.status);
            return false;
        }

        let frozen = session.elapsed_at(now);
        session.status = SessionStatus::Paused;
        self.elapsed.insert(id, frozen);
        info!("paused session {} at {}ms", id.short(), frozen.num_milliseconds());
        true
    }

    pub fn resume(&mut self, id: SessionId) -> bool {
        match self.get(id) {
            Some(session) if session.is_paused() => {}
            Some(session) => {
                debug!("resume ignored: session {} is {}", id.short(), session.status);
                return false;
            }
            None => {
                debug!("resume ignored: unknown session {}", id.short());
                return false;
            }
        }

        self.demote_active(Some(id));

        let now = self.clock.now_utc();
        let frozen = self.elapsed.get(&id).copied().unwrap_or_else(Duration::zero);
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.start_time = now - frozen;
            session.status = SessionStatus::Active;
        }
        info!("resumed session {} from {}ms", id.short(), frozen.num_milliseconds());
        true
    }

    pub fn end(&mut self, id: SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.elapsed.remove(&id);

        let removed = self.sessions.len() != before;
        if removed {
            info!("ended session {}", id.short());
        } else {
            debug!("end ignored: unknown session {}", id.short());
        }
        removed
    }

    pub fn add_event(&mut self, id: SessionId, kind: EventKind) -> bool {
        let timestamp = self.clock.now_local();
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.events.push(SessionEvent::new(timestamp, kind));
                debug!("recorded {} on session {}", kind, id.short());
                true
            }
            None => {
                debug!("event {} ignored: unknown session {}", kind, id.short());
                false
            }
        }
    }

    pub fn rename(&mut self, id: SessionId, name: impl Into<String>) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.name = name.into();
                true
            }
            None => {
                debug!("rename ignored: unknown session {}", id.short());
                false
            }
        }
    }

    /// Refresh the elapsed entry of the active session from the clock
    pub fn tick(&mut self) -> Option<u64> {
        let now = self.clock.now_utc();
        let session = self.sessions.iter().find(|s| s.is_active())?;
        let elapsed = session.elapsed_at(now);
        self.elapsed.insert(session.id, elapsed);
        Some(whole_secs(elapsed))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.sessions.iter().find(|s| s.is_active()).map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whole seconds held for the session: the last tick for the active one,
    /// the frozen value for a paused one
    pub fn elapsed_secs(&self, id: SessionId) -> Option<u64> {
        self.elapsed.get(&id).copied().map(whole_secs)
    }

    /// Ids currently held in the elapsed-time bookkeeping
    pub fn tracked_ids(&self) -> Vec<SessionId> {
        self.sessions
            .iter()
            .map(|s| s.id)
            .filter(|id| self.elapsed.contains_key(id))
            .collect()
    }

    pub fn is_tracked(&self, id: SessionId) -> bool {
        self.elapsed.contains_key(&id)
    }

    /// Event counts per kind in grid order, zero counts omitted
    pub fn event_tally(&self, id: SessionId) -> Vec<(EventKind, usize)> {
        let Some(session) = self.get(id) else {
            return Vec::new();
        };
        let counts = session.events.iter().map(|e| e.kind).counts();
        EventKind::ALL
            .iter()
            .filter_map(|kind| counts.get(kind).map(|n| (*kind, *n)))
            .collect()
    }

    fn demote_active(&mut self, except: Option<SessionId>) {
        let now = self.clock.now_utc();
        for session in self
            .sessions
            .iter_mut()
            .filter(|s| s.is_active() && Some(s.id) != except)
        {
            let frozen = session.elapsed_at(now);
            session.status = SessionStatus::Paused;
            self.elapsed.insert(session.id, frozen);
            info!(
                "paused session {} at {}ms (displaced)",
                session.id.short(),
                frozen.num_milliseconds()
            );
        }
    }
}

fn whole_secs(elapsed: Duration) -> u64 {
    elapsed.num_seconds().max(0) as u64
}
