use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::runtime::TickSchedule;
use crate::session::{EventKind, Session, SessionId};
use crate::store::SessionStore;
use crate::toast::Toasts;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Tracking,
    Renaming { buffer: String },
}

/// Composition root: owns the store and the UI state around it
#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub store: SessionStore<C>,
    pub toasts: Toasts,
    pub mode: AppMode,
    pub selected: usize,
    pub should_quit: bool,
    ticker: TickSchedule,
}

impl App<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(config: &Config, clock: C) -> Self {
        Self {
            store: SessionStore::with_clock(clock).with_name_prefix(config.name_prefix.clone()),
            toasts: Toasts::new(config.toast_lifetime(), config.toasts),
            mode: AppMode::Tracking,
            selected: 0,
            should_quit: false,
            ticker: TickSchedule::new(config.tick_interval()),
        }
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.store.sessions().get(self.selected)
    }

    pub fn selected_id(&self) -> Option<SessionId> {
        self.selected_session().map(|s| s.id)
    }

    pub fn ticker(&self) -> &TickSchedule {
        &self.ticker
    }

    pub fn start_session(&mut self, now: Instant) {
        let id = self.store.create_session();
        if let Some(idx) = self.store.sessions().iter().position(|s| s.id == id) {
            self.selected = idx;
        }
        self.toasts.success("Session started!", now);
        self.sync_ticker(now);
    }

    pub fn pause_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            if self.store.pause(id) {
                self.toasts.info("Session paused", now);
            }
        }
        self.sync_ticker(now);
    }

    pub fn resume_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            if self.store.resume(id) {
                self.toasts.success("Session resumed", now);
            }
        }
        self.sync_ticker(now);
    }

    pub fn toggle_selected(&mut self, now: Instant) {
        match self.selected_session() {
            Some(s) if s.is_active() => self.pause_selected(now),
            Some(s) if s.is_paused() => self.resume_selected(now),
            _ => {}
        }
    }

    pub fn end_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            if self.store.end(id) {
                self.toasts.info("Session ended", now);
            }
        }
        self.clamp_selection();
        self.sync_ticker(now);
    }

    /// The event grid is only offered while the selected session is running
    pub fn record_event(&mut self, kind: EventKind, now: Instant) {
        let Some(session) = self.selected_session() else {
            return;
        };
        if !session.is_active() {
            debug!("event {kind} ignored: selected session is not active");
            return;
        }
        let id = session.id;
        if self.store.add_event(id, kind) {
            self.toasts.success(format!("Event recorded: {kind}"), now);
        }
    }

    pub fn begin_rename(&mut self) {
        if let Some(session) = self.selected_session() {
            self.mode = AppMode::Renaming {
                buffer: session.name.clone(),
            };
        }
    }

    pub fn commit_rename(&mut self, now: Instant) {
        let mode = std::mem::replace(&mut self.mode, AppMode::Tracking);
        if let (AppMode::Renaming { buffer }, Some(id)) = (mode, self.selected_id()) {
            if self.store.rename(id, buffer) {
                self.toasts.success("Session renamed", now);
            }
        }
    }

    pub fn cancel_rename(&mut self) {
        self.mode = AppMode::Tracking;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Ctrl/Alt chords are not bound to anything
        if matches!(key.code, KeyCode::Char(_)) && !is_plain(key.modifiers) {
            debug!("ignoring chord {key:?}");
            return;
        }

        if matches!(self.mode, AppMode::Renaming { .. }) {
            self.on_rename_key(key, now);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') => self.start_session(now),
            KeyCode::Char('p') => self.pause_selected(now),
            KeyCode::Char('r') => self.resume_selected(now),
            KeyCode::Char(' ') => self.toggle_selected(now),
            KeyCode::Char('x') | KeyCode::Delete => self.end_selected(now),
            KeyCode::Char('e') | KeyCode::F(2) => self.begin_rename(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(c) => {
                if let Some(kind) = EventKind::from_hotkey(c) {
                    self.record_event(kind, now);
                }
            }
            _ => {}
        }
    }

    fn on_rename_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter => self.commit_rename(now),
            KeyCode::Esc => self.cancel_rename(),
            KeyCode::Backspace => {
                if let AppMode::Renaming { buffer } = &mut self.mode {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let AppMode::Renaming { buffer } = &mut self.mode {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    /// Returns true when something visible changed
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = self.toasts.prune(now);
        if self.ticker.fire_if_due(now) {
            changed |= self.store.tick().is_some();
        }
        self.sync_ticker(now);
        changed
    }

    /// How long the loop may sleep; `None` means wait for input only
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let deadlines = [self.ticker.deadline(), self.toasts.next_expiry()];
        deadlines
            .into_iter()
            .flatten()
            .min()
            .map(|due| due.saturating_duration_since(now))
    }

    /// Stop the clock refresh on teardown
    pub fn shutdown(&mut self) {
        self.ticker.cancel();
    }

    fn sync_ticker(&mut self, now: Instant) {
        if self.store.active_id().is_some() {
            self.ticker.arm(now);
        } else if self.ticker.is_armed() {
            debug!("no active session, cancelling clock refresh");
            self.ticker.cancel();
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }
}

fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}
