use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TrackerEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait TrackerEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackerEvent, RecvTimeoutError>;

    /// Block until the next event arrives.
    fn recv(&self) -> Result<TrackerEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TrackerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows reports releases too; only presses drive the app
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(TrackerEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(TrackerEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<TrackerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TrackerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TrackerEvent>) -> Self {
        Self { rx }
    }
}

impl TrackerEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<TrackerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Cancellable periodic task driving the elapsed clock.
///
/// Armed only while a session is active. Firing re-arms one interval later.
#[derive(Clone, Copy, Debug)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm the schedule; an already armed schedule keeps its phase.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true and schedules the next run when the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: TrackerEventSource> {
    event_source: E,
}

impl<E: TrackerEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    /// With a wait, blocks up to it and returns Tick on timeout. Without one,
    /// blocks for the next input event. Returns None once the source is gone.
    pub fn step(&self, wait: Option<Duration>) -> Option<TrackerEvent> {
        match wait {
            Some(timeout) => match self.event_source.recv_timeout(timeout) {
                Ok(ev) => Some(ev),
                Err(RecvTimeoutError::Timeout) => Some(TrackerEvent::Tick),
                Err(RecvTimeoutError::Disconnected) => None,
            },
            None => self.event_source.recv().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx));

        assert_matches!(
            runner.step(Some(Duration::from_millis(1))),
            Some(TrackerEvent::Tick)
        );
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TrackerEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx));

        assert_matches!(
            runner.step(Some(Duration::from_millis(10))),
            Some(TrackerEvent::Resize)
        );
    }

    #[test]
    fn untimed_step_returns_none_when_source_is_gone() {
        let (tx, rx) = mpsc::channel::<TrackerEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx));
        assert!(runner.step(None).is_none());
    }

    #[test]
    fn timed_step_returns_none_when_source_is_gone() {
        let (tx, rx) = mpsc::channel::<TrackerEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx));
        assert!(runner.step(Some(Duration::from_millis(5))).is_none());
    }

    #[test]
    fn untimed_step_waits_for_input() {
        let (tx, rx) = mpsc::channel();
        tx.send(TrackerEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx));
        assert_matches!(runner.step(None), Some(TrackerEvent::Resize));
    }

    #[test]
    fn schedule_starts_cancelled() {
        let schedule = TickSchedule::new(Duration::from_secs(1));
        assert!(!schedule.is_armed());
        assert_eq!(schedule.time_until_due(Instant::now()), None);
    }

    #[test]
    fn schedule_fires_once_per_interval() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(Duration::from_secs(1));
        schedule.arm(start);

        assert!(!schedule.fire_if_due(start + Duration::from_millis(500)));
        assert!(schedule.fire_if_due(start + Duration::from_millis(1000)));
        assert!(!schedule.fire_if_due(start + Duration::from_millis(1500)));
        assert_eq!(
            schedule.deadline(),
            Some(start + Duration::from_millis(2000))
        );
    }

    #[test]
    fn rearming_keeps_phase() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(Duration::from_secs(1));
        schedule.arm(start);
        schedule.arm(start + Duration::from_millis(700));
        assert_eq!(schedule.deadline(), Some(start + Duration::from_secs(1)));
    }

    #[test]
    fn cancelled_schedule_never_fires() {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(Duration::from_millis(10));
        schedule.arm(start);
        schedule.cancel();
        assert!(!schedule.fire_if_due(start + Duration::from_secs(5)));
        assert!(!schedule.is_armed());
    }
}
