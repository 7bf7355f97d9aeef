use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use questlog::app::App;
use questlog::clock::ManualClock;
use questlog::config::Config;
use questlog::runtime::{Runner, TestEventSource, TrackerEvent};
use questlog::session::{EventKind, SessionStatus};

fn key(c: char) -> TrackerEvent {
    TrackerEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the runtime + App without a TTY.
// Drives a small event loop the same way the binary does.
fn drive(app: &mut App<ManualClock>, runner: &Runner<TestEventSource>, max_steps: u32) {
    for _ in 0..max_steps {
        let wait = app.next_wakeup(Instant::now());
        match runner.step(wait) {
            None => break,
            Some(TrackerEvent::Tick) => {
                app.on_tick(Instant::now());
            }
            Some(TrackerEvent::Resize) => {}
            Some(TrackerEvent::Key(k)) => app.on_key(k, Instant::now()),
        }
        if app.should_quit {
            break;
        }
    }
}

#[test]
fn headless_session_flow() {
    let clock = ManualClock::default();
    let mut app = App::with_clock(&Config::default(), clock.clone());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx));

    for ev in [key('n'), key('1'), key('2'), key('n'), key('k'), key('r')] {
        tx.send(ev).unwrap();
    }
    tx.send(key('q')).unwrap();

    drive(&mut app, &runner, 100);

    assert!(app.should_quit);
    let sessions = app.store.sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].status, SessionStatus::Active);
    assert_eq!(sessions[1].status, SessionStatus::Paused);
    let kinds: Vec<_> = sessions[0].events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Kill, EventKind::Death]);
}

#[test]
fn headless_clock_ticks_only_while_active() {
    let clock = ManualClock::default();
    let config = Config {
        tick_ms: 50,
        toasts: false,
        ..Config::default()
    };
    let mut app = App::with_clock(&config, clock.clone());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx));

    tx.send(key('n')).unwrap();
    drive(&mut app, &runner, 1);
    assert!(app.ticker().is_armed());
    let id = app.selected_id().unwrap();

    // let a few real ticks pass while the manual clock moves
    clock.advance(Duration::from_secs(3));
    let wait = app.next_wakeup(Instant::now());
    assert!(wait.is_some());
    std::thread::sleep(Duration::from_millis(60));
    drive(&mut app, &runner, 1);
    assert_eq!(app.store.elapsed_secs(id), Some(3));

    tx.send(key('p')).unwrap();
    drive(&mut app, &runner, 1);
    assert!(!app.ticker().is_armed());
    // nothing left to wake up for
    assert_eq!(app.next_wakeup(Instant::now()), None);

    clock.advance(Duration::from_secs(30));
    assert_eq!(app.store.elapsed_secs(id), Some(3));
}

#[test]
fn headless_rename_flow() {
    let mut app = App::with_clock(&Config::default(), ManualClock::default());
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx));

    tx.send(key('n')).unwrap();
    tx.send(key('e')).unwrap();
    tx.send(TrackerEvent::Key(KeyEvent::new(
        KeyCode::Char('!'),
        KeyModifiers::SHIFT,
    )))
    .unwrap();
    tx.send(TrackerEvent::Key(KeyEvent::new(
        KeyCode::Enter,
        KeyModifiers::NONE,
    )))
    .unwrap();
    drop(tx);

    drive(&mut app, &runner, 20);

    assert_eq!(app.selected_session().unwrap().name, "Session 1!");
}
