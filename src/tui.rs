use std::time::Instant;

use anyhow::Result;
use log::info;
use ratatui::{backend::Backend, Terminal};

use crate::{
    app::App,
    clock::Clock,
    runtime::{Runner, TrackerEvent, TrackerEventSource},
    ui,
};

/// Drive the app until it asks to quit or the event source goes away
pub fn run<B: Backend, E: TrackerEventSource, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &Runner<E>,
) -> Result<()> {
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|f| ui::draw(app, f))?;
        }
        if app.should_quit {
            break;
        }

        // with no active session and no toast there is nothing to wake up for
        let wait = app.next_wakeup(Instant::now());
        dirty = match runner.step(wait) {
            None => break,
            Some(TrackerEvent::Tick) => app.on_tick(Instant::now()),
            Some(TrackerEvent::Resize) => true,
            Some(TrackerEvent::Key(key)) => {
                app.on_key(key, Instant::now());
                true
            }
        };
    }

    app.shutdown();
    info!("leaving with {} session(s) discarded", app.store.len());
    Ok(())
}
