use std::{
    io::{self, stdin, Stdout},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

use questlog::{
    app::App,
    config::{Config, ConfigStore, FileConfigStore, Overrides},
    logging,
    runtime::{CrosstermEventSource, Runner},
    tui,
};

/// track gaming sessions with a live clock and an event log
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal tracker for gaming sessions: start, pause, resume and end sessions, record kills, deaths, level-ups and more, and watch the clock run."
)]
pub struct Cli {
    /// prefix for default session names ("Session" gives "Session 1", "Session 2", ...)
    #[clap(long)]
    name_prefix: Option<String>,

    /// clock refresh interval in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// how long confirmations stay on screen, in milliseconds
    #[clap(long)]
    toast_ms: Option<u64>,

    /// do not show confirmations after actions
    #[clap(long)]
    no_toasts: bool,

    /// store the resolved settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            name_prefix: self.name_prefix.clone(),
            tick_ms: self.tick_ms,
            toast_ms: self.toast_ms,
            no_toasts: self.no_toasts,
        }
    }

    fn resolve_config(&self, store: &impl ConfigStore) -> Config {
        store.load().with_overrides(&self.overrides())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    start_logging(&log_path);

    let config_store = FileConfigStore::new();
    let config = cli.resolve_config(&config_store);
    if cli.save_config {
        match config_store.save(&config) {
            Ok(()) => info!("saved config to {}", config_store.path().display()),
            Err(e) => warn!("could not save config: {e}"),
        }
    }
    info!("starting with {config:?}");

    enable_raw_mode().context("enabling raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let runner = Runner::new(CrosstermEventSource::new());
    let outcome = tui::run(&mut terminal, &mut app, &runner);

    // restore the terminal even when the loop failed
    let restored = restore_terminal(&mut terminal);
    outcome.and(restored)
}

/// The tracker still runs without a log file
fn start_logging(path: &Path) -> bool {
    match logging::init(path) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("questlog: logging disabled: {e:#}");
            false
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    // every step runs even if an earlier one failed
    first_failure([
        disable_raw_mode().context("disabling raw mode"),
        execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leaving alternate screen"),
        terminal.show_cursor().context("showing cursor"),
    ])
}

fn first_failure(steps: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    steps.into_iter().find(Result::is_err).unwrap_or(Ok(()))
}
