// Library surface for headless/integration tests and reuse.
// The binary only adds argument parsing and terminal setup on top.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod store;
pub mod toast;
pub mod tui;
pub mod ui;
pub mod util;
