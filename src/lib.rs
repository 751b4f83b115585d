// Library surface for headless/integration tests and reuse.
// Terminal setup and CLI parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod controller;
pub mod display;
pub mod quotes;
pub mod runtime;
pub mod session;
pub mod store;
pub mod tick;
pub mod ui;
pub mod util;
pub mod watchdog;

/// Interval of the run clock
pub const TICK_INTERVAL_MS: u64 = 1000;
/// Redraw interval when no event arrives
pub const FRAME_INTERVAL_MS: u64 = 250;
