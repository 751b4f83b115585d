use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        DisableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stillness::{
    app::App,
    app_dirs::AppDirs,
    controller::SessionController,
    display::TerminalDisplay,
    runtime::{CrosstermEventSource, FixedFrameRate, Runner, ThreadTickSource},
    store::FileBestTimeStore,
    watchdog::InputHub,
    FRAME_INTERVAL_MS, TICK_INTERVAL_MS,
};

/// start the clock, then do absolutely nothing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A meditation on stillness. Start the clock and do nothing: any key, click, scroll or mouse movement ends the run. Your best time is kept between sessions."
)]
pub struct Cli {
    /// file holding the best time (default: ~/.local/state/stillness/best.json)
    #[clap(long, value_name = "PATH")]
    best_time_file: Option<PathBuf>,

    /// file to append logs to; filter with RUST_LOG (default: ~/.local/state/stillness/stillness.log)
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing(cli.log_file.clone().or_else(AppDirs::log_path));

    let store = cli
        .best_time_file
        .as_ref()
        .map(FileBestTimeStore::with_path)
        .unwrap_or_default();
    tracing::info!(path = %store.path().display(), "using best time store");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    // Key releases let the watchdog see key-up and let activation wait for it
    let key_releases = supports_keyboard_enhancement().unwrap_or(false);
    if key_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, store, key_releases);
    let restored = restore_terminal(terminal.backend_mut(), key_releases);

    result?;
    restored?;
    Ok(())
}

/// Runs every restore step even when an earlier one fails, returning the
/// first error
fn restore_terminal<W: Write>(out: &mut W, key_releases: bool) -> io::Result<()> {
    let popped = if key_releases {
        execute!(out, PopKeyboardEnhancementFlags)
    } else {
        Ok(())
    };
    let raw = disable_raw_mode();
    let screen = execute!(out, DisableMouseCapture, LeaveAlternateScreen, Show);

    popped.and(raw).and(screen)
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    store: FileBestTimeStore,
    key_releases: bool,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let ticks = ThreadTickSource::new(events.sender(), Duration::from_millis(TICK_INTERVAL_MS));
    let runner = Runner::new(
        events,
        FixedFrameRate::new(Duration::from_millis(FRAME_INTERVAL_MS)),
    );

    let session = SessionController::new(ticks, store, InputHub::new())
        .with_display(Box::new(TerminalDisplay::stdout()));
    let mut app = App::new(session, key_releases);

    terminal.draw(|f| f.render_widget(&app, f.area()))?;

    while !app.should_quit {
        if app.handle(runner.step()) {
            terminal.draw(|f| f.render_widget(&app, f.area()))?;
        }
    }

    tracing::info!(best = ?app.session.best_seconds(), "exiting");
    Ok(())
}

fn init_tracing(log_path: Option<PathBuf>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some((path, file)) = log_path.as_deref().and_then(open_log_file) {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!(path = %path.display(), "logging initialized");
        return;
    }

    // Never write logs to the terminal the TUI is drawing on
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(path: &Path) -> Option<(PathBuf, fs::File)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
        .map(|file| (path.to_path_buf(), file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["stillness"]);

        assert_eq!(cli.best_time_file, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_best_time_file() {
        let cli = Cli::parse_from(["stillness", "--best-time-file", "/tmp/best.json"]);
        assert_eq!(cli.best_time_file, Some(PathBuf::from("/tmp/best.json")));
    }

    #[test]
    fn test_cli_log_file() {
        let cli = Cli::parse_from(["stillness", "--log-file", "run.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["stillness", "--number-of-words", "5"]).is_err());
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("stillness.log");

        let (opened, _file) = open_log_file(&path).unwrap();
        assert_eq!(opened, path);
        assert!(path.exists());
    }

    struct FailingWriter {
        attempts: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_restore_continues_after_pop_fails() {
        let mut out = FailingWriter { attempts: 0 };
        let result = restore_terminal(&mut out, true);

        assert!(result.is_err());
        // Popping keyboard flags failed, and leaving the alternate screen was still attempted
        assert!(out.attempts >= 2);
    }

    #[test]
    fn test_restore_writes_leave_sequences() {
        let mut out = Vec::new();
        // disable_raw_mode may fail without a tty; the escape sequences are written regardless
        let _ = restore_terminal(&mut out, false);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
