use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent};

use crate::tick::{TickHandle, TickId, TickSource};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum StillEvent {
    /// Anything the terminal reported: keys, mouse, paste, resize, focus
    Terminal(CtEvent),
    /// One second elapsed on the tick source with this id
    Tick(TickId),
    /// No event within the frame interval; time to redraw
    Frame,
}

/// Source of application events
pub trait StillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<StillEvent, RecvTimeoutError>;
}

/// Production event source using crossterm.
///
/// Owns the channel that tick threads also feed, so every event is handled
/// on the thread that drives the runner.
pub struct CrosstermEventSource {
    tx: Sender<StillEvent>,
    rx: Receiver<StillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if reader_tx.send(StillEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<StillEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable redraw interval
pub trait FrameRate: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed redraw interval
#[derive(Clone, Copy, Debug)]
pub struct FixedFrameRate {
    interval: Duration,
}

impl FixedFrameRate {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl FrameRate for FixedFrameRate {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<StillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<StillEvent>) -> Self {
        Self { rx }
    }
}

impl StillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<StillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: StillEventSource, F: FrameRate> {
    event_source: E,
    frame_rate: F,
}

impl<E: StillEventSource, F: FrameRate> Runner<E, F> {
    pub fn new(event_source: E, frame_rate: F) -> Self {
        Self {
            event_source,
            frame_rate,
        }
    }

    /// Blocks up to the frame interval and returns the next event, or Frame on timeout
    pub fn step(&self) -> StillEvent {
        match self.event_source.recv_timeout(self.frame_rate.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                StillEvent::Frame
            }
        }
    }
}

/// Tick source backed by one sleeping thread per run.
///
/// The thread checks the handle's cancel flag before every send and exits
/// once it is set or the receiving side is gone.
#[derive(Debug, Clone)]
pub struct ThreadTickSource {
    tx: Sender<StillEvent>,
    interval: Duration,
}

impl ThreadTickSource {
    pub fn new(tx: Sender<StillEvent>, interval: Duration) -> Self {
        Self { tx, interval }
    }
}

impl TickSource for ThreadTickSource {
    fn start(&mut self, id: TickId) -> TickHandle {
        let handle = TickHandle::new(id);
        let cancelled = handle.cancel_flag();
        let tx = self.tx.clone();
        let interval = self.interval;

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(StillEvent::Tick(id)).is_err() {
                break;
            }
        });

        handle
    }
}
