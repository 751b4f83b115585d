use tracing::{debug, info, warn};

use crate::display::ExclusiveDisplay;
use crate::session::{Phase, RunOutcome, SessionState};
use crate::store::BestTimeStore;
use crate::tick::{TickHandle, TickId, TickSource};
use crate::watchdog::{InputChannel, InputHub, Subscription, Watchdog};

/// Resources that exist only while a run is active.
///
/// Dropping the scope cancels the tick producer and detaches every input
/// listener, whichever path leaves the active phase.
#[derive(Debug)]
struct ActiveScope {
    ticker: TickHandle,
    subscription: Subscription,
}

/// Sole owner and writer of the session state.
///
/// Every transition is a no-op when requested from a phase it does not
/// apply to; the return value tells whether it applied.
pub struct SessionController<T: TickSource, B: BestTimeStore> {
    state: SessionState,
    ticks: T,
    store: B,
    watchdog: Watchdog,
    display: Option<Box<dyn ExclusiveDisplay>>,
    active: Option<ActiveScope>,
    next_tick_id: u64,
}

impl<T: TickSource, B: BestTimeStore> SessionController<T, B> {
    pub fn new(ticks: T, store: B, hub: InputHub) -> Self {
        let best_seconds = store.load();
        debug!(?best_seconds, "session created");

        Self {
            state: SessionState::new(best_seconds),
            ticks,
            store,
            watchdog: Watchdog::new(hub),
            display: None,
            active: None,
            next_tick_id: 0,
        }
    }

    pub fn with_display(mut self, display: Box<dyn ExclusiveDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.state.elapsed_seconds
    }

    pub fn best_seconds(&self) -> Option<u64> {
        self.state.best_seconds
    }

    pub fn hub(&self) -> &InputHub {
        self.watchdog.hub()
    }

    /// Id of the live tick source, if a run is active
    pub fn live_tick(&self) -> Option<TickId> {
        self.active.as_ref().map(|scope| scope.ticker.id())
    }

    pub fn enter_ready(&mut self) -> bool {
        match self.state.phase {
            Phase::Idle => {
                self.request_exclusive_display();
                self.to_ready();
                true
            }
            Phase::Ended => {
                self.to_ready();
                true
            }
            phase => {
                debug!(%phase, "ignoring enter_ready");
                false
            }
        }
    }

    pub fn start(&mut self) -> bool {
        if self.state.phase != Phase::Ready {
            debug!(phase = %self.state.phase, "ignoring start");
            return false;
        }

        self.release_active();
        self.state.elapsed_seconds = 0;

        self.next_tick_id += 1;
        let id = TickId(self.next_tick_id);
        self.active = Some(ActiveScope {
            ticker: self.ticks.start(id),
            subscription: self.watchdog.arm(),
        });
        self.state.phase = Phase::Active;
        debug!(tick = id.0, "run started");
        true
    }

    pub fn tick(&mut self, id: TickId) -> bool {
        if self.state.phase != Phase::Active || self.live_tick() != Some(id) {
            debug!(tick = id.0, "discarding stale tick");
            return false;
        }

        self.state.elapsed_seconds = self.state.elapsed_seconds.saturating_add(1);
        true
    }

    pub fn end(&mut self) -> bool {
        if self.state.phase != Phase::Active {
            debug!(phase = %self.state.phase, "ignoring end");
            return false;
        }

        self.release_active();
        self.state.phase = Phase::Ended;

        let elapsed = self.state.elapsed_seconds;
        let previous_best = self.state.best_seconds;
        let new_best = self.state.beats_best(elapsed);

        if new_best {
            self.state.best_seconds = Some(elapsed);
            info!(elapsed, ?previous_best, "new best time");
            if let Err(e) = self.store.save(elapsed) {
                warn!(error = %e, "could not persist best time");
            }
        }

        self.state.last_run = Some(RunOutcome {
            elapsed_seconds: elapsed,
            previous_best,
            new_best,
        });
        debug!(elapsed, "run ended");
        true
    }

    pub fn reset(&mut self) -> bool {
        match self.state.phase {
            Phase::Ended | Phase::Active => {
                if self.state.phase == Phase::Active {
                    debug!(elapsed = self.state.elapsed_seconds, "run cancelled");
                }
                self.to_ready();
                true
            }
            phase => {
                debug!(%phase, "ignoring reset");
                false
            }
        }
    }

    /// Raw input from the platform layer. Ends the run only when an armed
    /// subscription listens on `channel`.
    pub fn on_input(&mut self, channel: InputChannel) -> bool {
        let triggered = self
            .active
            .as_ref()
            .is_some_and(|scope| scope.subscription.triggers_on(channel));

        if triggered {
            debug!(%channel, "input detected");
            self.end()
        } else {
            false
        }
    }

    fn to_ready(&mut self) {
        self.release_active();
        self.state.elapsed_seconds = 0;
        self.state.phase = Phase::Ready;
    }

    fn release_active(&mut self) {
        if let Some(scope) = self.active.take() {
            scope.subscription.disarm();
            drop(scope.ticker);
        }
    }

    fn request_exclusive_display(&mut self) {
        if let Some(display) = self.display.as_mut() {
            if let Err(e) = display.request() {
                debug!(error = %e, "exclusive display unavailable, continuing");
            }
        }
    }
}
