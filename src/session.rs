/// Stage of a run, in the order a player moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Landing screen shown at launch
    Idle,
    Ready,
    /// Clock running, watchdog armed
    Active,
    Ended,
}

/// Result of the most recent run, kept for the end screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub elapsed_seconds: u64,
    pub previous_best: Option<u64>,
    pub new_best: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub elapsed_seconds: u64,
    pub best_seconds: Option<u64>,
    pub last_run: Option<RunOutcome>,
}

impl SessionState {
    pub fn new(best_seconds: Option<u64>) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_seconds: 0,
            best_seconds,
            last_run: None,
        }
    }

    /// Whether `elapsed` beats the stored best. An absent best is always beaten.
    pub fn beats_best(&self, elapsed: u64) -> bool {
        self.best_seconds.map_or(true, |best| elapsed > best)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(None)
    }
}
