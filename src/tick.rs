use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// Identifies one Tick Source instance. Ticks from a cancelled source carry
/// an id that no longer matches the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Ownership of a running periodic tick. Dropping the handle cancels it.
#[derive(Debug)]
pub struct TickHandle {
    id: TickId,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new(id: TickId) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }

    /// Flag the producer polls before each tick
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Creates periodic one-second tick producers
pub trait TickSource {
    fn start(&mut self, id: TickId) -> TickHandle;
}

/// Tick source that never fires on its own; callers deliver ticks by hand.
///
/// Clones share the record of started handles, so a test can keep one clone
/// and inspect how many sources are still live.
#[derive(Debug, Clone, Default)]
pub struct ManualTickSource {
    started: Arc<Mutex<Vec<(TickId, Arc<AtomicBool>)>>>,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> usize {
        self.started.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn live_count(&self) -> usize {
        self.started
            .lock()
            .map(|s| {
                s.iter()
                    .filter(|(_, cancelled)| !cancelled.load(Ordering::SeqCst))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Id of the most recently started source, live or not
    pub fn last_id(&self) -> Option<TickId> {
        self.started
            .lock()
            .ok()
            .and_then(|s| s.last().map(|(id, _)| *id))
    }
}

impl TickSource for ManualTickSource {
    fn start(&mut self, id: TickId) -> TickHandle {
        let handle = TickHandle::new(id);
        if let Ok(mut started) = self.started.lock() {
            started.push((id, handle.cancel_flag()));
        }
        handle
    }
}
