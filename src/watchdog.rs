use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Input classes that end a run while the watchdog is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InputChannel {
    PointerMove,
    KeyDown,
    KeyUp,
    PointerClick,
    Scroll,
    TouchStart,
    TouchMove,
}

impl InputChannel {
    pub const ALL: [InputChannel; 7] = [
        InputChannel::PointerMove,
        InputChannel::KeyDown,
        InputChannel::KeyUp,
        InputChannel::PointerClick,
        InputChannel::Scroll,
        InputChannel::TouchStart,
        InputChannel::TouchMove,
    ];
}

/// Listener registry shared between the platform layer and subscriptions.
///
/// Clones share the same registry. Registrations are counted per channel so
/// overlapping subscriptions each detach only their own entries.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    listeners: Rc<RefCell<HashMap<InputChannel, usize>>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, channel: InputChannel) {
        *self.listeners.borrow_mut().entry(channel).or_insert(0) += 1;
    }

    fn unregister(&self, channel: InputChannel) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(count) = listeners.get_mut(&channel) {
            *count -= 1;
            if *count == 0 {
                listeners.remove(&channel);
            }
        }
    }

    pub fn is_listening(&self, channel: InputChannel) -> bool {
        self.listeners.borrow().contains_key(&channel)
    }

    /// Total live registrations across all channels
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().sum()
    }
}

/// Arms subscriptions on every monitored channel of a hub
#[derive(Debug, Clone)]
pub struct Watchdog {
    hub: InputHub,
}

impl Watchdog {
    pub fn new(hub: InputHub) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &InputHub {
        &self.hub
    }

    pub fn arm(&self) -> Subscription {
        for channel in InputChannel::ALL {
            self.hub.register(channel);
        }
        tracing::trace!(channels = InputChannel::ALL.len(), "watchdog armed");

        Subscription {
            hub: self.hub.clone(),
            channels: InputChannel::ALL.to_vec(),
        }
    }
}

/// Live set of listener registrations.
///
/// `disarm` is the explicit way to remove it; dropping it detaches the same
/// registrations, which covers teardown paths that never call `disarm`.
#[derive(Debug)]
pub struct Subscription {
    hub: InputHub,
    channels: Vec<InputChannel>,
}

impl Subscription {
    pub fn triggers_on(&self, channel: InputChannel) -> bool {
        self.channels.contains(&channel) && self.hub.is_listening(channel)
    }

    pub fn disarm(self) {
        drop(self);
    }

    fn detach(&mut self) {
        for channel in self.channels.drain(..) {
            self.hub.unregister(channel);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.channels.is_empty() {
            tracing::trace!("watchdog disarmed");
        }
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_registers_every_channel() {
        let watchdog = Watchdog::new(InputHub::new());
        let sub = watchdog.arm();

        assert_eq!(watchdog.hub().listener_count(), 7);
        for channel in InputChannel::ALL {
            assert!(watchdog.hub().is_listening(channel));
            assert!(sub.triggers_on(channel));
        }
    }

    #[test]
    fn disarm_removes_all_registrations() {
        let watchdog = Watchdog::new(InputHub::new());
        let sub = watchdog.arm();
        sub.disarm();

        assert_eq!(watchdog.hub().listener_count(), 0);
        assert!(!watchdog.hub().is_listening(InputChannel::KeyDown));
    }

    #[test]
    fn drop_detaches_like_disarm() {
        let hub = InputHub::new();
        {
            let _sub = Watchdog::new(hub.clone()).arm();
            assert_eq!(hub.listener_count(), 7);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn overlapping_subscriptions_detach_independently() {
        let watchdog = Watchdog::new(InputHub::new());
        let first = watchdog.arm();
        let second = watchdog.arm();
        assert_eq!(watchdog.hub().listener_count(), 14);

        first.disarm();
        assert_eq!(watchdog.hub().listener_count(), 7);
        assert!(second.triggers_on(InputChannel::Scroll));

        second.disarm();
        assert_eq!(watchdog.hub().listener_count(), 0);
    }

    #[test]
    fn channel_display_names() {
        assert_eq!(InputChannel::PointerMove.to_string(), "pointer-move");
        assert_eq!(InputChannel::TouchStart.to_string(), "touch-start");
    }
}
