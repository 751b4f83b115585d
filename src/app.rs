use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::controller::SessionController;
use crate::quotes::QuoteCycle;
use crate::runtime::StillEvent;
use crate::session::Phase;
use crate::store::BestTimeStore;
use crate::tick::TickSource;
use crate::watchdog::InputChannel;

/// Which watchdog channel a terminal event belongs to, if any
pub fn classify(event: &Event) -> Option<InputChannel> {
    match event {
        Event::Key(key) => Some(match key.kind {
            KeyEventKind::Release => InputChannel::KeyUp,
            KeyEventKind::Press | KeyEventKind::Repeat => InputChannel::KeyDown,
        }),
        Event::Paste(_) => Some(InputChannel::KeyDown),
        Event::Mouse(mouse) => Some(match mouse.kind {
            MouseEventKind::Down(_) | MouseEventKind::Up(_) => InputChannel::PointerClick,
            MouseEventKind::Moved | MouseEventKind::Drag(_) => InputChannel::PointerMove,
            MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => InputChannel::Scroll,
        }),
        Event::Resize(_, _) | Event::FocusGained | Event::FocusLost => None,
    }
}

/// Gesture begun in the current phase whose completion triggers the
/// phase's primary action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingActivation {
    Key(KeyCode),
    Click,
}

pub struct App<T: TickSource, B: BestTimeStore> {
    pub session: SessionController<T, B>,
    pub quotes: QuoteCycle,
    /// Terminal reports key releases (kitty keyboard protocol)
    pub key_releases: bool,
    pub should_quit: bool,
    pending: Option<PendingActivation>,
}

impl<T: TickSource, B: BestTimeStore> App<T, B> {
    pub fn new(session: SessionController<T, B>, key_releases: bool) -> Self {
        Self {
            session,
            quotes: QuoteCycle::default(),
            key_releases,
            should_quit: false,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Applies one runner event. Returns whether the screen needs a redraw.
    pub fn handle(&mut self, event: StillEvent) -> bool {
        match event {
            StillEvent::Terminal(ev) => self.on_terminal_event(ev),
            StillEvent::Tick(id) => self.session.tick(id),
            // idle and active screens change with the clock alone
            StillEvent::Frame => matches!(self.phase(), Phase::Idle | Phase::Active),
        }
    }

    pub fn on_terminal_event(&mut self, event: Event) -> bool {
        if self.phase() == Phase::Active {
            if let Some(channel) = classify(&event) {
                self.session.on_input(channel);
            }
            return true;
        }

        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        let is_press = key.kind != KeyEventKind::Release;

        if is_press {
            let quit = matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
                || (key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c'));
            if quit {
                self.should_quit = true;
                return false;
            }
        }

        let activates = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => true,
            KeyCode::Char('r') => self.phase() == Phase::Ended,
            _ => false,
        };
        if !activates {
            return false;
        }

        if !self.key_releases {
            return is_press && self.activate();
        }

        match key.kind {
            KeyEventKind::Press => {
                self.pending = Some(PendingActivation::Key(key.code));
                false
            }
            KeyEventKind::Release => {
                self.pending.take() == Some(PendingActivation::Key(key.code)) && self.activate()
            }
            KeyEventKind::Repeat => false,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pending = Some(PendingActivation::Click);
                false
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pending.take() == Some(PendingActivation::Click) && self.activate()
            }
            _ => false,
        }
    }

    fn activate(&mut self) -> bool {
        self.pending = None;
        match self.phase() {
            Phase::Idle => self.session.enter_ready(),
            Phase::Ready => self.session.start(),
            Phase::Ended => self.session.reset(),
            Phase::Active => false,
        }
    }
}
