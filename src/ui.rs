pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::{
    app::App, session::SessionState, store::BestTimeStore, tick::TickSource,
    ui::screen::current_screen,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// What a screen needs to know to draw itself
pub struct ScreenView<'a> {
    pub state: &'a SessionState,
    pub quote: &'static str,
}

impl<T: TickSource, B: BestTimeStore> Widget for &App<T, B> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = ScreenView {
            state: self.session.state(),
            quote: self.quotes.current(),
        };
        let screen = current_screen(view.state.phase);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        render_centered(screen.lines(&view), chunks[0], buf);

        if let Some(legend) = screen.legend() {
            Paragraph::new(Span::styled(
                legend,
                Style::default()
                    .add_modifier(Modifier::DIM)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        }
    }
}

/// Draws `lines` centered both ways inside `area`
pub fn render_centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.height.saturating_sub(height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SessionController;
    use crate::quotes::ZEN_QUOTES;
    use crate::store::MemoryBestTimeStore;
    use crate::tick::ManualTickSource;
    use crate::watchdog::{InputChannel, InputHub};

    type TestApp = App<ManualTickSource, MemoryBestTimeStore>;

    fn create_test_app(best: Option<&str>) -> TestApp {
        let store = best
            .map(MemoryBestTimeStore::with_raw)
            .unwrap_or_default();
        let controller = SessionController::new(ManualTickSource::new(), store, InputHub::new());
        App::new(controller, false)
    }

    fn rendered(app: &TestApp) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn run_for(app: &mut TestApp, secs: u64) {
        app.session.enter_ready();
        app.session.start();
        let id = app.session.live_tick().unwrap();
        for _ in 0..secs {
            app.session.tick(id);
        }
    }

    #[test]
    fn landing_shows_title_and_quote() {
        let app = create_test_app(None);
        let screen = rendered(&app);

        assert!(screen.contains("s t i l l n e s s"));
        assert!(screen.contains(ZEN_QUOTES[0]));
        assert!(screen.contains("a meditation on stillness"));
        assert!(!screen.contains("best:"));
    }

    #[test]
    fn landing_shows_stored_best() {
        let app = create_test_app(Some("3661"));
        assert!(rendered(&app).contains("best: 1h 1m 1s"));
    }

    #[test]
    fn ready_shows_instructions() {
        let mut app = create_test_app(Some("75"));
        app.session.enter_ready();
        let screen = rendered(&app);

        assert!(screen.contains("click to begin. then do absolutely nothing."));
        assert!(screen.contains("best: 1m 15s"));
    }

    #[test]
    fn active_shows_running_clock() {
        let mut app = create_test_app(None);
        run_for(&mut app, 61);
        let screen = rendered(&app);

        assert!(screen.contains("1m 1s"));
        assert!(screen.contains("doing nothing..."));
    }

    #[test]
    fn ended_with_new_best() {
        let mut app = create_test_app(Some("2"));
        run_for(&mut app, 5);
        app.session.on_input(InputChannel::KeyDown);
        let screen = rendered(&app);

        assert!(screen.contains("you did something."));
        assert!(screen.contains("you lose."));
        assert!(screen.contains("you lasted: 5s"));
        assert!(screen.contains("new best time"));
        assert!(screen.contains("previous: 2s"));
        assert!(!screen.contains("best: "));
    }

    #[test]
    fn ended_below_best_shows_best() {
        let mut app = create_test_app(Some("10"));
        run_for(&mut app, 3);
        app.session.end();
        let screen = rendered(&app);

        assert!(screen.contains("you lasted: 3s"));
        assert!(!screen.contains("new best time"));
        assert!(screen.contains("best: 10s"));
        assert!(screen.contains("try again"));
    }

    #[test]
    fn tiny_areas_do_not_panic() {
        let app = create_test_app(Some("1"));
        for (w, h) in [(1, 1), (12, 3), (200, 2), (20, 50)] {
            let area = Rect::new(0, 0, w, h);
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
        }
    }
}
