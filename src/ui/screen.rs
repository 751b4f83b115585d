use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::{session::Phase, ui::ScreenView, util::format_elapsed};

/// A UI Screen boundary: one per phase
pub trait Screen {
    fn lines(&self, view: &ScreenView) -> Vec<Line<'static>>;
    /// Key legend shown at the bottom, if the screen has one
    fn legend(&self) -> Option<&'static str> {
        None
    }
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn best_line(best: Option<u64>) -> Option<Line<'static>> {
    best.map(|b| Line::from(Span::styled(format!("best: {}", format_elapsed(b)), dim())))
}

pub struct LandingScreen;

impl Screen for LandingScreen {
    fn lines(&self, view: &ScreenView) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "s t i l l n e s s",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                view.quote,
                dim().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(""),
            Line::from("a meditation on stillness. do nothing. move nothing. think nothing."),
            Line::from(""),
            Line::from(Span::styled("press enter to take over the screen", dim())),
        ];
        lines.extend(best_line(view.state.best_seconds));
        lines
    }

    fn legend(&self) -> Option<&'static str> {
        Some("(enter) begin / (esc)ape")
    }
}

pub struct ReadyScreen;

impl Screen for ReadyScreen {
    fn lines(&self, view: &ScreenView) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "click to begin. then do absolutely nothing.",
                dim(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "▶ start doing nothing",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(best_line(view.state.best_seconds));
        lines
    }

    fn legend(&self) -> Option<&'static str> {
        Some("(enter) / click to start / (esc)ape")
    }
}

/// Deliberately bare: no legend while any key would end the run
pub struct ActiveScreen;

impl Screen for ActiveScreen {
    fn lines(&self, view: &ScreenView) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                format_elapsed(view.state.elapsed_seconds),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("doing nothing...", dim())),
        ]
    }
}

pub struct EndedScreen;

impl Screen for EndedScreen {
    fn lines(&self, view: &ScreenView) -> Vec<Line<'static>> {
        let state = view.state;
        let mut lines = vec![
            Line::from("you did something."),
            Line::from(Span::styled("you lose.", dim())),
            Line::from(""),
            Line::from(Span::styled(
                format!("you lasted: {}", format_elapsed(state.elapsed_seconds)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        match state.last_run {
            Some(run) if run.new_best => {
                lines.push(Line::from(Span::styled(
                    "new best time",
                    Style::default().fg(Color::Green),
                )));
                if let Some(previous) = run.previous_best {
                    lines.push(Line::from(Span::styled(
                        format!("previous: {}", format_elapsed(previous)),
                        dim(),
                    )));
                }
            }
            _ => {
                lines.extend(best_line(state.best_seconds));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("↻ try again", dim())));
        lines
    }

    fn legend(&self) -> Option<&'static str> {
        Some("(enter) / (r) try again / (esc)ape")
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(LandingScreen),
        Phase::Ready => Box::new(ReadyScreen),
        Phase::Active => Box::new(ActiveScreen),
        Phase::Ended => Box::new(EndedScreen),
    }
}
