use std::time::{Duration, Instant};

pub const ZEN_QUOTES: [&str; 5] = [
    "doing nothing is sometimes the most productive thing.",
    "stillness speaks.",
    "in the silence between thoughts, wisdom emerges.",
    "the art of doing nothing is the art of being.",
    "sometimes the most important thing is to do nothing at all.",
];

pub const QUOTE_PERIOD: Duration = Duration::from_secs(4);

/// Landing screen quote rotation, driven by wall-clock time since launch
#[derive(Debug, Clone, Copy)]
pub struct QuoteCycle {
    started_at: Instant,
    period: Duration,
}

impl QuoteCycle {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            period: QUOTE_PERIOD,
        }
    }

    pub fn index_at(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started_at);
        let period_ms = self.period.as_millis().max(1);
        ((elapsed.as_millis() / period_ms) % ZEN_QUOTES.len() as u128) as usize
    }

    pub fn quote_at(&self, now: Instant) -> &'static str {
        ZEN_QUOTES[self.index_at(now)]
    }

    pub fn current(&self) -> &'static str {
        self.quote_at(Instant::now())
    }
}

impl Default for QuoteCycle {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_quote_shows_at_launch() {
        let start = Instant::now();
        let cycle = QuoteCycle::new(start);
        assert_eq!(cycle.quote_at(start), ZEN_QUOTES[0]);
        assert_eq!(cycle.quote_at(start + Duration::from_millis(3999)), ZEN_QUOTES[0]);
    }

    #[test]
    fn advances_every_period_and_wraps() {
        let start = Instant::now();
        let cycle = QuoteCycle::new(start);
        assert_eq!(cycle.index_at(start + QUOTE_PERIOD), 1);
        assert_eq!(cycle.index_at(start + QUOTE_PERIOD * 4), 4);
        assert_eq!(cycle.index_at(start + QUOTE_PERIOD * 5), 0);
        assert_eq!(cycle.index_at(start + QUOTE_PERIOD * 7), 2);
    }

    #[test]
    fn instants_before_start_show_first_quote() {
        let start = Instant::now() + Duration::from_secs(10);
        let cycle = QuoteCycle::new(start);
        assert_eq!(cycle.index_at(Instant::now()), 0);
    }
}
