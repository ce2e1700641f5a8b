use std::time::{Duration, Instant};

/// Default timing window between two clicks of a double click
pub const DEFAULT_DELAY: Duration = Duration::from_millis(250);

/// What a resolved click gesture means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickIntent {
    /// One click with no follow-up inside the window
    Single,
    /// Second click arrived inside the window
    Double,
}

/// Turns raw clicks into single/double intents using a timing window.
///
/// States: idle (`click == 0`, no deadline) and pending (`click >= 1`,
/// deadline set). Every click restarts the timer. The second click emits
/// `Double` immediately; the timer firing emits `Single` only when exactly
/// one click was seen, and always returns the machine to idle.
#[derive(Debug, Clone)]
pub struct ClickDisambiguator {
    delay: Duration,
    click: u32,
    deadline: Option<Instant>,
}

impl ClickDisambiguator {
    pub fn new(delay: Duration) -> Self {
        ClickDisambiguator {
            delay,
            click: 0,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Clicks seen in the current window
    pub fn click_count(&self) -> u32 {
        self.click
    }

    /// When the pending timer fires, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_idle(&self) -> bool {
        self.deadline.is_none()
    }

    /// Record a click at `now`.
    ///
    /// If the previous window already expired, it is resolved first, so a
    /// stale single click is returned before the new click starts its own
    /// cycle. Otherwise returns `Double` when this click is the second one.
    pub fn register_click(&mut self, now: Instant) -> Option<ClickIntent> {
        let expired = self.poll(now);

        self.click = self.click.saturating_add(1);
        self.deadline = Some(now + self.delay);

        if self.click == 2 {
            return Some(ClickIntent::Double);
        }
        expired
    }

    /// Fire the timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ClickIntent> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        let fired = if self.click == 1 {
            Some(ClickIntent::Single)
        } else {
            None
        };
        self.click = 0;
        self.deadline = None;
        fired
    }

    /// Drop the pending timer without firing it.
    pub fn cancel(&mut self) {
        self.click = 0;
        self.deadline = None;
    }
}

impl Default for ClickDisambiguator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::{Clock, ManualClock};

    /// Feed clicks at the given offsets (ms) and poll every millisecond up to
    /// `until`, collecting (time, intent) pairs.
    fn run(clicks: &[u64], until: u64, delay_ms: u64) -> Vec<(u64, ClickIntent)> {
        let clock = ManualClock::new();
        let start = clock.now();
        let mut d = ClickDisambiguator::new(Duration::from_millis(delay_ms));
        let mut out = Vec::new();
        let mut next = clicks.iter().peekable();
        for t in 0..=until {
            let now = start + Duration::from_millis(t);
            if let Some(intent) = d.poll(now) {
                out.push((t, intent));
            }
            while next.peek().is_some_and(|&&c| c == t) {
                next.next();
                if let Some(intent) = d.register_click(now) {
                    out.push((t, intent));
                }
            }
        }
        out
    }

    #[test]
    fn spaced_clicks_are_singles() {
        let out = run(&[0, 400, 800, 1200], 2000, 250);
        assert_eq!(
            out,
            vec![
                (250, ClickIntent::Single),
                (650, ClickIntent::Single),
                (1050, ClickIntent::Single),
                (1450, ClickIntent::Single),
            ]
        );
    }

    #[test]
    fn close_pair_is_one_double() {
        let out = run(&[0, 100], 1000, 250);
        assert_eq!(out, vec![(100, ClickIntent::Double)]);
    }

    #[test]
    fn double_fires_immediately_and_timer_resets_silently() {
        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();

        assert_eq!(d.register_click(clock.now()), None);
        clock.advance_ms(100);
        assert_eq!(d.register_click(clock.now()), Some(ClickIntent::Double));
        assert_eq!(d.click_count(), 2);

        // Timer restarted at t=100, so nothing happens at t=250
        clock.advance_ms(150);
        assert_eq!(d.poll(clock.now()), None);
        assert_eq!(d.click_count(), 2);

        // Fires at t=350 with no single
        clock.advance_ms(100);
        assert_eq!(d.poll(clock.now()), None);
        assert_eq!(d.click_count(), 0);
        assert!(d.is_idle());
    }

    #[test]
    fn click_after_window_starts_fresh_cycle() {
        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();

        assert_eq!(d.register_click(clock.now()), None);
        clock.advance_ms(250);
        assert_eq!(d.poll(clock.now()), Some(ClickIntent::Single));

        clock.advance_ms(50);
        assert_eq!(d.register_click(clock.now()), None);
        assert_eq!(d.click_count(), 1);
    }

    #[test]
    fn stale_single_is_flushed_by_next_click() {
        // No poll between clicks: the late click still resolves the first one.
        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();

        d.register_click(clock.now());
        clock.advance_ms(300);
        assert_eq!(d.register_click(clock.now()), Some(ClickIntent::Single));
        assert_eq!(d.click_count(), 1);
        clock.advance_ms(250);
        assert_eq!(d.poll(clock.now()), Some(ClickIntent::Single));
    }

    #[test]
    fn triple_click_yields_one_double_and_resets() {
        let out = run(&[0, 50, 100], 1000, 250);
        assert_eq!(out, vec![(50, ClickIntent::Double)]);

        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();
        d.register_click(clock.now());
        d.register_click(clock.now());
        d.register_click(clock.now());
        assert_eq!(d.click_count(), 3);
        clock.advance_ms(250);
        assert_eq!(d.poll(clock.now()), None);
        assert_eq!(d.click_count(), 0);

        // Next gesture behaves normally
        assert_eq!(d.register_click(clock.now()), None);
        clock.advance_ms(250);
        assert_eq!(d.poll(clock.now()), Some(ClickIntent::Single));
    }

    #[test]
    fn cancel_drops_pending_single() {
        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();
        d.register_click(clock.now());
        d.cancel();
        clock.advance_ms(1000);
        assert_eq!(d.poll(clock.now()), None);
        assert!(d.is_idle());
    }

    #[test]
    fn custom_delay_is_respected() {
        let out = run(&[0, 400], 2000, 500);
        assert_eq!(out, vec![(400, ClickIntent::Double)]);
    }

    #[test]
    fn poll_on_idle_is_noop() {
        let clock = ManualClock::new();
        let mut d = ClickDisambiguator::default();
        assert_eq!(d.poll(clock.now()), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn intents_for_mixed_sequence() {
        let intents: Vec<ClickIntent> = run(&[0, 100, 600, 1200, 1300, 1350], 3000, 250)
            .into_iter()
            .map(|(_, i)| i)
            .collect();
        insta::assert_debug_snapshot!(intents, @r"
        [
            Double,
            Single,
            Double,
        ]
        ");
    }
}
