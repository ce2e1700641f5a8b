use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use super::disambiguator::{ClickDisambiguator, ClickIntent};

/// One disambiguator per click target.
///
/// Each card on screen has its own timing window, so a click on one card
/// never completes a double click started on another.
#[derive(Debug)]
pub struct ClickRouter<K> {
    delay: Duration,
    targets: HashMap<K, ClickDisambiguator>,
}

impl<K: Eq + Hash + Clone> ClickRouter<K> {
    pub fn new(delay: Duration) -> Self {
        ClickRouter {
            delay,
            targets: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the timing window. Pending gestures are dropped.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
        self.targets.clear();
    }

    /// Record a click on `target`. Returns any intent resolved by it.
    pub fn register_click(&mut self, target: K, now: Instant) -> Option<(K, ClickIntent)> {
        let delay = self.delay;
        let d = self
            .targets
            .entry(target.clone())
            .or_insert_with(|| ClickDisambiguator::new(delay));
        d.register_click(now).map(|intent| (target, intent))
    }

    /// Fire every expired timer, oldest deadline first, dropping targets
    /// that went idle.
    pub fn poll(&mut self, now: Instant) -> Vec<(K, ClickIntent)> {
        let mut fired = Vec::new();
        for (target, d) in self.targets.iter_mut() {
            let Some(deadline) = d.deadline() else {
                continue;
            };
            if let Some(intent) = d.poll(now) {
                fired.push((deadline, target.clone(), intent));
            }
        }
        self.targets.retain(|_, d| !d.is_idle());
        fired.sort_by_key(|(deadline, _, _)| *deadline);
        fired.into_iter().map(|(_, target, intent)| (target, intent)).collect()
    }

    /// Earliest pending deadline across all targets
    pub fn next_deadline(&self) -> Option<Instant> {
        self.targets.values().filter_map(|d| d.deadline()).min()
    }

    /// How long the event loop may sleep before the next timer fires,
    /// capped at `max`.
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(max),
            None => max,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Drop every pending gesture (view teardown).
    pub fn cancel_all(&mut self) {
        self.targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::{Clock, ManualClock};

    fn router() -> (ClickRouter<&'static str>, ManualClock) {
        (ClickRouter::new(Duration::from_millis(250)), ManualClock::new())
    }

    #[test]
    fn targets_are_independent() {
        let (mut r, clock) = router();
        assert_eq!(r.register_click("a", clock.now()), None);
        clock.advance_ms(50);
        assert_eq!(r.register_click("b", clock.now()), None);

        clock.advance_ms(200);
        assert_eq!(r.poll(clock.now()), vec![("a", ClickIntent::Single)]);
        clock.advance_ms(50);
        assert_eq!(r.poll(clock.now()), vec![("b", ClickIntent::Single)]);
        assert!(!r.has_pending());
    }

    #[test]
    fn expired_targets_fire_in_deadline_order() {
        let (mut r, clock) = router();
        r.register_click("late", clock.now() + Duration::from_millis(30));
        r.register_click("early", clock.now());
        r.register_click("middle", clock.now() + Duration::from_millis(10));
        clock.advance_ms(1000);
        assert_eq!(
            r.poll(clock.now()),
            vec![
                ("early", ClickIntent::Single),
                ("middle", ClickIntent::Single),
                ("late", ClickIntent::Single),
            ]
        );
    }

    #[test]
    fn double_click_on_same_target() {
        let (mut r, clock) = router();
        r.register_click("a", clock.now());
        clock.advance_ms(100);
        assert_eq!(
            r.register_click("a", clock.now()),
            Some(("a", ClickIntent::Double))
        );
        clock.advance_ms(250);
        assert!(r.poll(clock.now()).is_empty());
        assert!(!r.has_pending());
    }

    #[test]
    fn next_deadline_and_timeout() {
        let (mut r, clock) = router();
        let max = Duration::from_millis(250);
        assert_eq!(r.next_deadline(), None);
        assert_eq!(r.poll_timeout(clock.now(), max), max);

        r.register_click("a", clock.now());
        clock.advance_ms(100);
        assert_eq!(
            r.poll_timeout(clock.now(), max),
            Duration::from_millis(150)
        );

        clock.advance_ms(500);
        assert_eq!(r.poll_timeout(clock.now(), max), Duration::ZERO);
    }

    #[test]
    fn cancel_all_prevents_firing() {
        let (mut r, clock) = router();
        r.register_click("a", clock.now());
        r.register_click("b", clock.now());
        r.cancel_all();
        clock.advance_ms(1000);
        assert!(r.poll(clock.now()).is_empty());
    }

    #[test]
    fn set_delay_drops_pending() {
        let (mut r, clock) = router();
        r.register_click("a", clock.now());
        r.set_delay(Duration::from_millis(400));
        assert_eq!(r.delay(), Duration::from_millis(400));
        clock.advance_ms(1000);
        assert!(r.poll(clock.now()).is_empty());
    }
}
