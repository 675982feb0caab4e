use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Decides, once per frame, whether a generation is due.
///
/// Time is passed in by the caller. A tick fires when `now` reaches the armed
/// deadline; the next deadline is then measured from `now`, so a stalled host
/// gets one advance rather than a burst of catch-up advances.
#[derive(Clone, Debug)]
pub struct TickScheduler {
    bounds: PeriodBounds,
    period: Duration,
    pending_period: Duration,
    state: TickState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TickState {
    Paused,
    Running { next_tick: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodBounds {
    pub min: Duration,
    pub max: Duration,
    pub step: Duration,
}

impl PeriodBounds {
    pub fn clamp(&self, period: Duration) -> Duration {
        period.clamp(self.min, self.max)
    }
}

impl Default for PeriodBounds {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(100),
            max: Duration::from_millis(2000),
            step: Duration::from_millis(100),
        }
    }
}

impl TickScheduler {
    /// A paused scheduler. `period` is clamped into `bounds`.
    pub fn new(period: Duration, bounds: PeriodBounds) -> Self {
        assert!(bounds.min <= bounds.max);
        let period = bounds.clamp(period);
        Self {
            bounds,
            period,
            pending_period: period,
            state: TickState::Paused,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The period that takes effect at the next tick.
    pub fn pending_period(&self) -> Duration {
        self.pending_period
    }

    pub fn bounds(&self) -> PeriodBounds {
        self.bounds
    }

    pub fn is_paused(&self) -> bool {
        self.state == TickState::Paused
    }

    /// Returns true at most once per call when a generation is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            TickState::Running { next_tick } if now >= next_tick => {
                if self.pending_period != self.period {
                    debug!(
                        "Period {:?} -> {:?}",
                        self.period, self.pending_period
                    );
                    self.period = self.pending_period;
                }
                self.state = TickState::Running {
                    next_tick: now + self.period,
                };
                trace!("Tick, late by {:?}", now - next_tick);
                true
            }
            _ => false,
        }
    }

    /// Time left until the armed deadline, or `None` while paused.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TickState::Paused => None,
            TickState::Running { next_tick } => Some(next_tick.saturating_duration_since(now)),
        }
    }

    /// Requests a new period, applied when the next tick fires. Ignored while
    /// paused. Returns whether the request was accepted.
    pub fn set_period(&mut self, period: Duration) -> bool {
        if self.is_paused() {
            debug!("Ignoring period change to {period:?} while paused");
            return false;
        }
        self.pending_period = self.bounds.clamp(period);
        debug!("Pending period {:?}", self.pending_period);
        true
    }

    /// Shortens the pending period by one step.
    pub fn faster(&mut self) -> bool {
        self.set_period(self.pending_period.saturating_sub(self.bounds.step))
    }

    /// Lengthens the pending period by one step.
    pub fn slower(&mut self) -> bool {
        self.set_period(self.pending_period.saturating_add(self.bounds.step))
    }

    pub fn pause(&mut self) {
        if !self.is_paused() {
            info!("Paused");
            self.state = TickState::Paused;
        }
    }

    /// Starts ticking again; the first tick is one full period from `now`.
    pub fn resume(&mut self, now: Instant) {
        if self.is_paused() {
            info!("Running every {:?}", self.period);
            self.state = TickState::Running {
                next_tick: now + self.period,
            };
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn running(start: Instant) -> TickScheduler {
        let mut scheduler = TickScheduler::new(ms(500), PeriodBounds::default());
        scheduler.resume(start);
        scheduler
    }

    #[test]
    fn starts_paused_and_never_fires() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(ms(500), PeriodBounds::default());
        assert!(scheduler.is_paused());
        assert!(!scheduler.poll(start + ms(10_000)));
        assert_eq!(scheduler.time_until_tick(start), None);
    }

    #[test]
    fn fires_once_per_period() {
        let start = Instant::now();
        let mut scheduler = running(start);
        assert!(!scheduler.poll(start));
        assert!(!scheduler.poll(start + ms(499)));
        assert!(scheduler.poll(start + ms(500)));
        assert!(!scheduler.poll(start + ms(500)));
        assert!(!scheduler.poll(start + ms(999)));
        assert!(scheduler.poll(start + ms(1000)));
    }

    #[test]
    fn stall_does_not_replay_missed_ticks() {
        let start = Instant::now();
        let mut scheduler = running(start);
        let after_stall = start + ms(5_250);
        assert!(scheduler.poll(after_stall));
        assert!(!scheduler.poll(after_stall));
        assert!(!scheduler.poll(after_stall + ms(499)));
        assert!(scheduler.poll(after_stall + ms(500)));
    }

    #[test]
    fn set_period_clamps_to_bounds() {
        let start = Instant::now();
        let mut scheduler = running(start);
        assert!(scheduler.set_period(ms(50)));
        assert_eq!(scheduler.pending_period(), ms(100));
        assert!(scheduler.set_period(ms(5000)));
        assert_eq!(scheduler.pending_period(), ms(2000));
    }

    #[test]
    fn set_period_while_paused_is_ignored() {
        let mut scheduler = TickScheduler::new(ms(500), PeriodBounds::default());
        assert!(!scheduler.set_period(ms(300)));
        assert!(!scheduler.faster());
        assert_eq!(scheduler.period(), ms(500));
        assert_eq!(scheduler.pending_period(), ms(500));
    }

    #[test]
    fn new_period_applies_at_next_tick() {
        let start = Instant::now();
        let mut scheduler = running(start);
        assert!(scheduler.set_period(ms(200)));
        assert_eq!(scheduler.period(), ms(500));
        // The generation in flight keeps its original deadline.
        assert!(!scheduler.poll(start + ms(200)));
        assert!(scheduler.poll(start + ms(500)));
        assert_eq!(scheduler.period(), ms(200));
        assert!(!scheduler.poll(start + ms(699)));
        assert!(scheduler.poll(start + ms(700)));
    }

    #[test]
    fn faster_and_slower_step_from_pending_period() {
        let start = Instant::now();
        let mut scheduler = running(start);
        scheduler.faster();
        scheduler.faster();
        assert_eq!(scheduler.pending_period(), ms(300));
        scheduler.slower();
        assert_eq!(scheduler.pending_period(), ms(400));
        for _ in 0..10 {
            scheduler.faster();
        }
        assert_eq!(scheduler.pending_period(), ms(100));
        for _ in 0..30 {
            scheduler.slower();
        }
        assert_eq!(scheduler.pending_period(), ms(2000));
    }

    #[test]
    fn resume_schedules_one_period_ahead() {
        let start = Instant::now();
        let mut scheduler = running(start);
        scheduler.pause();
        assert!(!scheduler.poll(start + ms(3000)));
        let resumed_at = start + ms(4000);
        scheduler.resume(resumed_at);
        assert!(!scheduler.poll(resumed_at));
        assert_eq!(scheduler.time_until_tick(resumed_at), Some(ms(500)));
        assert!(scheduler.poll(resumed_at + ms(500)));
    }

    #[test]
    fn toggle_pause_alternates() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(ms(500), PeriodBounds::default());
        scheduler.toggle_pause(start);
        assert!(!scheduler.is_paused());
        scheduler.toggle_pause(start);
        assert!(scheduler.is_paused());
    }

    #[test]
    fn initial_period_is_clamped() {
        let scheduler = TickScheduler::new(ms(10), PeriodBounds::default());
        assert_eq!(scheduler.period(), ms(100));
    }
}
