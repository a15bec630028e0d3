//! Human think-time and pause durations
//!
//! Stochastic waits used between interactions: decision latency, short to
//! long pauses, reading-time estimates and click/hover dwell.

use std::time::Duration;

use rand::Rng;

use crate::config::TimingProfile;

use super::millis;

/// Short pause range (ms)
const MIN_SHORT_PAUSE_MS: u64 = 300;
const MAX_SHORT_PAUSE_MS: u64 = 999;

/// Medium pause range (ms)
const MIN_MEDIUM_PAUSE_MS: u64 = 1000;
const MAX_MEDIUM_PAUSE_MS: u64 = 2999;

/// Long pause range (ms)
const MIN_LONG_PAUSE_MS: u64 = 3000;
const MAX_LONG_PAUSE_MS: u64 = 7999;

/// Reading-time jitter (+/- fraction)
const READING_JITTER: f64 = 0.2;

/// Hover dwell range (ms)
const MIN_HOVER_MS: u64 = 500;
const MAX_HOVER_MS: u64 = 1999;

/// Button hold duration (how long the button stays pressed)
const MIN_PRESS_DURATION_MS: u64 = 50;
const MAX_PRESS_DURATION_MS: u64 = 150;

/// Humanizer for think-time and pause durations
#[derive(Debug, Clone)]
pub struct Humanizer {
    profile: TimingProfile,
}

impl Humanizer {
    /// Humanizer driven by the given timing profile
    pub fn new(profile: TimingProfile) -> Self {
        Self { profile }
    }

    /// The timing profile in use
    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    /// Delay between two separate actions
    pub fn action_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        secs_between(
            self.profile.action_delay_min_secs,
            self.profile.action_delay_max_secs,
            rng,
        )
    }

    /// Decision latency before an action
    pub fn think_time<R: Rng>(&self, rng: &mut R) -> Duration {
        secs_between(
            self.profile.think_time_min_secs,
            self.profile.think_time_max_secs,
            rng,
        )
    }

    /// Time to read `word_count` words at the configured speed, +/- 20%
    pub fn reading_time<R: Rng>(&self, word_count: usize, rng: &mut R) -> Duration {
        if word_count == 0 {
            return Duration::ZERO;
        }

        let seconds = word_count as f64 / self.profile.reading_speed_wpm.max(1) as f64 * 60.0;
        let factor = 1.0 + rng.gen_range(-READING_JITTER..=READING_JITTER);
        millis(seconds * factor * 1000.0)
    }

    /// Brief pause of 300ms to 1s
    pub fn short_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(MIN_SHORT_PAUSE_MS..=MAX_SHORT_PAUSE_MS))
    }

    /// Pause of 1 to 3 seconds
    pub fn medium_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(MIN_MEDIUM_PAUSE_MS..=MAX_MEDIUM_PAUSE_MS))
    }

    /// Pause of 3 to 8 seconds
    pub fn long_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(MIN_LONG_PAUSE_MS..=MAX_LONG_PAUSE_MS))
    }

    /// Short, medium or long pause, chosen uniformly
    pub fn random_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        match rng.gen_range(0..3) {
            0 => self.short_pause(rng),
            1 => self.medium_pause(rng),
            _ => self.long_pause(rng),
        }
    }

    /// Dwell time while hovering over an element
    pub fn hover_dwell<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(MIN_HOVER_MS..=MAX_HOVER_MS))
    }

    /// Settle time between reaching an element and clicking it
    pub fn pre_click_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(100..=399))
    }

    /// Settle time after a click
    pub fn post_click_pause<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(100..=299))
    }

    /// How long a button or key chord stays pressed
    pub fn press_duration<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(MIN_PRESS_DURATION_MS..=MAX_PRESS_DURATION_MS))
    }
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new(TimingProfile::default())
    }
}

fn secs_between<R: Rng>(min: u32, max: u32, rng: &mut R) -> Duration {
    Duration::from_secs(u64::from(rng.gen_range(min..=max.max(min))))
}
