//! Stealth Sim - human behavior simulation for browser automation
//!
//! This library plans pointer movement, typing and scrolling so that they
//! statistically resemble human input, and gates activity to configured
//! business hours with occasional extended breaks.
//!
//! ## Planning and execution
//!
//! The `stealth` module holds pure planners: given a profile and a random
//! source they return time-annotated steps and never sleep. The `driver`
//! module executes those plans against a remote page through the
//! [`driver::PageDriver`] and [`driver::PageGeometry`] capabilities.
//!
//! One [`StealthEngine`] is created per session and owns its own random
//! source; there is no process-wide state.

pub mod config;
pub mod driver;
pub mod stealth;

use std::time::Duration;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, StealthSettings};
use crate::stealth::mouse::BoundingBox;
use crate::stealth::{
    ActivityWindow, BreakPolicy, Humanizer, KeystrokeEvent, MotionStep, Point, ScrollStep,
};

/// Per-session simulation engine
///
/// Holds validated, immutable profiles and the random source every planner
/// draws from. Seeding the source makes every plan reproducible.
pub struct StealthEngine<R = StdRng> {
    settings: StealthSettings,
    window: ActivityWindow,
    breaks: BreakPolicy,
    humanizer: Humanizer,
    rng: R,
}

impl StealthEngine<StdRng> {
    /// Create an engine seeded from OS entropy
    pub fn new(settings: StealthSettings) -> Result<Self, ConfigError> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed (reproducible plans)
    pub fn seeded(settings: StealthSettings, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> StealthEngine<R> {
    /// Create an engine around an injected random source
    ///
    /// Fails on the first invalid range, probability or timezone.
    pub fn with_rng(settings: StealthSettings, rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;

        let window = ActivityWindow::from_settings(&settings.scheduling)?;
        let breaks = BreakPolicy::from_settings(&settings.scheduling)?;
        let humanizer = Humanizer::new(settings.timing.clone());

        log::info!(
            "Stealth engine ready: window {}-{}h {}",
            settings.scheduling.business_hours_start,
            settings.scheduling.business_hours_end,
            window.timezone()
        );

        Ok(Self {
            settings,
            window,
            breaks,
            humanizer,
            rng,
        })
    }

    pub fn settings(&self) -> &StealthSettings {
        &self.settings
    }

    pub fn window(&self) -> &ActivityWindow {
        &self.window
    }

    // Planners

    /// Plan a pointer path from `start` to `end`
    pub fn generate_path(&mut self, start: Point, end: Point) -> Vec<MotionStep> {
        stealth::generate_path(start, end, &self.settings.mouse, &mut self.rng)
    }

    /// Plan the keystrokes for `text`
    pub fn generate_keystrokes(&mut self, text: &str) -> Vec<KeystrokeEvent> {
        stealth::generate_keystrokes(text, &self.settings.typing, &mut self.rng)
    }

    /// Plan a scroll of `distance` units; positive scrolls down
    pub fn generate_scroll_plan(&mut self, distance: f64) -> Vec<ScrollStep> {
        stealth::generate_scroll_plan(distance, &self.settings.scrolling, &mut self.rng)
    }

    /// Uniformly random point inside `bounds`
    pub fn random_point_in(&mut self, bounds: &BoundingBox) -> Point {
        bounds.random_point(&mut self.rng)
    }

    /// Distance for an idle scroll: usually a short read down, sometimes back up
    pub fn random_scroll_distance(&mut self) -> f64 {
        stealth::scroll::random_scroll_distance(&mut self.rng)
    }

    // Scheduler queries

    /// Whether `at` falls inside the activity window
    pub fn is_in_window<Z: TimeZone>(&self, at: &DateTime<Z>) -> bool {
        self.window.is_in_window(at)
    }

    /// Next time the activity window opens after `now`
    pub fn next_window_start<Z: TimeZone>(&self, now: &DateTime<Z>) -> DateTime<Tz> {
        self.window.next_window_start(now)
    }

    /// How long to wait from `now` until activity is allowed
    pub fn wait_for_window<Z: TimeZone>(&self, now: &DateTime<Z>) -> Duration {
        self.window.wait_for_window(now)
    }

    /// A random start time inside the current or next permitted window
    pub fn random_start_time<Z: TimeZone>(&mut self, now: &DateTime<Z>) -> DateTime<Tz> {
        self.window.random_start_time(now, &mut self.rng)
    }

    /// Single draw against the break probability
    pub fn should_take_break(&mut self) -> bool {
        self.breaks.should_take_break(&mut self.rng)
    }

    /// Length of an extended break
    pub fn break_duration(&mut self) -> Duration {
        self.breaks.break_duration(&mut self.rng)
    }

    /// Decide on a break and its length in one go
    pub fn plan_break(&mut self) -> Option<Duration> {
        self.breaks.plan_break(&mut self.rng)
    }

    // Durations

    /// Decision latency before an action
    pub fn think_time(&mut self) -> Duration {
        self.humanizer.think_time(&mut self.rng)
    }

    /// Delay between two separate actions
    pub fn action_delay(&mut self) -> Duration {
        self.humanizer.action_delay(&mut self.rng)
    }

    /// Time to read `word_count` words
    pub fn reading_time(&mut self, word_count: usize) -> Duration {
        self.humanizer.reading_time(word_count, &mut self.rng)
    }

    /// Brief pause of 300ms to 1s
    pub fn short_pause(&mut self) -> Duration {
        self.humanizer.short_pause(&mut self.rng)
    }

    /// Pause of 1 to 3 seconds
    pub fn medium_pause(&mut self) -> Duration {
        self.humanizer.medium_pause(&mut self.rng)
    }

    /// Pause of 3 to 8 seconds
    pub fn long_pause(&mut self) -> Duration {
        self.humanizer.long_pause(&mut self.rng)
    }

    /// Short, medium or long pause, chosen uniformly
    pub fn random_pause(&mut self) -> Duration {
        self.humanizer.random_pause(&mut self.rng)
    }

    /// Dwell time while hovering over an element
    pub fn hover_dwell(&mut self) -> Duration {
        self.humanizer.hover_dwell(&mut self.rng)
    }

    /// Settle time before a click
    pub fn pre_click_pause(&mut self) -> Duration {
        self.humanizer.pre_click_pause(&mut self.rng)
    }

    /// Settle time after a click
    pub fn post_click_pause(&mut self) -> Duration {
        self.humanizer.post_click_pause(&mut self.rng)
    }

    /// How long a button or key chord stays pressed
    pub fn press_duration(&mut self) -> Duration {
        self.humanizer.press_duration(&mut self.rng)
    }
}
