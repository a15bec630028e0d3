//! Human behavior simulation
//!
//! Pure planners that turn an intent into time-annotated steps:
//! - Bezier pointer paths with overshoot and tremor corrections
//! - Keystroke cadence with typos and punctuation gaps
//! - Chunked scrolling with reading pauses and back-scrolls
//! - Business-hours gating, breaks and think-time durations
//!
//! None of these touch I/O or sleep; see [`crate::driver`] for execution.

pub mod humanize;
pub mod mouse;
pub mod schedule;
pub mod scroll;
pub mod typing;

pub use humanize::Humanizer;
pub use mouse::{generate_path, BoundingBox, MotionKind, MotionStep, Point};
pub use schedule::{wait_until, ActivityWindow, BreakPolicy};
pub use scroll::{generate_scroll_plan, BackScroll, ScrollStep};
pub use typing::{generate_keystrokes, KeystrokeEvent, KeystrokeKind};

use std::time::Duration;

use rand::Rng;

/// Bernoulli draw; p <= 0 never fires, p >= 1 always does
pub(crate) fn chance<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Fractional milliseconds to a duration, floored at zero
pub(crate) fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_nanos((ms * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}
