//! Scroll pattern planning
//!
//! Splits a scroll distance into jittered chunks with pacing, reading pauses
//! and occasional corrective back-scrolls.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ScrollProfile;

use super::chance;

/// Chunk count range (inclusive)
const MIN_CHUNKS: usize = 5;
const MAX_CHUNKS: usize = 14;

/// Per-chunk jitter as a fraction of the base chunk
const CHUNK_JITTER: f64 = 0.25;

/// Reading pause after a chunk (ms)
const MIN_READ_PAUSE_MS: u64 = 500;
const MAX_READ_PAUSE_MS: u64 = 2000;

/// Settle time after a back-scroll (ms)
const MIN_SETTLE_MS: u64 = 200;
const MAX_SETTLE_MS: u64 = 500;

/// A brief reverse scroll after a chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackScroll {
    pub delta: f64,
    pub settle: Duration,
}

/// One chunk of a scroll plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollStep {
    /// Forward scroll delta, same sign as the requested distance
    pub delta: f64,
    /// Wait after the chunk
    pub delay: Duration,
    /// Optional reading pause after the delay
    pub pause: Option<Duration>,
    /// Optional corrective reverse scroll
    pub back_scroll: Option<BackScroll>,
}

/// Plan a scroll of `distance` units; positive scrolls down
///
/// Forward deltas always sum to `distance`; back-scrolls are transient and
/// excluded from that sum. A zero distance yields an empty plan.
pub fn generate_scroll_plan<R: Rng>(
    distance: f64,
    profile: &ScrollProfile,
    rng: &mut R,
) -> Vec<ScrollStep> {
    if distance == 0.0 || !distance.is_finite() {
        return Vec::new();
    }

    let chunks = rng.gen_range(MIN_CHUNKS..=MAX_CHUNKS);
    let direction = distance.signum();
    let base = distance.abs() / chunks as f64;
    let jitters = balanced_jitter(chunks, rng);

    let mut steps = Vec::with_capacity(chunks);
    for jitter in jitters {
        let delta = direction * base * (1.0 + jitter);
        let delay = Duration::from_millis(
            rng.gen_range(profile.speed_min_ms..=profile.speed_max_ms.max(profile.speed_min_ms))
                as u64,
        );

        let pause = chance(rng, profile.pause_probability)
            .then(|| Duration::from_millis(rng.gen_range(MIN_READ_PAUSE_MS..=MAX_READ_PAUSE_MS)));

        // Only downward scrolls get corrected
        let back_scroll = (direction > 0.0 && chance(rng, profile.scroll_back_probability)).then(
            || BackScroll {
                delta: -direction * rng.gen_range(0.0..=0.5) * delta.abs(),
                settle: Duration::from_millis(rng.gen_range(MIN_SETTLE_MS..=MAX_SETTLE_MS)),
            },
        );

        steps.push(ScrollStep {
            delta,
            delay,
            pause,
            back_scroll,
        });
    }

    log::debug!("Planned scroll of {distance:.0} in {chunks} chunks");

    steps
}

/// Draw per-chunk jitter in [-0.25, 0.25] whose total is zero
///
/// Each draw is narrowed so the accumulated drift can still be cancelled by
/// the chunks that remain; the last chunk takes whatever drift is left.
fn balanced_jitter<R: Rng>(chunks: usize, rng: &mut R) -> Vec<f64> {
    let mut jitters = Vec::with_capacity(chunks);
    let mut drift = 0.0;

    for i in 0..chunks {
        let remaining = (chunks - 1 - i) as f64;
        let jitter = if remaining == 0.0 {
            -drift
        } else {
            let low = (-CHUNK_JITTER).max(-CHUNK_JITTER * remaining - drift);
            let high = CHUNK_JITTER.min(CHUNK_JITTER * remaining - drift);
            if low < high {
                rng.gen_range(low..=high)
            } else {
                low
            }
        };
        drift += jitter;
        jitters.push(jitter);
    }

    jitters
}

/// Idle scroll distance: half the time 200-699 down, otherwise 100-399 up
pub fn random_scroll_distance<R: Rng>(rng: &mut R) -> f64 {
    if chance(rng, 0.5) {
        rng.gen_range(200..=699) as f64
    } else {
        -(rng.gen_range(100..=399) as f64)
    }
}

/// Distance that centres an element's top edge in the viewport
///
/// `target_top` is in document coordinates.
pub fn distance_to_element(target_top: f64, viewport_height: f64, scroll_offset: f64) -> f64 {
    target_top - viewport_height / 2.0 - scroll_offset
}

/// Distance back to the top of the document
pub fn distance_to_top(scroll_offset: f64) -> f64 {
    -scroll_offset
}

/// Distance to the bottom of the document
pub fn distance_to_bottom(document_height: f64, scroll_offset: f64) -> f64 {
    document_height - scroll_offset
}
