//! Keystroke cadence planning
//!
//! Produces the key events for a piece of text together with the waits
//! around them: per-character cadence from a sampled typing speed, random
//! hesitations, typo-and-backspace pairs and longer gaps after punctuation.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TypingProfile;

use super::{chance, millis};

/// Characters per word when converting WPM to a per-character interval
const CHARS_PER_WORD: f64 = 5.0;

/// Hesitation before a character (ms)
const MIN_HESITATION_MS: u64 = 200;
const MAX_HESITATION_MS: u64 = 500;

/// Extra jitter on typo and backspace events (ms)
const TYPO_JITTER_MS: f64 = 100.0;

/// Cadence jitter as a fraction of the per-character interval
const CADENCE_JITTER: f64 = 0.25;

/// Gap after punctuation (ms)
const MIN_PUNCTUATION_GAP_MS: u64 = 100;
const MAX_PUNCTUATION_GAP_MS: u64 = 400;

/// Gap after a space (ms)
const MIN_WORD_GAP_MS: u64 = 50;
const MAX_WORD_GAP_MS: u64 = 200;

/// Key value emitted for backspace events
pub const BACKSPACE: char = '\u{8}';

/// What a keystroke event represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeystrokeKind {
    /// A wrong letter that is about to be erased
    Typo,
    /// Erases the preceding typo
    Backspace,
    /// A character of the requested text
    Char,
}

/// A single key press with the waits surrounding it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    pub kind: KeystrokeKind,
    pub key: char,
    /// Hesitation before pressing the key
    pub pause_before: Duration,
    /// Cadence wait after pressing the key
    pub delay: Duration,
    /// Extra gap after punctuation or a space
    pub pause_after: Duration,
}

impl KeystrokeEvent {
    fn new(kind: KeystrokeKind, key: char, delay: Duration) -> Self {
        Self {
            kind,
            key,
            pause_before: Duration::ZERO,
            delay,
            pause_after: Duration::ZERO,
        }
    }

    /// Whether this event types a character of the requested text
    pub fn is_real(&self) -> bool {
        self.kind == KeystrokeKind::Char
    }

    /// Total time this event occupies
    pub fn total_wait(&self) -> Duration {
        self.pause_before + self.delay + self.pause_after
    }
}

/// Milliseconds per character for a typing speed in WPM
pub fn ms_per_char(wpm: u32) -> f64 {
    60_000.0 / (wpm.max(1) as f64 * CHARS_PER_WORD)
}

/// Plan the keystrokes needed to type `text`
pub fn generate_keystrokes<R: Rng>(
    text: &str,
    profile: &TypingProfile,
    rng: &mut R,
) -> Vec<KeystrokeEvent> {
    let wpm = rng.gen_range(profile.wpm_min..=profile.wpm_max.max(profile.wpm_min));
    let interval = ms_per_char(wpm);

    let mut events = Vec::with_capacity(text.len() + 4);

    for (i, c) in text.chars().enumerate() {
        let hesitation = if chance(rng, profile.pause_probability) {
            Duration::from_millis(rng.gen_range(MIN_HESITATION_MS..=MAX_HESITATION_MS))
        } else {
            Duration::ZERO
        };
        let first_event = events.len();

        // The first character has nothing before it to correct
        if i > 0 && chance(rng, profile.typo_probability) {
            let wrong = (b'a' + rng.gen_range(0..26u8)) as char;
            let delay = millis(interval + rng.gen_range(0.0..TYPO_JITTER_MS));
            events.push(KeystrokeEvent::new(KeystrokeKind::Typo, wrong, delay));

            let delay = millis(interval + rng.gen_range(0.0..TYPO_JITTER_MS));
            events.push(KeystrokeEvent::new(KeystrokeKind::Backspace, BACKSPACE, delay));
        }

        let jitter = rng.gen_range(-CADENCE_JITTER..=CADENCE_JITTER);
        let delay = millis(interval * (1.0 + jitter));
        let mut event = KeystrokeEvent::new(KeystrokeKind::Char, c, delay);

        event.pause_after = match c {
            '.' | ',' | '!' | '?' => Duration::from_millis(
                rng.gen_range(MIN_PUNCTUATION_GAP_MS..=MAX_PUNCTUATION_GAP_MS),
            ),
            ' ' => Duration::from_millis(rng.gen_range(MIN_WORD_GAP_MS..=MAX_WORD_GAP_MS)),
            _ => Duration::ZERO,
        };
        events.push(event);

        events[first_event].pause_before = hesitation;
    }

    log::debug!(
        "Planned {} keystrokes for {} characters at {} wpm",
        events.len(),
        text.chars().count(),
        wpm
    );

    events
}
