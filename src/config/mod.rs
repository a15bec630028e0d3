//! Configuration module
//!
//! Handles behavior profiles, the activity window, and their validation.

pub mod settings;

pub use settings::{
    MotionProfile, ScheduleWindow, ScrollProfile, StealthSettings, TimingProfile, TypingProfile,
};

/// Errors raised while building or validating settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

pub(crate) fn check_range<T>(field: &'static str, min: T, max: T) -> Result<(), ConfigError>
where
    T: PartialOrd + Into<f64> + Copy,
{
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            field,
            min: min.into(),
            max: max.into(),
        })
    }
}
