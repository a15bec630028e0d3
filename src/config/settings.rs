//! Behavior profiles and activity window settings
//!
//! Defines all configurable ranges and probabilities for the simulation.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{check_probability, check_range, ConfigError};

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthSettings {
    /// Pointer movement behavior
    pub mouse: MotionProfile,
    /// Typing cadence behavior
    pub typing: TypingProfile,
    /// Scrolling behavior
    pub scrolling: ScrollProfile,
    /// Think-time and pause ranges
    pub timing: TimingProfile,
    /// Activity window and break policy
    pub scheduling: ScheduleWindow,
}

impl StealthSettings {
    /// Parse settings from JSON and validate every section
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section, failing on the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mouse.validate()?;
        self.typing.validate()?;
        self.scrolling.validate()?;
        self.timing.validate()?;
        self.scheduling.validate()?;
        Ok(())
    }

    /// Create settings for slow, careful sessions
    pub fn cautious() -> Self {
        Self {
            mouse: MotionProfile {
                control_point_count: 5,
                speed_variation: 0.4,
                overshoot_probability: 0.2,
                micro_correction_probability: 0.25,
            },
            typing: TypingProfile {
                wpm_min: 30,
                wpm_max: 50,
                typo_probability: 0.04,
                pause_probability: 0.08,
            },
            scrolling: ScrollProfile {
                speed_min_ms: 100,
                speed_max_ms: 250,
                scroll_back_probability: 0.15,
                pause_probability: 0.25,
            },
            timing: TimingProfile {
                action_delay_min_secs: 4,
                action_delay_max_secs: 9,
                think_time_min_secs: 2,
                think_time_max_secs: 6,
                reading_speed_wpm: 180,
            },
            scheduling: ScheduleWindow {
                break_probability: 0.15,
                ..Default::default()
            },
        }
    }

    /// Create settings with short delays (for testing)
    pub fn fast() -> Self {
        Self {
            mouse: MotionProfile {
                control_point_count: 3,
                speed_variation: 0.1,
                overshoot_probability: 0.0,
                micro_correction_probability: 0.0,
            },
            typing: TypingProfile {
                wpm_min: 90,
                wpm_max: 120,
                typo_probability: 0.0,
                pause_probability: 0.0,
            },
            scrolling: ScrollProfile {
                speed_min_ms: 20,
                speed_max_ms: 50,
                scroll_back_probability: 0.0,
                pause_probability: 0.0,
            },
            timing: TimingProfile {
                action_delay_min_secs: 0,
                action_delay_max_secs: 1,
                think_time_min_secs: 0,
                think_time_max_secs: 1,
                reading_speed_wpm: 400,
            },
            scheduling: ScheduleWindow {
                weekend_activity: true,
                break_probability: 0.0,
                ..Default::default()
            },
        }
    }
}

/// Pointer movement profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Number of Bezier control points, including start and end
    #[serde(alias = "bezier_points")]
    pub control_point_count: usize,
    /// Per-step delay variation factor (0.0-1.0)
    pub speed_variation: f64,
    /// Probability of overshooting the target (0.0-1.0)
    pub overshoot_probability: f64,
    /// Probability of a tremor correction at each interior point (0.0-1.0)
    pub micro_correction_probability: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            control_point_count: 4,
            speed_variation: 0.3,
            overshoot_probability: 0.15,
            micro_correction_probability: 0.2,
        }
    }
}

impl MotionProfile {
    /// Check probabilities and the control point count
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_point_count < 2 {
            return Err(ConfigError::OutOfRange {
                field: "mouse.control_point_count",
                reason: format!("need at least 2, got {}", self.control_point_count),
            });
        }
        check_probability("mouse.speed_variation", self.speed_variation)?;
        check_probability("mouse.overshoot_probability", self.overshoot_probability)?;
        check_probability(
            "mouse.micro_correction_probability",
            self.micro_correction_probability,
        )
    }
}

/// Typing cadence profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingProfile {
    /// Slowest typing speed in words per minute
    pub wpm_min: u32,
    /// Fastest typing speed in words per minute
    pub wpm_max: u32,
    /// Probability of a typo before each character after the first
    pub typo_probability: f64,
    /// Probability of a hesitation before each character
    pub pause_probability: f64,
}

impl Default for TypingProfile {
    fn default() -> Self {
        Self {
            wpm_min: 40,
            wpm_max: 70,
            typo_probability: 0.03,
            pause_probability: 0.05,
        }
    }
}

impl TypingProfile {
    /// Check probabilities and the WPM range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wpm_min == 0 {
            return Err(ConfigError::OutOfRange {
                field: "typing.wpm_min",
                reason: "must be greater than 0".to_string(),
            });
        }
        check_range("typing.wpm", self.wpm_min, self.wpm_max)?;
        check_probability("typing.typo_probability", self.typo_probability)?;
        check_probability("typing.pause_probability", self.pause_probability)
    }
}

/// Scrolling profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollProfile {
    /// Shortest delay after a scroll chunk (ms)
    #[serde(alias = "speed_min")]
    pub speed_min_ms: u32,
    /// Longest delay after a scroll chunk (ms)
    #[serde(alias = "speed_max")]
    pub speed_max_ms: u32,
    /// Probability of a corrective back-scroll after a downward chunk
    pub scroll_back_probability: f64,
    /// Probability of a reading pause after a chunk
    pub pause_probability: f64,
}

impl Default for ScrollProfile {
    fn default() -> Self {
        Self {
            speed_min_ms: 50,
            speed_max_ms: 150,
            scroll_back_probability: 0.1,
            pause_probability: 0.15,
        }
    }
}

impl ScrollProfile {
    /// Check probabilities and the scroll speed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("scrolling.speed", self.speed_min_ms, self.speed_max_ms)?;
        check_probability(
            "scrolling.scroll_back_probability",
            self.scroll_back_probability,
        )?;
        check_probability("scrolling.pause_probability", self.pause_probability)
    }
}

/// Think-time and reading-speed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingProfile {
    /// Shortest delay between actions (seconds)
    #[serde(alias = "action_delay_min")]
    pub action_delay_min_secs: u32,
    /// Longest delay between actions (seconds)
    #[serde(alias = "action_delay_max")]
    pub action_delay_max_secs: u32,
    /// Shortest think time before an action (seconds)
    #[serde(alias = "think_time_min")]
    pub think_time_min_secs: u32,
    /// Longest think time before an action (seconds)
    #[serde(alias = "think_time_max")]
    pub think_time_max_secs: u32,
    /// Reading speed used to estimate reading time
    pub reading_speed_wpm: u32,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self {
            action_delay_min_secs: 2,
            action_delay_max_secs: 5,
            think_time_min_secs: 1,
            think_time_max_secs: 3,
            reading_speed_wpm: 230,
        }
    }
}

impl TimingProfile {
    /// Check the timing ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "timing.action_delay",
            self.action_delay_min_secs,
            self.action_delay_max_secs,
        )?;
        check_range(
            "timing.think_time",
            self.think_time_min_secs,
            self.think_time_max_secs,
        )?;
        if self.reading_speed_wpm == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timing.reading_speed_wpm",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Activity window and break policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// First active hour of the day (0-23)
    pub business_hours_start: u32,
    /// First inactive hour of the day (1-23), exclusive bound
    pub business_hours_end: u32,
    /// IANA timezone identifier, e.g. "America/New_York"
    pub timezone: String,
    /// Whether Saturday and Sunday are permitted days
    pub weekend_activity: bool,
    /// Shortest break (minutes)
    #[serde(alias = "break_duration_min")]
    pub break_duration_min_mins: u32,
    /// Longest break (minutes)
    #[serde(alias = "break_duration_max")]
    pub break_duration_max_mins: u32,
    /// Probability of taking a break when asked
    pub break_probability: f64,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self {
            business_hours_start: 9,
            business_hours_end: 18,
            timezone: "America/New_York".to_string(),
            weekend_activity: false,
            break_duration_min_mins: 5,
            break_duration_max_mins: 15,
            break_probability: 0.1,
        }
    }
}

impl ScheduleWindow {
    /// Check the business hours and break settings, then resolve the timezone
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, hour) in [
            ("scheduling.business_hours_start", self.business_hours_start),
            ("scheduling.business_hours_end", self.business_hours_end),
        ] {
            if hour >= 24 {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: format!("hour must be within [0, 24), got {hour}"),
                });
            }
        }
        if self.business_hours_start >= self.business_hours_end {
            return Err(ConfigError::OutOfRange {
                field: "scheduling.business_hours",
                reason: format!(
                    "start {} must be before end {}",
                    self.business_hours_start, self.business_hours_end
                ),
            });
        }
        check_range(
            "scheduling.break_duration",
            self.break_duration_min_mins,
            self.break_duration_max_mins,
        )?;
        check_probability("scheduling.break_probability", self.break_probability)?;
        self.resolve_timezone().map(|_| ())
    }

    /// Resolve the configured timezone identifier
    pub fn resolve_timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }
}
