//! Activity scheduling
//!
//! Gates automated activity to a business-hours window in a configured
//! timezone and decides when to take extended breaks. Everything here
//! computes durations; waiting is left to the caller.

use std::time::Duration;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use rand::Rng;

use crate::config::{ConfigError, ScheduleWindow};

use super::chance;

/// Business-hours window resolved against a timezone
#[derive(Debug, Clone)]
pub struct ActivityWindow {
    start_hour: u32,
    end_hour: u32,
    timezone: Tz,
    weekend_activity: bool,
}

impl ActivityWindow {
    /// Validate the settings and resolve the timezone
    pub fn from_settings(settings: &ScheduleWindow) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Self {
            start_hour: settings.business_hours_start,
            end_hour: settings.business_hours_end,
            timezone: settings.resolve_timezone()?,
            weekend_activity: settings.weekend_activity,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Whether activity is allowed at all on this day of the week
    pub fn is_permitted_day(&self, weekday: Weekday) -> bool {
        self.weekend_activity || !matches!(weekday, Weekday::Sat | Weekday::Sun)
    }

    /// Whether `at` falls inside the window, in local time
    pub fn is_in_window<Z: TimeZone>(&self, at: &DateTime<Z>) -> bool {
        let local = at.with_timezone(&self.timezone);
        let hour = local.hour();

        self.is_permitted_day(local.weekday()) && hour >= self.start_hour && hour < self.end_hour
    }

    /// Next window start strictly after `now`
    ///
    /// Before the start hour on a permitted day this is the same day;
    /// otherwise the next permitted day. With weekends disabled a Saturday,
    /// Sunday or late Friday always resolves to Monday.
    pub fn next_window_start<Z: TimeZone>(&self, now: &DateTime<Z>) -> DateTime<Tz> {
        let local = now.with_timezone(&self.timezone);
        let mut date = local.date_naive();

        if !(self.is_permitted_day(date.weekday()) && local.hour() < self.start_hour) {
            date = self.next_permitted_day(date);
        }

        self.local_at(date, self.start_hour, 0)
    }

    /// How long to wait before activity is allowed; zero inside the window
    pub fn wait_for_window<Z: TimeZone>(&self, now: &DateTime<Z>) -> Duration {
        if self.is_in_window(now) {
            return Duration::ZERO;
        }

        let next = self.next_window_start(now);
        log::info!("Outside activity window, next start at {next}");
        wait_until(now, &next)
    }

    /// A random time inside today's window, or the next permitted day's
    /// if that time has already passed
    pub fn random_start_time<Z: TimeZone, R: Rng>(
        &self,
        now: &DateTime<Z>,
        rng: &mut R,
    ) -> DateTime<Tz> {
        let local = now.with_timezone(&self.timezone);
        let hour = rng.gen_range(self.start_hour..self.end_hour);
        let minute = rng.gen_range(0..60);

        let today = local.date_naive();
        if self.is_permitted_day(today.weekday()) {
            let start = self.local_at(today, hour, minute);
            if start >= local {
                return start;
            }
        }

        self.local_at(self.next_permitted_day(today), hour, minute)
    }

    /// First permitted day strictly after `date`
    fn next_permitted_day(&self, date: NaiveDate) -> NaiveDate {
        let mut next = date + Days::new(1);
        while !self.is_permitted_day(next.weekday()) {
            next = next + Days::new(1);
        }
        next
    }

    /// Local wall-clock time on `date`, shifted past a DST gap if needed
    fn local_at(&self, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Tz> {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::default()));

        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                    .earliest()
            })
            .unwrap_or_else(|| self.timezone.from_utc_datetime(&naive))
    }
}

/// Extended break policy
#[derive(Debug, Clone)]
pub struct BreakPolicy {
    min_minutes: u32,
    max_minutes: u32,
    probability: f64,
}

impl BreakPolicy {
    /// Validate the settings and take the break bounds
    pub fn from_settings(settings: &ScheduleWindow) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Self {
            min_minutes: settings.break_duration_min_mins,
            max_minutes: settings.break_duration_max_mins,
            probability: settings.break_probability,
        })
    }

    /// Single Bernoulli draw against the break probability
    pub fn should_take_break<R: Rng>(&self, rng: &mut R) -> bool {
        chance(rng, self.probability)
    }

    /// Uniform break length within the configured minutes
    pub fn break_duration<R: Rng>(&self, rng: &mut R) -> Duration {
        let min = u64::from(self.min_minutes) * 60;
        let max = u64::from(self.max_minutes.max(self.min_minutes)) * 60;
        Duration::from_secs(rng.gen_range(min..=max))
    }

    /// Decide on a break and, if taken, how long it lasts
    pub fn plan_break<R: Rng>(&self, rng: &mut R) -> Option<Duration> {
        if !self.should_take_break(rng) {
            return None;
        }

        let duration = self.break_duration(rng);
        log::info!("Taking a break for {}s", duration.as_secs());
        Some(duration)
    }
}

/// Time from `now` until `target`; zero when `target` is not in the future
pub fn wait_until<Z1: TimeZone, Z2: TimeZone>(
    now: &DateTime<Z1>,
    target: &DateTime<Z2>,
) -> Duration {
    (target.with_timezone(&Utc) - now.with_timezone(&Utc))
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn window(weekend_activity: bool) -> ActivityWindow {
        ActivityWindow::from_settings(&ScheduleWindow {
            business_hours_start: 9,
            business_hours_end: 17,
            timezone: "America/New_York".to_string(),
            weekend_activity,
            ..Default::default()
        })
        .unwrap()
    }

    fn ny(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_window_boundaries_on_weekday() {
        let w = window(false);
        // 2024-01-15 is a Monday
        assert!(w.is_in_window(&ny(2024, 1, 15, 9, 0)));
        assert!(w.is_in_window(&ny(2024, 1, 15, 16, 59)));
        assert!(!w.is_in_window(&ny(2024, 1, 15, 17, 0)));
        assert!(!w.is_in_window(&ny(2024, 1, 15, 8, 59)));
    }

    #[test]
    fn test_window_uses_configured_timezone() {
        let w = window(false);
        // 14:00 UTC is 09:00 EST
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        assert!(w.is_in_window(&at));
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 13, 59, 0).unwrap();
        assert!(!w.is_in_window(&at));
    }

    #[test]
    fn test_weekend_gating() {
        let saturday = ny(2024, 1, 20, 10, 0);
        assert!(!window(false).is_in_window(&saturday));
        assert!(window(true).is_in_window(&saturday));
    }

    #[test]
    fn test_saturday_rolls_to_monday() {
        let next = window(false).next_window_start(&ny(2024, 1, 20, 10, 0));
        assert_eq!(next, ny(2024, 1, 22, 9, 0));
        assert_eq!(next.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_sunday_and_late_friday_roll_to_monday() {
        let w = window(false);
        assert_eq!(w.next_window_start(&ny(2024, 1, 21, 7, 0)), ny(2024, 1, 22, 9, 0));
        assert_eq!(w.next_window_start(&ny(2024, 1, 19, 18, 30)), ny(2024, 1, 22, 9, 0));
    }

    #[test]
    fn test_early_weekday_starts_same_day() {
        let w = window(false);
        assert_eq!(w.next_window_start(&ny(2024, 1, 16, 6, 15)), ny(2024, 1, 16, 9, 0));
    }

    #[test]
    fn test_next_start_with_weekends_enabled() {
        let w = window(true);
        assert_eq!(w.next_window_start(&ny(2024, 1, 20, 20, 0)), ny(2024, 1, 21, 9, 0));
    }

    #[test]
    fn test_next_start_is_strictly_after_now() {
        let w = window(false);
        let now = ny(2024, 1, 17, 9, 0);
        assert!(w.next_window_start(&now) > now);
    }

    #[test]
    fn test_wait_for_window() {
        let w = window(false);
        assert_eq!(w.wait_for_window(&ny(2024, 1, 15, 11, 0)), Duration::ZERO);
        assert_eq!(
            w.wait_for_window(&ny(2024, 1, 15, 7, 30)),
            Duration::from_secs(90 * 60)
        );
    }

    #[test]
    fn test_window_start_inside_dst_gap() {
        let w = ActivityWindow::from_settings(&ScheduleWindow {
            business_hours_start: 2,
            business_hours_end: 10,
            timezone: "America/New_York".to_string(),
            weekend_activity: true,
            ..Default::default()
        })
        .unwrap();

        // 02:00 does not exist on 2024-03-10 in New York
        let next = w.next_window_start(&ny(2024, 3, 9, 12, 0));
        assert_eq!(next, ny(2024, 3, 10, 3, 0));
    }

    #[test]
    fn test_wait_until_never_negative() {
        let now = ny(2024, 1, 15, 12, 0);
        assert_eq!(wait_until(&now, &ny(2024, 1, 15, 11, 0)), Duration::ZERO);
        assert_eq!(wait_until(&now, &now), Duration::ZERO);
        assert_eq!(
            wait_until(&now, &ny(2024, 1, 15, 12, 5)),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_random_start_time_inside_window() {
        let w = window(true);
        let mut rng = StdRng::seed_from_u64(42);
        let now = ny(2024, 1, 15, 12, 30);

        for _ in 0..100 {
            let start = w.random_start_time(&now, &mut rng);
            assert!(start >= now);
            assert!(start.hour() >= 9 && start.hour() < 17);
            assert!(start.date_naive() <= now.date_naive() + Days::new(1));
        }
    }

    #[test]
    fn test_random_start_time_across_dst_change() {
        let w = window(true);
        let mut rng = StdRng::seed_from_u64(7);
        // Clocks spring forward overnight into 2024-03-10
        let now = ny(2024, 3, 9, 16, 50);

        for _ in 0..2000 {
            let start = w.random_start_time(&now, &mut rng);
            assert!(start >= now);
            assert!(w.is_in_window(&start), "{start} is outside the window");
        }
    }

    #[test]
    fn test_random_start_time_skips_weekend() {
        let w = window(false);
        let mut rng = StdRng::seed_from_u64(11);
        // Friday after the window closed
        let now = ny(2024, 1, 19, 17, 30);

        for _ in 0..500 {
            let start = w.random_start_time(&now, &mut rng);
            assert_eq!(start.date_naive(), ny(2024, 1, 22, 0, 0).date_naive());
            assert!(w.is_in_window(&start));
        }
    }

    #[test]
    fn test_break_policy() {
        let settings = ScheduleWindow {
            break_duration_min_mins: 5,
            break_duration_max_mins: 15,
            break_probability: 1.0,
            ..Default::default()
        };
        let policy = BreakPolicy::from_settings(&settings).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            let duration = policy.plan_break(&mut rng).unwrap();
            assert!(duration >= Duration::from_secs(5 * 60));
            assert!(duration <= Duration::from_secs(15 * 60));
        }

        let never = BreakPolicy::from_settings(&ScheduleWindow {
            break_probability: 0.0,
            ..Default::default()
        })
        .unwrap();
        assert!((0..100).all(|_| never.plan_break(&mut rng).is_none()));
    }
}
