//! Plan-then-run session helpers
//!
//! A session owns one engine and one interpreter for a single page. Each
//! helper plans with the engine and immediately executes the plan; nothing
//! here runs concurrently against the page.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::Rng;

use crate::stealth::scroll::{distance_to_bottom, distance_to_element, distance_to_top};
use crate::stealth::Point;
use crate::StealthEngine;

use super::interpreter::Interpreter;
use super::page::{Key, MouseButton, PageDriver, PageGeometry};
use super::DriverError;

/// An engine bound to the page it drives
pub struct StealthSession<D, R = StdRng> {
    engine: StealthEngine<R>,
    interpreter: Interpreter<D>,
}

impl<D, R> StealthSession<D, R>
where
    D: PageDriver + PageGeometry,
    R: Rng,
{
    pub fn new(engine: StealthEngine<R>, driver: D) -> Self {
        Self {
            engine,
            interpreter: Interpreter::new(driver),
        }
    }

    pub fn engine(&self) -> &StealthEngine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StealthEngine<R> {
        &mut self.engine
    }

    pub fn interpreter(&self) -> &Interpreter<D> {
        &self.interpreter
    }

    pub fn driver(&self) -> &D {
        self.interpreter.driver()
    }

    /// Move the pointer from its last position to `target`
    pub async fn run_motion(&mut self, target: Point) -> Result<(), DriverError> {
        let plan = self.engine.generate_path(self.interpreter.pointer(), target);
        self.interpreter.execute_motion(&plan).await
    }

    /// Type `text` into whatever currently has focus
    pub async fn run_typing(&mut self, text: &str) -> Result<(), DriverError> {
        let plan = self.engine.generate_keystrokes(text);
        self.interpreter.execute_typing(&plan).await
    }

    /// Scroll by `distance`; positive scrolls down
    pub async fn run_scroll(&mut self, distance: f64) -> Result<(), DriverError> {
        let plan = self.engine.generate_scroll_plan(distance);
        self.interpreter.execute_scroll(&plan).await
    }

    /// Move to a random point inside the element and return it
    pub async fn move_to_element(&mut self, selector: &str) -> Result<Point, DriverError> {
        let bounds = self.driver().element_box(selector).await?;
        let target = self.engine.random_point_in(&bounds);

        self.run_motion(target).await?;
        Ok(target)
    }

    /// Move onto the element and linger there
    pub async fn hover_element(&mut self, selector: &str) -> Result<(), DriverError> {
        self.move_to_element(selector).await?;
        let dwell = self.engine.hover_dwell();
        self.interpreter.wait(dwell).await;
        Ok(())
    }

    /// Move onto the element, settle, click, settle
    pub async fn click_element(&mut self, selector: &str) -> Result<(), DriverError> {
        self.move_to_element(selector).await?;

        let before = self.engine.pre_click_pause();
        self.interpreter.wait(before).await;

        let hold = self.engine.press_duration();
        self.interpreter.click(MouseButton::Left, hold).await?;

        let after = self.engine.post_click_pause();
        self.interpreter.wait(after).await;
        Ok(())
    }

    /// Focus a field, clear it with select-all and backspace, then type
    pub async fn clear_and_type(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        self.click_element(selector).await?;

        let hold = self.engine.press_duration();
        self.interpreter
            .press_chord(Key::Control, Key::Char('a'), hold)
            .await?;
        let pause = self.engine.press_duration();
        self.interpreter.wait(pause).await;

        self.interpreter.tap_key(Key::Backspace).await?;
        let pause = self.engine.post_click_pause();
        self.interpreter.wait(pause).await;

        self.run_typing(text).await
    }

    /// Wander between two random points inside the viewport
    pub async fn random_idle_movement(&mut self) -> Result<(), DriverError> {
        let bounds = self.driver().viewport().await?.bounds();
        let from = self.engine.random_point_in(&bounds);
        let to = self.engine.random_point_in(&bounds);

        let plan = self.engine.generate_path(from, to);
        self.interpreter.execute_motion(&plan).await
    }

    /// Scroll so the element sits in the middle of the viewport
    pub async fn scroll_to_element(&mut self, selector: &str) -> Result<(), DriverError> {
        let bounds = self.driver().element_box(selector).await?;
        let viewport = self.driver().viewport().await?;
        let offset = self.driver().scroll_offset().await?;

        let distance = distance_to_element(bounds.y + offset, viewport.height, offset);
        self.run_scroll(distance).await
    }

    /// Scroll back to the top of the document
    pub async fn scroll_to_top(&mut self) -> Result<(), DriverError> {
        let offset = self.driver().scroll_offset().await?;
        self.run_scroll(distance_to_top(offset)).await
    }

    /// Scroll down to the end of the document
    pub async fn scroll_to_bottom(&mut self) -> Result<(), DriverError> {
        let height = self.driver().document_height().await?;
        let offset = self.driver().scroll_offset().await?;
        self.run_scroll(distance_to_bottom(height, offset)).await
    }

    /// Browse-style scroll in a random direction
    pub async fn random_scroll(&mut self) -> Result<(), DriverError> {
        let distance = self.engine.random_scroll_distance();
        self.run_scroll(distance).await
    }

    /// Pause for a think-time before the next action
    pub async fn think(&mut self) -> Duration {
        let duration = self.engine.think_time();
        self.interpreter.wait(duration).await;
        duration
    }

    /// Block until the activity window opens; returns the time waited
    pub async fn wait_for_window(&mut self) -> Duration {
        self.wait_for_window_at(&Utc::now()).await
    }

    /// Like [`Self::wait_for_window`] with the current time supplied
    pub async fn wait_for_window_at<Z: TimeZone>(&mut self, now: &DateTime<Z>) -> Duration {
        let wait = self.engine.wait_for_window(now);
        self.interpreter.wait(wait).await;
        wait
    }

    /// Take an extended break if the break policy says so
    pub async fn take_break(&mut self) -> Option<Duration> {
        let duration = self.engine.plan_break()?;
        self.interpreter.wait(duration).await;
        Some(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StealthSettings;
    use crate::driver::mock::{Action, MockPage};
    use crate::stealth::mouse::BoundingBox;

    fn session(page: MockPage) -> StealthSession<MockPage> {
        let engine = StealthEngine::seeded(StealthSettings::default(), 2024).unwrap();
        StealthSession::new(engine, page)
    }

    #[tokio::test]
    async fn test_run_motion_ends_at_target() {
        let mut session = session(MockPage::default());
        let target = Point::new(640.0, 360.0);

        session.run_motion(target).await.unwrap();

        assert_eq!(session.interpreter().pointer(), target);
        let first = session.driver().actions().into_iter().next();
        assert_eq!(first, Some(Action::Move(Point::default())));
    }

    #[tokio::test]
    async fn test_click_element_lands_inside_box() {
        let bounds = BoundingBox::new(300.0, 200.0, 120.0, 40.0);
        let mut session = session(MockPage::default().with_element("#connect", bounds));

        session.click_element("#connect").await.unwrap();

        let actions = session.driver().actions();
        let down = actions
            .iter()
            .position(|a| *a == Action::Down(MouseButton::Left))
            .unwrap();
        let up = actions
            .iter()
            .position(|a| *a == Action::Up(MouseButton::Left))
            .unwrap();
        assert!(down < up);

        // The click happens where the path finished
        let last_move = actions[..down]
            .iter()
            .rev()
            .find_map(|a| match a {
                Action::Move(p) => Some(*p),
                _ => None,
            })
            .unwrap();
        assert!(bounds.contains(last_move));
        assert_eq!(session.interpreter().pointer(), last_move);
    }

    #[tokio::test]
    async fn test_missing_element_is_geometry_error() {
        let mut session = session(MockPage::default());

        let result = session.click_element("#missing").await;
        assert!(matches!(result, Err(DriverError::GeometryUnavailable(_))));
        assert!(session.driver().actions().is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_type() {
        let bounds = BoundingBox::new(10.0, 10.0, 200.0, 30.0);
        let mut session = session(MockPage::default().with_element("input", bounds));

        session.clear_and_type("input", "hello").await.unwrap();

        let keys: Vec<Key> = session
            .driver()
            .actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::KeyDown(k) => Some(k),
                _ => None,
            })
            .collect();

        assert_eq!(&keys[..3], &[Key::Control, Key::Char('a'), Key::Backspace]);
        // Replaying typos and their backspaces leaves exactly the text
        let mut field = String::new();
        for key in &keys[3..] {
            match key {
                Key::Char(c) => field.push(*c),
                Key::Backspace => {
                    field.pop();
                }
                Key::Control => panic!("unexpected modifier while typing"),
            }
        }
        assert_eq!(field, "hello");
    }

    #[tokio::test]
    async fn test_scroll_to_element_centres_it() {
        let page = MockPage {
            scroll_offset: 500.0,
            ..Default::default()
        }
        .with_element("#profile", BoundingBox::new(0.0, 1500.0, 300.0, 100.0));
        let mut session = session(page);

        session.scroll_to_element("#profile").await.unwrap();

        // Document top 2000, half of an 800px viewport, minus the offset
        let expected = 2000.0 - 400.0 - 500.0;
        let forward: f64 = session.driver().scrolled();
        let tolerance = 14.0 + back_scrolled(session.driver());
        assert!((forward - expected).abs() <= tolerance);
    }

    #[tokio::test]
    async fn test_scroll_to_top_and_bottom() {
        let page = MockPage {
            scroll_offset: 1200.0,
            document_height: 3000.0,
            ..Default::default()
        };
        let mut session = session(page);

        session.scroll_to_top().await.unwrap();
        let up = session.driver().scrolled();
        assert!((up + 1200.0).abs() <= 14.0);

        let mut session = session_with_offset(0.0, 3000.0);
        session.scroll_to_bottom().await.unwrap();
        let down = session.driver().scrolled();
        assert!((down - 3000.0).abs() <= 14.0 + back_scrolled(session.driver()));
    }

    fn weekday_session() -> StealthSession<MockPage> {
        let mut settings = StealthSettings::default();
        settings.scheduling.business_hours_start = 9;
        settings.scheduling.business_hours_end = 17;
        settings.scheduling.weekend_activity = false;
        settings.scheduling.timezone = "America/New_York".to_string();
        let engine = StealthEngine::seeded(settings, 1).unwrap();
        StealthSession::new(engine, MockPage::default())
    }

    #[tokio::test]
    async fn test_wait_for_window_inside_window_is_free() {
        let mut session = weekday_session();
        // Monday 12:00 in New York
        let now = chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .unwrap();

        let waited = session.wait_for_window_at(&now).await;
        assert_eq!(waited, Duration::ZERO);
        assert!(session.driver().actions().is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_window_sleeps_until_opening() {
        let mut session = weekday_session();
        // Monday 07:30 in New York, expressed in UTC
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap();

        let waited = session.wait_for_window_at(&now).await;
        assert_eq!(waited, Duration::from_secs(90 * 60));
        assert_eq!(session.driver().actions(), vec![Action::Sleep(waited)]);
    }

    #[tokio::test]
    async fn test_clear_and_type_settles_after_backspace() {
        let bounds = BoundingBox::new(10.0, 10.0, 200.0, 30.0);

        for seed in 0..20 {
            let engine = StealthEngine::seeded(StealthSettings::default(), seed).unwrap();
            let page = MockPage::default().with_element("input", bounds);
            let mut session = StealthSession::new(engine, page);

            session.clear_and_type("input", "ok").await.unwrap();

            let actions = session.driver().actions();
            let cleared = actions
                .iter()
                .position(|a| *a == Action::KeyUp(Key::Backspace))
                .unwrap();
            match actions[cleared + 1] {
                Action::Sleep(pause) => {
                    assert!(pause >= Duration::from_millis(100));
                    assert!(pause <= Duration::from_millis(299));
                }
                ref other => panic!("expected a settle pause, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_take_break_sleeps_for_planned_duration() {
        let mut settings = StealthSettings::default();
        settings.scheduling.break_probability = 1.0;
        let engine = StealthEngine::seeded(settings, 3).unwrap();
        let mut session = StealthSession::new(engine, MockPage::default());

        let duration = session.take_break().await.unwrap();
        assert!(duration >= Duration::from_secs(5 * 60));
        assert_eq!(session.driver().total_sleep(), duration);
    }

    #[tokio::test]
    async fn test_think_and_idle_movement() {
        let mut session = session(MockPage::default());

        let thought = session.think().await;
        assert!(thought >= Duration::from_secs(1));

        session.random_idle_movement().await.unwrap();
        let bounds = BoundingBox::new(0.0, 0.0, 1280.0, 800.0);
        assert!(bounds.contains(session.interpreter().pointer()));
    }

    fn session_with_offset(offset: f64, height: f64) -> StealthSession<MockPage> {
        session(MockPage {
            scroll_offset: offset,
            document_height: height,
            ..Default::default()
        })
    }

    /// Total magnitude of reverse scrolls, which `scrolled` also counts
    fn back_scrolled(page: &MockPage) -> f64 {
        page.actions()
            .iter()
            .filter_map(|a| match a {
                Action::Scroll(d) if *d < 0.0 => Some(d.abs()),
                _ => None,
            })
            .sum()
    }
}
