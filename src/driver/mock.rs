//! Recording page used by the driver tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::stealth::mouse::BoundingBox;
use crate::stealth::Point;

use super::page::{Key, MouseButton, PageDriver, PageGeometry, Viewport};
use super::DriverError;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Move(Point),
    Down(MouseButton),
    Up(MouseButton),
    KeyDown(Key),
    KeyUp(Key),
    Scroll(f64),
    Sleep(Duration),
}

/// Records every action; sleeping only records the duration
pub struct MockPage {
    pub actions: Mutex<Vec<Action>>,
    /// Remote actions (not sleeps) allowed before every call fails
    pub fail_after: Option<usize>,
    pub elements: HashMap<String, BoundingBox>,
    pub viewport: Viewport,
    pub scroll_offset: f64,
    pub document_height: f64,
}

impl Default for MockPage {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            fail_after: None,
            elements: HashMap::new(),
            viewport: Viewport::new(1280.0, 800.0),
            scroll_offset: 0.0,
            document_height: 4000.0,
        }
    }
}

impl MockPage {
    pub fn failing_after(actions: usize) -> Self {
        Self {
            fail_after: Some(actions),
            ..Default::default()
        }
    }

    pub fn with_element(mut self, selector: &str, bounds: BoundingBox) -> Self {
        self.elements.insert(selector.to_string(), bounds);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn scrolled(&self) -> f64 {
        self.actions()
            .iter()
            .filter_map(|a| match a {
                Action::Scroll(d) => Some(*d),
                _ => None,
            })
            .sum()
    }

    pub fn total_sleep(&self) -> Duration {
        self.actions()
            .iter()
            .filter_map(|a| match a {
                Action::Sleep(d) => Some(*d),
                _ => None,
            })
            .sum()
    }

    fn record(&self, action: Action) -> Result<(), DriverError> {
        let mut actions = self.actions.lock().unwrap();
        let issued = actions
            .iter()
            .filter(|a| !matches!(a, Action::Sleep(_)))
            .count();

        if self.fail_after.is_some_and(|limit| issued >= limit) {
            return Err(DriverError::Execution("connection closed".to_string()));
        }

        actions.push(action);
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn move_pointer(&self, to: Point) -> Result<(), DriverError> {
        self.record(Action::Move(to))
    }

    async fn mouse_down(&self, button: MouseButton) -> Result<(), DriverError> {
        self.record(Action::Down(button))
    }

    async fn mouse_up(&self, button: MouseButton) -> Result<(), DriverError> {
        self.record(Action::Up(button))
    }

    async fn key_down(&self, key: Key) -> Result<(), DriverError> {
        self.record(Action::KeyDown(key))
    }

    async fn key_up(&self, key: Key) -> Result<(), DriverError> {
        self.record(Action::KeyUp(key))
    }

    async fn scroll_by(&self, delta: f64) -> Result<(), DriverError> {
        self.record(Action::Scroll(delta))
    }

    async fn sleep(&self, duration: Duration) {
        self.actions.lock().unwrap().push(Action::Sleep(duration));
    }
}

#[async_trait]
impl PageGeometry for MockPage {
    async fn element_box(&self, selector: &str) -> Result<BoundingBox, DriverError> {
        self.elements
            .get(selector)
            .copied()
            .ok_or_else(|| DriverError::GeometryUnavailable(format!("no element for {selector}")))
    }

    async fn viewport(&self) -> Result<Viewport, DriverError> {
        Ok(self.viewport)
    }

    async fn scroll_offset(&self) -> Result<f64, DriverError> {
        Ok(self.scroll_offset)
    }

    async fn document_height(&self) -> Result<f64, DriverError> {
        Ok(self.document_height)
    }
}
