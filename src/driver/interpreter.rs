//! Execution interpreter
//!
//! Replays a plan against a [`PageDriver`]: one remote action per step, then
//! the step's wait, strictly in order. The first failing action aborts the
//! plan; steps already issued are not undone. Dropping the future between
//! steps cancels the remainder of the plan.

use std::time::Duration;

use crate::stealth::{KeystrokeEvent, KeystrokeKind, MotionStep, Point, ScrollStep};

use super::page::{Key, MouseButton, PageDriver};
use super::DriverError;

/// Drives plans on a page and tracks where the pointer was left
pub struct Interpreter<D> {
    driver: D,
    pointer: Point,
}

impl<D: PageDriver> Interpreter<D> {
    /// Create an interpreter; the pointer is assumed to start at the origin
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            pointer: Point::default(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Last pointer position issued to the page
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Move the pointer along a motion plan
    pub async fn execute_motion(&mut self, plan: &[MotionStep]) -> Result<(), DriverError> {
        for (i, step) in plan.iter().enumerate() {
            self.driver
                .move_pointer(step.point)
                .await
                .map_err(|e| aborted("motion", i, e))?;
            self.pointer = step.point;
            self.wait(step.delay).await;
        }

        Ok(())
    }

    /// Type out a keystroke plan
    pub async fn execute_typing(&mut self, plan: &[KeystrokeEvent]) -> Result<(), DriverError> {
        for (i, event) in plan.iter().enumerate() {
            let key = match event.kind {
                KeystrokeKind::Backspace => Key::Backspace,
                KeystrokeKind::Typo | KeystrokeKind::Char => Key::Char(event.key),
            };

            self.wait(event.pause_before).await;
            self.tap_key(key)
                .await
                .map_err(|e| aborted("typing", i, e))?;
            self.wait(event.delay).await;
            self.wait(event.pause_after).await;
        }

        Ok(())
    }

    /// Scroll through a scroll plan
    pub async fn execute_scroll(&mut self, plan: &[ScrollStep]) -> Result<(), DriverError> {
        for (i, step) in plan.iter().enumerate() {
            self.driver
                .scroll_by(step.delta)
                .await
                .map_err(|e| aborted("scroll", i, e))?;
            self.wait(step.delay).await;

            if let Some(pause) = step.pause {
                self.wait(pause).await;
            }

            if let Some(back) = step.back_scroll {
                self.driver
                    .scroll_by(back.delta)
                    .await
                    .map_err(|e| aborted("scroll", i, e))?;
                self.wait(back.settle).await;
            }
        }

        Ok(())
    }

    /// Press and release a mouse button at the current position
    pub async fn click(&mut self, button: MouseButton, hold: Duration) -> Result<(), DriverError> {
        self.driver.mouse_down(button).await?;
        self.wait(hold).await;
        self.driver.mouse_up(button).await
    }

    /// Press `key` while holding `modifier`, e.g. Ctrl+A
    pub async fn press_chord(
        &mut self,
        modifier: Key,
        key: Key,
        hold: Duration,
    ) -> Result<(), DriverError> {
        self.driver.key_down(modifier).await?;
        self.driver.key_down(key).await?;
        self.wait(hold).await;
        self.driver.key_up(key).await?;
        self.driver.key_up(modifier).await
    }

    /// Press and release a single key
    pub async fn tap_key(&mut self, key: Key) -> Result<(), DriverError> {
        self.driver.key_down(key).await?;
        self.driver.key_up(key).await
    }

    /// Sleep through the driver; zero waits are skipped
    pub async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            self.driver.sleep(duration).await;
        }
    }
}

fn aborted(plan: &str, step: usize, error: DriverError) -> DriverError {
    log::warn!("Aborting {plan} plan at step {step}: {error}");
    error
}
