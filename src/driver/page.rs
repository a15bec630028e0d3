//! Remote page capabilities
//!
//! Implemented by the surrounding system on top of its browser transport.

use std::time::Duration;

use async_trait::async_trait;

use crate::stealth::mouse::BoundingBox;
use crate::stealth::Point;

use super::DriverError;

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the interpreter sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Control,
}

/// Visible area of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The viewport as a box anchored at the origin
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// Action execution on the remote page
///
/// Every call is one fire-and-forget remote action; failures are reported
/// as [`DriverError::Execution`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Move the pointer to an absolute viewport coordinate
    async fn move_pointer(&self, to: Point) -> Result<(), DriverError>;

    async fn mouse_down(&self, button: MouseButton) -> Result<(), DriverError>;

    async fn mouse_up(&self, button: MouseButton) -> Result<(), DriverError>;

    async fn key_down(&self, key: Key) -> Result<(), DriverError>;

    async fn key_up(&self, key: Key) -> Result<(), DriverError>;

    /// Scroll vertically by a relative delta; positive scrolls down
    async fn scroll_by(&self, delta: f64) -> Result<(), DriverError>;

    /// Wait between steps
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Layout queries on the remote page
///
/// Failures are reported as [`DriverError::GeometryUnavailable`].
#[async_trait]
pub trait PageGeometry: Send + Sync {
    /// Bounding box of the element matching `selector`, in viewport coordinates
    async fn element_box(&self, selector: &str) -> Result<BoundingBox, DriverError>;

    async fn viewport(&self) -> Result<Viewport, DriverError>;

    /// Current vertical scroll offset
    async fn scroll_offset(&self) -> Result<f64, DriverError>;

    /// Full scrollable height of the document
    async fn document_height(&self) -> Result<f64, DriverError>;
}
