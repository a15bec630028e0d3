//! Plan execution against a remote page
//!
//! The page is reached through two capabilities supplied by the caller:
//! [`PageDriver`] performs actions and [`PageGeometry`] answers layout
//! queries. The [`Interpreter`] replays plans step by step and the
//! [`StealthSession`] pairs it with an engine for plan-then-run helpers.

pub mod interpreter;
pub mod page;
pub mod session;

#[cfg(test)]
mod mock;

pub use interpreter::Interpreter;
pub use page::{Key, MouseButton, PageDriver, PageGeometry, Viewport};
pub use session::StealthSession;

/// Errors surfaced while executing plans
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Geometry unavailable: {0}")]
    GeometryUnavailable(String),
    #[error("Action failed: {0}")]
    Execution(String),
}
