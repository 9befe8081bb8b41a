//! UI rendering modules.
//!
//! - `controls`: credential form and Start/Stop toggle
//! - `log_view`: scrolling status/message log
//! - `theme`: dark palette and global styling

pub mod controls;
pub mod log_view;
pub mod theme;

pub use controls::{render_controls, ControlAction};
pub use log_view::render_log;
