//! Application module structure for BotApp
//!
//! - `core`: BotApp struct and initialization
//! - `update`: per-frame update loop and close handling

pub mod core;
pub mod update;

pub use core::BotApp;
