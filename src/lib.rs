//! DiscordWR library.
//!
//! A desktop front-end that runs one chat bot session on a worker thread and
//! shows messages from a single channel in real time.
//!
//! Architecture:
//! - UI thread: runs the egui app and owns the `BotController`
//! - Worker thread: runs a current-thread Tokio runtime for the network client
//! - Communication via a crossbeam channel (worker -> UI) plus a cancellation
//!   token and readiness signal (UI -> worker)

pub mod app;
pub mod backend;
pub mod buffer;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod signal;
pub mod ui;

#[cfg(test)]
mod lifecycle_tests;
#[cfg(test)]
mod testing;
