/// Worker-thread side of the bot lifecycle
///
/// - `runner`: the session driver that runs on the worker's own event loop
/// - `worker`: thread spawning and the handle the UI thread keeps
mod runner;
mod worker;

pub use runner::{filter_message, ClientRunner, RunOutcome};
pub use worker::{spawn_worker, WorkerHandle};
