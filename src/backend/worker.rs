//! Worker thread spawning and the UI-side handle that owns it.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::io;
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

use super::runner::ClientRunner;
use crate::client::NetworkClient;
use crate::config::BotConfig;
use crate::protocol::WorkerEvent;
use crate::signal::{ReadySignal, ReadyState};

/// Sends `Exited` when the worker thread's body ends, including by panic.
struct ExitNotice(Sender<WorkerEvent>);

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.0.send(WorkerEvent::Exited);
    }
}

/// Everything the UI thread holds for one live worker.
pub struct WorkerHandle {
    thread: JoinHandle<()>,
    stop: CancellationToken,
    ready: ReadySignal,
    events: Receiver<WorkerEvent>,
    exited: bool,
}

/// Spawn a worker thread running one [`ClientRunner`] session for `config`.
pub fn spawn_worker(config: BotConfig, client: Box<dyn NetworkClient>) -> io::Result<WorkerHandle> {
    let (event_tx, events) = unbounded::<WorkerEvent>();
    let ready = ReadySignal::new();
    let stop = CancellationToken::new();

    let runner = ClientRunner::new(config, client, ready.clone(), stop.clone(), event_tx.clone());
    let thread = thread::Builder::new()
        .name("bot-worker".into())
        .spawn(move || {
            let _exit = ExitNotice(event_tx);
            let outcome = runner.run();
            tracing::debug!(?outcome, "worker thread finished");
        })?;

    Ok(WorkerHandle {
        thread,
        stop,
        ready,
        events,
        exited: false,
    })
}

impl WorkerHandle {
    pub fn ready_state(&self) -> ReadyState {
        self.ready.state()
    }

    /// Ask the worker to shut down. Never blocks.
    pub fn request_stop(&self) {
        self.ready.cancel();
        self.stop.cancel();
    }

    /// Next pending event, without blocking.
    pub fn try_recv(&mut self) -> Option<WorkerEvent> {
        match self.events.try_recv() {
            Ok(event) => {
                if event == WorkerEvent::Exited {
                    self.exited = true;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.exited = true;
                None
            }
        }
    }

    /// True once the worker reported its exit or its thread is no longer running.
    pub fn has_exited(&self) -> bool {
        self.exited || self.thread.is_finished()
    }

    /// Wait for the worker thread to end and return the events it left behind,
    /// in order. Blocks for as long as the worker's own teardown takes.
    pub fn join(self) -> Vec<WorkerEvent> {
        let name = self.thread.thread().name().unwrap_or("worker").to_string();
        if self.thread.join().is_err() {
            tracing::error!(thread = %name, "bot worker panicked");
        }
        self.events.try_iter().collect()
    }
}
