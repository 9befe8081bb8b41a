//! Worker-side driver: owns the worker's event loop and the network client.

use crossbeam_channel::Sender;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::NetworkClient;
use crate::config::BotConfig;
use crate::error::ClientError;
use crate::protocol::{InboundEvent, IncomingMessage, WorkerEvent};
use crate::signal::ReadySignal;

/// How a worker run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Stop requested after login
    Stopped,
    /// Stop requested before login completed
    Cancelled,
    /// Login or session failed
    Failed,
    /// The client ended the session on its own
    Ended,
}

pub struct ClientRunner {
    config: BotConfig,
    client: Box<dyn NetworkClient>,
    ready: ReadySignal,
    stop: CancellationToken,
    event_tx: Sender<WorkerEvent>,
}

impl ClientRunner {
    pub fn new(
        config: BotConfig,
        client: Box<dyn NetworkClient>,
        ready: ReadySignal,
        stop: CancellationToken,
        event_tx: Sender<WorkerEvent>,
    ) -> Self {
        Self {
            config,
            client,
            ready,
            stop,
            event_tx,
        }
    }

    /// Run one bot session to completion on a fresh current-thread runtime.
    ///
    /// Blocks the calling thread; meant to be the body of the worker thread.
    pub fn run(self) -> RunOutcome {
        let rt = match Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "failed to create worker runtime");
                let _ = self.event_tx.send(WorkerEvent::Failed(ClientError::Generic(format!(
                    "Failed to create Tokio runtime: {}",
                    e
                ))));
                return RunOutcome::Failed;
            }
        };
        rt.block_on(self.drive())
    }

    async fn drive(mut self) -> RunOutcome {
        let channel_id = self.config.channel_id;
        debug!(channel_id, "starting bot");

        let login = tokio::select! {
            biased;
            _ = self.ready.resolved() => None,
            _ = self.stop.cancelled() => None,
            result = self.client.connect(&self.config.token) => Some(result),
        };

        let session = match login {
            None => return self.abandon_startup().await,
            Some(Err(e)) => {
                report_failure(&e);
                let _ = self.event_tx.send(WorkerEvent::Failed(e));
                self.client.disconnect().await;
                return RunOutcome::Failed;
            }
            Some(Ok(session)) => session,
        };

        // stop may have raced the final step of login
        if !self.ready.fulfill() {
            return self.abandon_startup().await;
        }
        info!(user = %session.user, channel_id, "logged in");
        let _ = self.event_tx.send(WorkerEvent::Ready { user: session.user });

        let outcome = loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break RunOutcome::Stopped,
                next = self.client.next_message() => match next {
                    Ok(Some(message)) => {
                        if let Some(event) = filter_message(message, channel_id) {
                            debug!(author = %event.author, "forwarding message");
                            let _ = self.event_tx.send(WorkerEvent::Inbound(event));
                        }
                    }
                    Ok(None) => {
                        info!("session ended by the network client");
                        break RunOutcome::Ended;
                    }
                    Err(e) => {
                        report_failure(&e);
                        let _ = self.event_tx.send(WorkerEvent::Failed(e));
                        break RunOutcome::Failed;
                    }
                },
            }
        };

        self.client.disconnect().await;
        outcome
    }

    async fn abandon_startup(mut self) -> RunOutcome {
        self.ready.cancel();
        warn!("bot startup was cancelled");
        let _ = self.event_tx.send(WorkerEvent::StartupCancelled);
        self.client.disconnect().await;
        RunOutcome::Cancelled
    }
}

fn report_failure(e: &ClientError) {
    match e {
        ClientError::LoginFailure(msg) => {
            error!(error = %msg, "invalid token, please check your token and try again")
        }
        ClientError::Transport(msg) => {
            error!(error = %msg, "an error occurred while talking to the chat network")
        }
        ClientError::Generic(msg) => error!(error = %msg, "an unexpected error occurred"),
    }
}

/// Keep only non-empty messages from the watched channel.
pub fn filter_message(message: IncomingMessage, channel_id: u64) -> Option<InboundEvent> {
    if message.channel_id != channel_id || message.content.is_empty() {
        return None;
    }
    Some(InboundEvent {
        author: message.author,
        content: message.content,
    })
}
