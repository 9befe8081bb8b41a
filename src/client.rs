//! Boundary to the chat-network client library.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::protocol::IncomingMessage;

/// Identity reported once login completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user: String,
}

/// A chat-network session driven from the worker's event loop.
///
/// `connect` returning `Ok` is the ready hook; each `next_message` result is
/// the message hook.
#[async_trait]
pub trait NetworkClient: Send {
    /// Log in with `token`, suspending until login completes or fails.
    async fn connect(&mut self, token: &str) -> Result<SessionInfo, ClientError>;

    /// Next message from any channel. `Ok(None)` means the session ended.
    ///
    /// Must be cancel-safe: the runner drops the future when stop is requested.
    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, ClientError>;

    /// Close the remote session. Called at most once.
    async fn disconnect(&mut self);
}

/// Creates a fresh client for every worker run.
pub trait ClientFactory: Send + Sync {
    fn create(&self) -> Box<dyn NetworkClient>;
}

impl<F> ClientFactory for F
where
    F: Fn() -> Box<dyn NetworkClient> + Send + Sync,
{
    fn create(&self) -> Box<dyn NetworkClient> {
        self()
    }
}
