use crate::error::ClientError;

/// A message as decoded by the network client, before channel filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author: String,
    pub channel_id: u64,
    pub content: String,
}

/// A message from the watched channel, destined for the UI log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub author: String,
    pub content: String,
}

/// Events sent from the worker thread to the UI thread, in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Login completed
    Ready { user: String },
    /// A message for the watched channel
    Inbound(InboundEvent),
    /// Connect or session failure; the worker exits after sending this
    Failed(ClientError),
    /// Stop was requested before login completed
    StartupCancelled,
    /// Last event a worker ever sends, also on panic
    Exited,
}
