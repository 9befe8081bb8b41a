//! Discord gateway client used by the desktop binary.
//!
//! - `connection`: TLS config and websocket handshake
//! - `payload`: frame decoding, identify/heartbeat encoding, close-code mapping

pub mod connection;
pub mod payload;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::client::{NetworkClient, SessionInfo};
use crate::error::ClientError;
use crate::protocol::IncomingMessage;
use connection::{establish_connection, GatewayStream, GATEWAY_URL};
use payload::GatewayEvent;

fn transport(e: impl std::fmt::Display) -> ClientError {
    ClientError::Transport(e.to_string())
}

/// An identified gateway connection with its heartbeat clock.
struct Session {
    socket: GatewayStream,
    heartbeat: Interval,
    sequence: Option<u64>,
}

impl Session {
    async fn send_heartbeat(&mut self) -> Result<(), ClientError> {
        let frame = payload::heartbeat(self.sequence);
        self.socket.send(Message::Text(frame.into())).await.map_err(transport)
    }

    /// Next event worth surfacing, answering heartbeats along the way.
    /// `Ok(None)` when the stream ends. Cancel-safe between frames.
    async fn next_event(&mut self) -> Result<Option<GatewayEvent>, ClientError> {
        loop {
            tokio::select! {
                _ = self.heartbeat.tick() => self.send_heartbeat().await?,
                frame = self.socket.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let frame = payload::decode(text.as_str())?;
                        if frame.sequence.is_some() {
                            self.sequence = frame.sequence;
                        }
                        match frame.event {
                            GatewayEvent::HeartbeatRequest => self.send_heartbeat().await?,
                            GatewayEvent::HeartbeatAck | GatewayEvent::Other => {}
                            event => return Ok(Some(event)),
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        return Err(match frame {
                            Some(f) => payload::close_error(u16::from(f.code), f.reason.as_str()),
                            None => ClientError::Transport("gateway closed the connection".into()),
                        });
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(transport(e)),
                    None => return Ok(None),
                },
            }
        }
    }
}

/// Read frames until the gateway's Hello and return its heartbeat interval.
async fn wait_for_hello(socket: &mut GatewayStream) -> Result<std::time::Duration, ClientError> {
    while let Some(frame) = socket.next().await {
        match frame.map_err(transport)? {
            Message::Text(text) => {
                if let GatewayEvent::Hello { heartbeat_interval } =
                    payload::decode(text.as_str())?.event
                {
                    return Ok(heartbeat_interval);
                }
            }
            Message::Close(Some(f)) => {
                return Err(payload::close_error(u16::from(f.code), f.reason.as_str()))
            }
            Message::Close(None) => break,
            _ => {}
        }
    }
    Err(ClientError::Transport("gateway closed before hello".into()))
}

pub struct DiscordGateway {
    url: String,
    session: Option<Session>,
}

impl Default for DiscordGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordGateway {
    pub fn new() -> Self {
        Self::with_url(GATEWAY_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session: None,
        }
    }

    async fn await_ready(&mut self) -> Result<SessionInfo, ClientError> {
        loop {
            let session = self
                .session
                .as_mut()
                .ok_or_else(|| ClientError::Generic("not connected".into()))?;
            match session.next_event().await? {
                Some(GatewayEvent::Ready { user }) => return Ok(SessionInfo { user }),
                Some(GatewayEvent::InvalidSession) => {
                    return Err(ClientError::Transport(
                        "gateway invalidated the session during login".into(),
                    ))
                }
                Some(GatewayEvent::Reconnect) => {
                    return Err(ClientError::Transport(
                        "gateway requested a reconnect during login".into(),
                    ))
                }
                Some(_) => {}
                None => {
                    return Err(ClientError::Transport(
                        "gateway closed before login completed".into(),
                    ))
                }
            }
        }
    }
}

#[async_trait]
impl NetworkClient for DiscordGateway {
    async fn connect(&mut self, token: &str) -> Result<SessionInfo, ClientError> {
        info!(url = %self.url, "connecting to gateway");
        let mut socket = establish_connection(&self.url).await?;
        let period = wait_for_hello(&mut socket).await?;
        debug!(interval_ms = period.as_millis() as u64, "gateway hello");

        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        socket
            .send(Message::Text(payload::identify(token).into()))
            .await
            .map_err(transport)?;

        self.session = Some(Session {
            socket,
            heartbeat,
            sequence: None,
        });
        let result = self.await_ready().await;
        if result.is_err() {
            self.session = None;
        }
        result
    }

    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, ClientError> {
        loop {
            let session = self
                .session
                .as_mut()
                .ok_or_else(|| ClientError::Generic("not connected".into()))?;
            let event = match session.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    self.session = None;
                    return Ok(None);
                }
                Err(e) => {
                    self.session = None;
                    return Err(e);
                }
            };
            match event {
                GatewayEvent::Message(message) => return Ok(Some(message)),
                GatewayEvent::Reconnect => {
                    self.session = None;
                    return Err(ClientError::Transport("gateway requested a reconnect".into()));
                }
                GatewayEvent::InvalidSession => {
                    self.session = None;
                    return Err(ClientError::Transport("gateway invalidated the session".into()));
                }
                _ => {}
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.socket.close(None).await {
                warn!(error = %e, "error while closing gateway connection");
            }
            info!("disconnected from gateway");
        }
    }
}
