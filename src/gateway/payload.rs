//! Gateway frame encoding and decoding.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::ClientError;
use crate::protocol::IncomingMessage;

pub const OP_DISPATCH: u8 = 0;
pub const OP_HEARTBEAT: u8 = 1;
pub const OP_IDENTIFY: u8 = 2;
pub const OP_RECONNECT: u8 = 7;
pub const OP_INVALID_SESSION: u8 = 9;
pub const OP_HELLO: u8 = 10;
pub const OP_HEARTBEAT_ACK: u8 = 11;

const INTENT_GUILD_MESSAGES: u64 = 1 << 9;
const INTENT_DIRECT_MESSAGES: u64 = 1 << 12;
const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;
pub const INTENTS: u64 = INTENT_GUILD_MESSAGES | INTENT_DIRECT_MESSAGES | INTENT_MESSAGE_CONTENT;

/// Close code sent when the token is rejected
pub const CLOSE_AUTHENTICATION_FAILED: u16 = 4004;
pub const CLOSE_INVALID_INTENTS: u16 = 4013;
pub const CLOSE_DISALLOWED_INTENTS: u16 = 4014;

#[derive(Debug, Deserialize)]
struct Envelope {
    op: u8,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Hello {
    heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
struct User {
    username: String,
}

#[derive(Debug, Deserialize)]
struct Ready {
    user: User,
}

#[derive(Debug, Deserialize)]
struct MessageCreate {
    channel_id: String,
    #[serde(default)]
    content: String,
    author: User,
}

/// Gateway frames a read-only bot session cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    Hello { heartbeat_interval: Duration },
    Ready { user: String },
    Message(IncomingMessage),
    HeartbeatRequest,
    HeartbeatAck,
    Reconnect,
    InvalidSession,
    Other,
}

/// A decoded text frame: its sequence number (if any) and event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sequence: Option<u64>,
    pub event: GatewayEvent,
}

fn malformed(e: serde_json::Error) -> ClientError {
    ClientError::Generic(format!("malformed gateway payload: {}", e))
}

pub fn decode(text: &str) -> Result<Frame, ClientError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(malformed)?;

    let event = match envelope.op {
        OP_HELLO => {
            let hello: Hello = serde_json::from_value(envelope.d).map_err(malformed)?;
            if hello.heartbeat_interval == 0 {
                return Err(ClientError::Transport(
                    "gateway sent a zero heartbeat interval".into(),
                ));
            }
            GatewayEvent::Hello {
                heartbeat_interval: Duration::from_millis(hello.heartbeat_interval),
            }
        }
        OP_HEARTBEAT => GatewayEvent::HeartbeatRequest,
        OP_HEARTBEAT_ACK => GatewayEvent::HeartbeatAck,
        OP_RECONNECT => GatewayEvent::Reconnect,
        OP_INVALID_SESSION => GatewayEvent::InvalidSession,
        OP_DISPATCH => match envelope.t.as_deref() {
            Some("READY") => {
                let ready: Ready = serde_json::from_value(envelope.d).map_err(malformed)?;
                GatewayEvent::Ready {
                    user: ready.user.username,
                }
            }
            Some("MESSAGE_CREATE") => {
                let message: MessageCreate =
                    serde_json::from_value(envelope.d).map_err(malformed)?;
                match message.channel_id.parse::<u64>() {
                    Ok(channel_id) => GatewayEvent::Message(IncomingMessage {
                        author: message.author.username,
                        channel_id,
                        content: message.content,
                    }),
                    Err(_) => GatewayEvent::Other,
                }
            }
            _ => GatewayEvent::Other,
        },
        _ => GatewayEvent::Other,
    };

    Ok(Frame {
        sequence: envelope.s,
        event,
    })
}

pub fn identify(token: &str) -> String {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": INTENTS,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "discord-wr",
                "device": "discord-wr",
            },
        },
    })
    .to_string()
}

pub fn heartbeat(sequence: Option<u64>) -> String {
    json!({ "op": OP_HEARTBEAT, "d": sequence }).to_string()
}

/// Map a server close frame to an error class.
pub fn close_error(code: u16, reason: &str) -> ClientError {
    match code {
        CLOSE_AUTHENTICATION_FAILED => ClientError::LoginFailure(
            "Invalid token. Please check your token and try again.".to_string(),
        ),
        CLOSE_INVALID_INTENTS | CLOSE_DISALLOWED_INTENTS => ClientError::Generic(format!(
            "gateway rejected the requested intents ({}): {}",
            code, reason
        )),
        _ => ClientError::Transport(format!("gateway closed the connection ({}): {}", code, reason)),
    }
}
