//! Websocket connection setup for the gateway
//!
//! Handles TLS configuration and the websocket handshake.

use rustls::RootCertStore;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;

pub const GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

pub type GatewayStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Create a TLS client config with webpki root certificates for cross-platform compatibility
pub fn create_tls_config() -> Arc<rustls::ClientConfig> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
}

/// Open a websocket to `url` (TLS for `wss://`, plain for `ws://`).
///
/// # Errors
/// `ClientError::Transport` if TCP, TLS or the websocket handshake fails.
pub async fn establish_connection(url: &str) -> Result<GatewayStream, ClientError> {
    let connector = Connector::Rustls(create_tls_config());
    let (stream, _response) = connect_async_tls_with_config(url, None, false, Some(connector))
        .await
        .map_err(|e| ClientError::Transport(format!("gateway handshake failed: {}", e)))?;
    Ok(stream)
}
