//! Scripted network client and helpers shared by the unit and lifecycle tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::client::{ClientFactory, NetworkClient, SessionInfo};
use crate::error::ClientError;
use crate::protocol::IncomingMessage;

pub fn msg(author: &str, channel_id: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        author: author.into(),
        channel_id,
        content: content.into(),
    }
}

#[derive(Debug, Clone)]
enum Login {
    Succeed(String),
    Fail(ClientError),
    Hang,
}

/// What happens once the scripted messages run out.
#[derive(Debug, Clone, Copy)]
enum Tail {
    StayOpen,
    End,
    Panic,
}

#[derive(Debug, Clone)]
pub struct ScriptedClient {
    login: Login,
    script: VecDeque<Result<IncomingMessage, ClientError>>,
    tail: Tail,
    disconnects: Arc<AtomicUsize>,
}

impl ScriptedClient {
    fn with_login(login: Login) -> Self {
        Self {
            login,
            script: VecDeque::new(),
            tail: Tail::StayOpen,
            disconnects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Logs in as `user`, then idles until stopped.
    pub fn ready(user: &str) -> Self {
        Self::with_login(Login::Succeed(user.into()))
    }

    pub fn failing(error: ClientError) -> Self {
        Self::with_login(Login::Fail(error))
    }

    /// Login never completes.
    pub fn hanging() -> Self {
        Self::with_login(Login::Hang)
    }

    pub fn with_messages(mut self, messages: Vec<IncomingMessage>) -> Self {
        self.script.extend(messages.into_iter().map(Ok));
        self
    }

    pub fn with_error(mut self, error: ClientError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    pub fn end_after_messages(mut self) -> Self {
        self.tail = Tail::End;
        self
    }

    pub fn panic_after_messages(mut self) -> Self {
        self.tail = Tail::Panic;
        self
    }

    /// Shared count of `disconnect` calls, across clones.
    pub fn disconnect_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.disconnects)
    }
}

#[async_trait]
impl NetworkClient for ScriptedClient {
    async fn connect(&mut self, _token: &str) -> Result<SessionInfo, ClientError> {
        match self.login.clone() {
            Login::Succeed(user) => Ok(SessionInfo { user }),
            Login::Fail(e) => Err(e),
            Login::Hang => std::future::pending().await,
        }
    }

    async fn next_message(&mut self) -> Result<Option<IncomingMessage>, ClientError> {
        match self.script.pop_front() {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(e)) => Err(e),
            None => match self.tail {
                Tail::StayOpen => std::future::pending().await,
                Tail::End => Ok(None),
                Tail::Panic => panic!("scripted client crashed"),
            },
        }
    }

    async fn disconnect(&mut self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out clones of a template client and counts them.
#[derive(Clone)]
pub struct ScriptedFactory {
    template: ScriptedClient,
    created: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn new(template: ScriptedClient) -> Self {
        Self {
            template,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn created(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

impl ClientFactory for ScriptedFactory {
    fn create(&self) -> Box<dyn NetworkClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(self.template.clone())
    }
}
