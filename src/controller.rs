//! UI-thread owner of the bot worker lifecycle.
//!
//! `BotController` holds at most one [`WorkerHandle`]. The UI calls
//! [`BotController::poll`] once per frame; that is the only place worker
//! events enter UI state, so everything here runs on the UI thread.
//!
//! Lifecycle: `Idle -> Starting -> Ready -> Stopping -> Idle`, with
//! `Starting -> Idle` when login fails and `Starting | Ready -> Idle` when the
//! worker dies or the window closes.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::backend::{spawn_worker, WorkerHandle};
use crate::buffer::LogBuffer;
use crate::client::ClientFactory;
use crate::config::{BotConfig, ConfigForm, SettingsStore, StoredSettings};
use crate::error::{ClientError, StartError};
use crate::protocol::{InboundEvent, WorkerEvent};
use crate::signal::ReadyState;

pub const START_LABEL: &str = "Start Bot";
pub const STOP_LABEL: &str = "Stop Bot";
pub const READY_LINE: &str = "🟢 Bot is Ready";
pub const STOPPED_LINE: &str = "🔴 Bot Stopped";
pub const DISCONNECTED_LINE: &str = "🔴 Bot disconnected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Idle,
    Starting,
    Ready,
    Stopping,
}

pub struct BotController {
    settings: Box<dyn SettingsStore>,
    factory: Arc<dyn ClientFactory>,
    config: Option<BotConfig>,
    worker: Option<WorkerHandle>,
    state: BotState,
    /// A failure line was already shown for the current worker
    failure_reported: bool,
    log: LogBuffer,
}

impl BotController {
    pub fn new(
        settings: impl SettingsStore + 'static,
        factory: impl ClientFactory + 'static,
    ) -> Self {
        Self {
            settings: Box::new(settings),
            factory: Arc::new(factory),
            config: None,
            worker: None,
            state: BotState::Idle,
            failure_reported: false,
            log: LogBuffer::new(),
        }
    }

    /// Form contents restored from the settings store (defaults if none).
    pub fn saved_form(&self) -> ConfigForm {
        ConfigForm::from(self.settings.load())
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running() {
            STOP_LABEL
        } else {
            START_LABEL
        }
    }

    /// Snapshot used by the current or most recent run.
    pub fn config(&self) -> Option<&BotConfig> {
        self.config.as_ref()
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Start/Stop button handler.
    pub fn toggle(&mut self, form: &ConfigForm) {
        if self.is_running() {
            self.stop();
        } else if let Err(e) = self.start(form) {
            // already logged by start()
            tracing::debug!(error = %e, "start rejected");
        }
    }

    /// Validate `form` and spawn a worker for it.
    ///
    /// The button flips to "Stop Bot" immediately; readiness arrives later
    /// through [`BotController::poll`].
    pub fn start(&mut self, form: &ConfigForm) -> Result<(), StartError> {
        // a worker that died on its own must not block a restart
        self.reap_finished();
        if self.worker.is_some() {
            warn!("start requested while a worker is live");
            return Err(StartError::AlreadyRunning);
        }

        let config = match form.parse() {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "invalid configuration");
                self.log.push_error(format!("⚠ {}", e));
                return Err(e.into());
            }
        };

        if config.remember_me {
            if let Err(e) = self.settings.save(&StoredSettings::from(&config)) {
                warn!(error = %e, "failed to save settings");
                self.log.push_error(format!("⚠ Failed to save settings: {}", e));
            }
        }

        let worker = match spawn_worker(config.clone(), self.factory.create()) {
            Ok(worker) => worker,
            Err(e) => {
                error!(error = %e, "failed to spawn bot worker");
                let e = StartError::Spawn(e);
                self.log.push_error(format!("⚠ {}", e));
                return Err(e);
            }
        };

        info!(channel_id = config.channel_id, "bot worker started");
        self.log.push_status("Starting bot...");
        self.config = Some(config);
        self.worker = Some(worker);
        self.state = BotState::Starting;
        self.failure_reported = false;
        Ok(())
    }

    /// Signal the worker, wait for its thread to exit and reset to idle.
    ///
    /// Returns false (and changes nothing) when no worker is live. There is
    /// no timeout: if the client's disconnect hangs, so does this call.
    pub fn stop(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };

        self.state = BotState::Stopping;
        worker.request_stop();
        if !worker.has_exited() {
            warn!("waiting for bot worker to exit");
        }
        for event in worker.join() {
            self.dispatch(event);
        }

        self.state = BotState::Idle;
        self.log.push_status(STOPPED_LINE);
        info!("bot worker stopped");
        true
    }

    /// Drain worker events into UI state and notice a worker that exited on
    /// its own. Call once per UI frame.
    pub fn poll(&mut self) {
        let Some(worker) = self.worker.as_mut() else {
            return;
        };
        let mut events = Vec::new();
        while let Some(event) = worker.try_recv() {
            events.push(event);
        }
        for event in events {
            self.dispatch(event);
        }
        self.reap_finished();
    }

    /// Window close hook: same teardown as [`BotController::stop`] when a
    /// worker is live, so no thread outlives the window.
    pub fn on_window_close(&mut self) {
        if self.is_running() {
            info!("window closing, stopping bot");
            self.stop();
        }
    }

    pub fn on_ready(&mut self, user: &str) {
        if self.state == BotState::Starting {
            self.state = BotState::Ready;
        }
        info!(user, "bot is ready");
        self.log.push_status(READY_LINE);
    }

    pub fn on_inbound_event(&mut self, event: InboundEvent) {
        tracing::debug!(author = %event.author, content = %event.content, "received message");
        self.log
            .push_message(format!("Message from {}: {}", event.author, event.content));
    }

    fn on_worker_failure(&mut self, e: ClientError) {
        warn!(kind = e.kind(), error = %e, "bot worker reported a failure");
        self.failure_reported = true;
        self.log.push_error(format!("⚠ {}", e));
    }

    fn dispatch(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Ready { user } => self.on_ready(&user),
            WorkerEvent::Inbound(event) => self.on_inbound_event(event),
            WorkerEvent::Failed(e) => self.on_worker_failure(e),
            WorkerEvent::StartupCancelled => info!("bot startup cancelled"),
            WorkerEvent::Exited => {}
        }
    }

    /// Clear the handle of a worker whose thread has ended without `stop()`.
    fn reap_finished(&mut self) {
        if !self.worker.as_ref().is_some_and(WorkerHandle::has_exited) {
            return;
        }
        let Some(worker) = self.worker.take() else {
            return;
        };

        let reached_ready = worker.ready_state() == ReadyState::Fulfilled;
        for event in worker.join() {
            self.dispatch(event);
        }
        self.state = BotState::Idle;

        if !self.failure_reported {
            if reached_ready {
                warn!("bot worker exited after login");
                self.log.push_error(DISCONNECTED_LINE);
            } else {
                error!("bot worker exited before becoming ready");
                self.log.push_error("⚠ Bot exited before becoming ready");
            }
        }
    }
}

impl Drop for BotController {
    fn drop(&mut self) {
        self.on_window_close();
    }
}
