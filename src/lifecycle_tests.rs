//! End-to-end lifecycle tests for `BotController` driving real worker threads
//! with a scripted network client.

#[cfg(test)]
mod lifecycle_tests {
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::{Duration, Instant};

    use crossbeam_channel::bounded;
    use tempfile::TempDir;

    use crate::buffer::LineKind;
    use crate::config::{ConfigForm, JsonSettingsStore, SETTINGS_FILE};
    use crate::controller::{
        BotController, BotState, READY_LINE, START_LABEL, STOPPED_LINE, STOP_LABEL,
    };
    use crate::error::{ClientError, StartError};
    use crate::testing::{msg, ScriptedClient, ScriptedFactory};

    const WAIT: Duration = Duration::from_secs(5);

    fn form(channel_id: &str, remember_me: bool) -> ConfigForm {
        ConfigForm {
            token: "valid".into(),
            channel_id: channel_id.into(),
            remember_me,
        }
    }

    fn controller(client: ScriptedClient) -> (TempDir, ScriptedFactory, BotController) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join(SETTINGS_FILE));
        let factory = ScriptedFactory::new(client);
        let controller = BotController::new(store, factory.clone());
        (dir, factory, controller)
    }

    fn poll_until(c: &mut BotController, cond: impl Fn(&BotController) -> bool) -> bool {
        let deadline = Instant::now() + WAIT;
        loop {
            c.poll();
            if cond(c) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_stop_before_ready_joins_worker() {
        let client = ScriptedClient::hanging();
        let disconnects = client.disconnect_counter();
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert_eq!(c.state(), BotState::Starting);
        assert_eq!(c.button_label(), STOP_LABEL);

        // run stop() off-thread so a hang fails the test instead of wedging it
        let (done_tx, done_rx) = bounded(1);
        thread::spawn(move || {
            let stopped = c.stop();
            done_tx
                .send((stopped, c.is_running(), c.state(), c.button_label()))
                .unwrap();
        });
        let (stopped, running, state, label) = done_rx.recv_timeout(WAIT).expect("stop() hung");
        assert!(stopped);
        assert!(!running);
        assert_eq!(state, BotState::Idle);
        assert_eq!(label, START_LABEL);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_channel_never_spawns() {
        let (_dir, factory, mut c) = controller(ScriptedClient::ready("bot"));

        for bad in ["", "abc", "-1", "12ab"] {
            let result = c.start(&form(bad, true));
            assert!(matches!(result, Err(StartError::InvalidConfig(_))));
            assert!(!c.is_running());
            assert_eq!(c.button_label(), START_LABEL);
        }
        assert_eq!(factory.created().load(Ordering::SeqCst), 0);
        assert_eq!(c.log().texts(LineKind::Error).len(), 4);
        // invalid input is never persisted
        assert_eq!(c.saved_form(), ConfigForm::default());
    }

    #[test]
    fn test_stop_without_worker_is_noop() {
        let (_dir, _factory, mut c) = controller(ScriptedClient::ready("bot"));
        let before = c.log().len();
        assert!(!c.stop());
        assert_eq!(c.log().len(), before);
        assert_eq!(c.state(), BotState::Idle);
        assert_eq!(c.button_label(), START_LABEL);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let (_dir, factory, mut c) = controller(ScriptedClient::ready("bot"));

        c.start(&form("123", false)).unwrap();
        assert!(matches!(
            c.start(&form("456", false)),
            Err(StartError::AlreadyRunning)
        ));
        assert_eq!(factory.created().load(Ordering::SeqCst), 1);
        assert_eq!(c.config().map(|cfg| cfg.channel_id), Some(123));

        assert!(c.stop());
        assert!(!c.is_running());
    }

    #[test]
    fn test_ready_shows_status_once() {
        let (_dir, _factory, mut c) = controller(ScriptedClient::ready("bot"));

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| c.state() == BotState::Ready));
        for _ in 0..5 {
            c.poll();
        }

        let ready_lines = c.log().iter().filter(|l| l.text == READY_LINE).count();
        assert_eq!(ready_lines, 1);
        assert_eq!(c.button_label(), STOP_LABEL);

        assert!(c.stop());
        assert_eq!(c.log().lines().last().map(|l| l.text.as_str()), Some(STOPPED_LINE));
    }

    #[test]
    fn test_remember_me_persists_settings() {
        let (dir, _factory, mut c) = controller(ScriptedClient::ready("bot"));
        let submitted = form("123", true);

        c.start(&submitted).unwrap();
        c.stop();
        drop(c);

        let reloaded = BotController::new(
            JsonSettingsStore::new(dir.path().join(SETTINGS_FILE)),
            ScriptedFactory::new(ScriptedClient::ready("bot")),
        );
        assert_eq!(reloaded.saved_form(), submitted);
    }

    #[test]
    fn test_without_remember_me_nothing_is_written() {
        let (dir, _factory, mut c) = controller(ScriptedClient::ready("bot"));
        c.start(&form("123", false)).unwrap();
        c.stop();
        assert!(!dir.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn test_login_failure_reverts_to_start() {
        let client = ScriptedClient::failing(ClientError::LoginFailure("bad token".into()));
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| !c.is_running()));

        assert_eq!(c.button_label(), START_LABEL);
        assert_eq!(c.state(), BotState::Idle);
        let errors = c.log().texts(LineKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Login failed"));
        assert!(c.log().iter().all(|l| l.text != READY_LINE));
    }

    #[test]
    fn test_only_watched_channel_reaches_log() {
        let client = ScriptedClient::ready("bot").with_messages(vec![
            msg("alice", 123, "first"),
            msg("eve", 77, "other channel"),
            msg("bob", 123, ""),
            msg("bob", 123, "second"),
            msg("carol", 123, "third"),
        ]);
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| c.log().texts(LineKind::Message).len() == 3));

        assert_eq!(
            c.log().texts(LineKind::Message),
            vec![
                "Message from alice: first",
                "Message from bob: second",
                "Message from carol: third",
            ]
        );
        // ready precedes every message
        let ready_at = c.log().iter().position(|l| l.text == READY_LINE).unwrap();
        let first_msg = c.log().iter().position(|l| l.kind == LineKind::Message).unwrap();
        assert!(ready_at < first_msg);
        c.stop();
    }

    #[test]
    fn test_transport_failure_after_ready_reverts() {
        let client = ScriptedClient::ready("bot")
            .with_error(ClientError::Transport("connection reset".into()));
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| !c.is_running()));
        assert_eq!(c.button_label(), START_LABEL);
        assert!(c.log().texts(LineKind::Error)[0].contains("connection reset"));
    }

    #[test]
    fn test_worker_panic_clears_handle() {
        let client = ScriptedClient::ready("bot").panic_after_messages();
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| !c.is_running()));
        assert_eq!(c.state(), BotState::Idle);
        assert_eq!(c.button_label(), START_LABEL);
        assert!(!c.log().texts(LineKind::Error).is_empty());
    }

    #[test]
    fn test_session_end_before_ready_is_reported() {
        let client = ScriptedClient::failing(ClientError::Generic("boom".into()));
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| !c.is_running()));
        assert_eq!(c.log().texts(LineKind::Error).len(), 1);
    }

    #[test]
    fn test_window_close_stops_live_worker() {
        let (_dir, _factory, mut c) = controller(ScriptedClient::ready("bot"));

        c.start(&form("123", false)).unwrap();
        assert!(poll_until(&mut c, |c| c.state() == BotState::Ready));
        c.on_window_close();
        assert!(!c.is_running());
        assert_eq!(c.state(), BotState::Idle);

        // nothing left to do on a second close
        let before = c.log().len();
        c.on_window_close();
        assert_eq!(c.log().len(), before);
    }

    #[test]
    fn test_window_close_while_starting_joins_worker() {
        let client = ScriptedClient::hanging();
        let disconnects = client.disconnect_counter();
        let (_dir, _factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        c.poll();
        assert_eq!(c.state(), BotState::Starting);

        let (done_tx, done_rx) = bounded(1);
        thread::spawn(move || {
            c.on_window_close();
            let status: Vec<String> = c
                .log()
                .texts(LineKind::Status)
                .into_iter()
                .map(String::from)
                .collect();
            done_tx.send((c.is_running(), c.state(), status)).unwrap();
        });
        let (running, state, status) = done_rx.recv_timeout(WAIT).expect("window close hung");
        assert!(!running);
        assert_eq!(state, BotState::Idle);
        assert!(!status.iter().any(|line| line == READY_LINE));
        assert_eq!(status.last().map(String::as_str), Some(STOPPED_LINE));
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let (_dir, factory, mut c) = controller(ScriptedClient::ready("bot"));

        c.toggle(&form("123", false));
        assert!(c.is_running());
        c.toggle(&form("123", false));
        assert!(!c.is_running());
        c.toggle(&form("456", false));
        assert!(c.is_running());
        assert_eq!(c.config().map(|cfg| cfg.channel_id), Some(456));
        assert_eq!(factory.created().load(Ordering::SeqCst), 2);
        c.stop();
    }

    #[test]
    fn test_restart_after_failed_start() {
        let client = ScriptedClient::failing(ClientError::LoginFailure("bad token".into()));
        let (_dir, factory, mut c) = controller(client);

        c.start(&form("123", false)).unwrap();
        // wait for the worker thread to die without polling its events first
        let deadline = Instant::now() + WAIT;
        while factory.created().load(Ordering::SeqCst) == 1 && Instant::now() < deadline {
            if c.start(&form("123", false)).is_ok() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(factory.created().load(Ordering::SeqCst), 2);
        assert!(poll_until(&mut c, |c| !c.is_running()));
    }
}
