use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use aerokeys_core::classify::Classifier;
use aerokeys_core::loader::{load_modes, FALLBACK_MODE};
use aerokeys_core::model::Mode;
use aerokeys_core::protocol::{ClientRequest, DaemonEvent, ModesSnapshot};
use aerokeys_core::source::ModeSource;

use crate::session::SessionManager;

/// Daemon state: the current mode list, the active mode, and connected clients.
///
/// `modes` is only ever replaced as a whole once a reload has finished.
pub struct Daemon {
    pub modes: Arc<Vec<Mode>>,
    pub current: String,
    pub loaded_at: Option<DateTime<Local>>,
    pub sessions: SessionManager,
    pub reload_rx: mpsc::UnboundedReceiver<Vec<Mode>>,
    reload_tx: mpsc::UnboundedSender<Vec<Mode>>,
    source: Arc<dyn ModeSource>,
    classifier: Arc<Classifier>,
    reloading: bool,
    reload_queued: bool,
    /// Clients answered by the load currently running.
    reload_waiters: Vec<usize>,
    /// Clients that asked while a load was running; they wait for the next one.
    queued_waiters: Vec<usize>,
}

impl Daemon {
    pub fn new(source: Arc<dyn ModeSource>, classifier: Classifier) -> Self {
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();
        Self {
            modes: Arc::new(Vec::new()),
            current: FALLBACK_MODE.to_string(),
            loaded_at: None,
            sessions: SessionManager::new(),
            reload_rx,
            reload_tx,
            source,
            classifier: Arc::new(classifier),
            reloading: false,
            reload_queued: false,
            reload_waiters: Vec::new(),
            queued_waiters: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> ModesSnapshot {
        ModesSnapshot {
            modes: self.modes.as_ref().clone(),
            current: self.current.clone(),
            loaded_at: self.loaded_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        }
    }

    /// Start loading modes in the background. A reload requested while one is
    /// running is queued and starts when the first one lands.
    pub fn request_reload(&mut self) {
        if self.reloading {
            self.reload_queued = true;
            return;
        }
        self.reloading = true;
        self.reload_waiters.append(&mut self.queued_waiters);
        let source = Arc::clone(&self.source);
        let classifier = Arc::clone(&self.classifier);
        let tx = self.reload_tx.clone();
        tokio::task::spawn_blocking(move || {
            let modes = load_modes(source.as_ref(), &classifier);
            let _ = tx.send(modes);
        });
    }

    /// Install a finished load and tell everyone about it.
    pub fn apply_reload(&mut self, modes: Vec<Mode>) {
        self.reloading = false;
        self.modes = Arc::new(modes);
        self.loaded_at = Some(Local::now());
        if !self.modes.iter().any(|m| m.id == self.current) {
            debug!(mode = %self.current, "active mode vanished after reload");
            self.current = FALLBACK_MODE.to_string();
        }
        info!(modes = self.modes.len(), clients = self.sessions.len(), "modes loaded");

        let event = DaemonEvent::Reloaded(self.snapshot());
        for session_id in std::mem::take(&mut self.reload_waiters) {
            if !self.sessions.is_subscribed(session_id) {
                self.sessions.send_to(session_id, event.clone());
            }
        }
        self.sessions.broadcast(&event);

        if std::mem::take(&mut self.reload_queued) {
            self.request_reload();
        }
    }

    pub fn set_mode(&mut self, mode: String) {
        if !self.modes.iter().any(|m| m.id == mode) {
            warn!(%mode, "switched to a mode with no loaded bindings");
        }
        debug!(%mode, "mode changed");
        self.current = mode.clone();
        self.sessions.broadcast(&DaemonEvent::ModeChanged { mode });
    }

    /// Handle one client request. Returns true when the daemon should stop.
    pub fn handle_request(&mut self, req: ClientRequest, session_id: usize) -> bool {
        match req {
            ClientRequest::GetModes => {
                self.sessions.send_to(session_id, DaemonEvent::Modes(self.snapshot()));
            }
            ClientRequest::GetCurrentMode => {
                self.sessions.send_to(
                    session_id,
                    DaemonEvent::CurrentMode {
                        mode: self.current.clone(),
                    },
                );
            }
            ClientRequest::ModeChanged { mode } => {
                let subscribed = self.sessions.is_subscribed(session_id);
                self.set_mode(mode.clone());
                if !subscribed {
                    self.sessions.send_to(session_id, DaemonEvent::ModeChanged { mode });
                }
            }
            ClientRequest::Reload => {
                self.queued_waiters.push(session_id);
                self.request_reload();
            }
            ClientRequest::Subscribe => {
                self.sessions.set_subscribed(session_id, true);
                self.sessions.send_to(session_id, DaemonEvent::Subscribed);
            }
            ClientRequest::Unsubscribe => {
                self.sessions.set_subscribed(session_id, false);
                self.sessions.send_to(session_id, DaemonEvent::Unsubscribed);
            }
            ClientRequest::Ping => {
                self.sessions.send_to(session_id, DaemonEvent::Pong);
            }
            ClientRequest::Shutdown => return true,
        }
        false
    }
}
