use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use aerokeys_core::config::Settings;
use aerokeys_core::loader::FALLBACK_MODE;
use aerokeys_core::model::Mode;
use aerokeys_core::protocol::{ClientRequest, DaemonEvent, ModesSnapshot};

pub struct App {
    pub daemon_tx: mpsc::UnboundedSender<ClientRequest>,
    pub connected: bool,
    pub should_quit: bool,
    pub snapshot: Option<ModesSnapshot>,
    /// Mode AeroSpace reports as active.
    pub current: String,
    /// Mode picked with Tab/Shift-Tab. Cleared on the next mode switch.
    pub pinned: Option<String>,
    pub columns: u16,
    pub hide_on_main: bool,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(daemon_tx: mpsc::UnboundedSender<ClientRequest>, settings: &Settings) -> Self {
        Self {
            daemon_tx,
            connected: true,
            should_quit: false,
            snapshot: None,
            current: FALLBACK_MODE.to_string(),
            pinned: None,
            columns: settings.columns(),
            hide_on_main: settings.hide_on_main(),
            status_message: None,
        }
    }

    pub fn apply_event(&mut self, event: DaemonEvent) {
        match event {
            DaemonEvent::Modes(snapshot) => self.install(snapshot),
            DaemonEvent::Reloaded(snapshot) => {
                let count = snapshot.modes.len();
                self.install(snapshot);
                self.set_status(format!("Reloaded {count} modes"));
            }
            DaemonEvent::ModeChanged { mode } | DaemonEvent::CurrentMode { mode } => {
                self.current = mode;
                self.pinned = None;
            }
            DaemonEvent::Error { message } => self.set_status(format!("Daemon: {message}")),
            DaemonEvent::Subscribed | DaemonEvent::Unsubscribed | DaemonEvent::Pong => {}
        }
    }

    fn install(&mut self, snapshot: ModesSnapshot) {
        self.current = snapshot.current.clone();
        if let Some(pinned) = &self.pinned {
            if snapshot.mode(pinned).is_none() {
                self.pinned = None;
            }
        }
        self.snapshot = Some(snapshot);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.cycle(1),
            KeyCode::BackTab => self.cycle(-1),
            KeyCode::Char('r') => {
                if self.daemon_tx.send(ClientRequest::Reload).is_ok() {
                    self.set_status("Reloading...".to_string());
                }
            }
            _ => {}
        }
    }

    /// Id of the mode whose sheet is on screen.
    pub fn shown_id(&self) -> &str {
        self.pinned.as_deref().unwrap_or(&self.current)
    }

    /// Mode to render, or `None` when nothing should be drawn. An unknown
    /// mode renders as an empty sheet.
    pub fn shown_mode(&self) -> Option<Mode> {
        if self.hide_on_main && self.pinned.is_none() && self.current == FALLBACK_MODE {
            return None;
        }
        let id = self.shown_id();
        let found = self.snapshot.as_ref().and_then(|s| s.mode(id)).cloned();
        Some(found.unwrap_or_else(|| Mode::new(id, Vec::new())))
    }

    fn cycle(&mut self, step: isize) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let len = snapshot.modes.len() as isize;
        if len == 0 {
            return;
        }
        let shown = self.shown_id();
        let next = match snapshot.modes.iter().position(|m| m.id == shown) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        let id = snapshot.modes[next as usize].id.clone();
        self.pinned = if id == self.current { None } else { Some(id) };
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear status messages older than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed().as_secs() >= 3 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerokeys_core::model::{Category, KeyBinding};

    fn new_test_app() -> (App, mpsc::UnboundedReceiver<ClientRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(tx, &Settings::default()), rx)
    }

    fn snapshot(current: &str) -> ModesSnapshot {
        let esc = KeyBinding::new("esc", "⎋", "Back to Main", Category::Modes);
        ModesSnapshot {
            modes: vec![
                Mode::new("main", vec![KeyBinding::new("alt-s", "⌥ S", "Safari", Category::Apps)]),
                Mode::new("resize", vec![esc.clone()]),
                Mode::new("service", vec![esc]),
            ],
            current: current.to_string(),
            loaded_at: String::new(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn follows_mode_changes() {
        let (mut app, _rx) = new_test_app();
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        assert_eq!(app.shown_id(), "main");
        app.apply_event(DaemonEvent::ModeChanged { mode: "resize".into() });
        assert_eq!(app.shown_mode().unwrap().name, "Resize");
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let (mut app, _rx) = new_test_app();
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.shown_id(), "resize");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.shown_id(), "service");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.shown_id(), "main");
        assert!(app.pinned.is_none());
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.shown_id(), "service");
    }

    #[test]
    fn mode_change_clears_pin() {
        let (mut app, _rx) = new_test_app();
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.pinned.as_deref(), Some("resize"));
        app.apply_event(DaemonEvent::ModeChanged { mode: "service".into() });
        assert!(app.pinned.is_none());
        assert_eq!(app.shown_id(), "service");
    }

    #[test]
    fn reload_drops_vanished_pin() {
        let (mut app, _rx) = new_test_app();
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        app.pinned = Some("gone".into());
        app.apply_event(DaemonEvent::Reloaded(snapshot("main")));
        assert!(app.pinned.is_none());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn unknown_mode_shows_empty_sheet() {
        let (mut app, _rx) = new_test_app();
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        app.apply_event(DaemonEvent::ModeChanged { mode: "launcher".into() });
        let mode = app.shown_mode().unwrap();
        assert_eq!(mode.name, "Launcher");
        assert!(mode.bindings.is_empty());
    }

    #[test]
    fn hide_on_main_hides_only_main() {
        let (mut app, _rx) = new_test_app();
        app.hide_on_main = true;
        app.apply_event(DaemonEvent::Modes(snapshot("main")));
        assert!(app.shown_mode().is_none());
        app.handle_key(key(KeyCode::Tab));
        assert!(app.shown_mode().is_some());
        app.apply_event(DaemonEvent::ModeChanged { mode: "resize".into() });
        assert!(app.shown_mode().is_some());
    }

    #[test]
    fn keys_send_requests_and_quit() {
        let (mut app, mut rx) = new_test_app();
        app.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(rx.try_recv(), Ok(ClientRequest::Reload)));
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
