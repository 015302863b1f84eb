//! IPC protocol message types for daemon <-> TUI/CLI communication.

use serde::{Deserialize, Serialize};

use crate::model::Mode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// Reply with the current snapshot.
    GetModes,
    GetCurrentMode,
    /// AeroSpace switched modes.
    ModeChanged {
        mode: String,
    },
    /// Re-query the window manager and replace the snapshot.
    Reload,
    Subscribe,
    Unsubscribe,
    Ping,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DaemonEvent {
    Modes(ModesSnapshot),
    CurrentMode {
        mode: String,
    },
    ModeChanged {
        mode: String,
    },
    Reloaded(ModesSnapshot),
    Subscribed,
    Unsubscribed,
    Pong,
    Error {
        message: String,
    },
}

/// Everything a display client needs to draw the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModesSnapshot {
    pub modes: Vec<Mode>,
    pub current: String,
    /// RFC 3339 timestamp of the load that produced `modes`.
    pub loaded_at: String,
}

impl ModesSnapshot {
    pub fn mode(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn current_mode(&self) -> Option<&Mode> {
        self.mode(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, KeyBinding};

    #[test]
    fn requests_are_tagged() {
        let json = serde_json::to_string(&ClientRequest::ModeChanged { mode: "resize".into() }).unwrap();
        assert_eq!(json, r#"{"type":"ModeChanged","mode":"resize"}"#);
        let back: ClientRequest = serde_json::from_str(r#"{"type":"Reload"}"#).unwrap();
        assert_eq!(back, ClientRequest::Reload);
    }

    #[test]
    fn snapshot_lookup() {
        let snapshot = ModesSnapshot {
            modes: vec![Mode {
                id: "main".into(),
                name: "Main".into(),
                bindings: vec![KeyBinding::new("alt-h", "⌥ H", "Focus Left", Category::Focus)],
            }],
            current: "main".into(),
            loaded_at: "2026-01-01T00:00:00+00:00".into(),
        };
        assert_eq!(snapshot.current_mode().map(|m| m.name.as_str()), Some("Main"));
        assert!(snapshot.mode("resize").is_none());

        let event = DaemonEvent::Reloaded(snapshot.clone());
        let json = serde_json::to_string(&event).unwrap();
        let back: DaemonEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
