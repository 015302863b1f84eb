use tokio::sync::mpsc;
use tracing::warn;

use aerokeys_core::protocol::DaemonEvent;

pub struct ClientSession {
    pub id: usize,
    pub event_tx: mpsc::Sender<DaemonEvent>,
    pub subscribed: bool,
}

#[derive(Default)]
pub struct SessionManager {
    sessions: Vec<ClientSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client with the ID the IPC server assigned to it.
    pub fn add_session(&mut self, id: usize, event_tx: mpsc::Sender<DaemonEvent>) {
        self.sessions.push(ClientSession {
            id,
            event_tx,
            subscribed: false,
        });
    }

    pub fn remove_session(&mut self, id: usize) {
        self.sessions.retain(|s| s.id != id);
    }

    pub fn set_subscribed(&mut self, id: usize, subscribed: bool) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.subscribed = subscribed;
        }
    }

    pub fn is_subscribed(&self, id: usize) -> bool {
        self.sessions.iter().any(|s| s.id == id && s.subscribed)
    }

    /// Broadcast an event to all subscribed clients.
    /// Removes clients whose channels have disconnected; drops the event for
    /// clients whose channels are full.
    pub fn broadcast(&mut self, event: &DaemonEvent) {
        self.sessions.retain(|session| {
            if !session.subscribed {
                return true;
            }
            match session.event_tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(session_id = session.id, "event channel full, dropping event");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    /// Send an event to one client. Returns false if it is gone.
    pub fn send_to(&mut self, session_id: usize, event: DaemonEvent) -> bool {
        if let Some(pos) = self.sessions.iter().position(|s| s.id == session_id) {
            match self.sessions[pos].event_tx.try_send(event) {
                Ok(()) => return true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(session_id, "event channel full, dropping event");
                    return true;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.sessions.remove(pos);
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_session_drops_session() {
        let mut sm = SessionManager::new();
        let (tx, _rx) = mpsc::channel(16);
        sm.add_session(1, tx);
        assert_eq!(sm.len(), 1);
        sm.remove_session(1);
        assert_eq!(sm.len(), 0);
    }

    #[test]
    fn broadcast_only_sends_to_subscribed() {
        let mut sm = SessionManager::new();
        let (tx1, mut rx1) = mpsc::channel(16);
        let (tx2, mut rx2) = mpsc::channel(16);
        sm.add_session(1, tx1);
        sm.add_session(2, tx2);
        sm.set_subscribed(1, true);

        sm.broadcast(&DaemonEvent::Pong);

        assert!(matches!(rx1.try_recv(), Ok(DaemonEvent::Pong)));
        assert!(rx2.try_recv().is_err());
        assert!(sm.is_subscribed(1));
        assert!(!sm.is_subscribed(2));
    }

    #[test]
    fn broadcast_removes_closed_sessions() {
        let mut sm = SessionManager::new();
        let (tx, rx) = mpsc::channel(16);
        sm.add_session(1, tx);
        sm.set_subscribed(1, true);
        drop(rx);

        sm.broadcast(&DaemonEvent::Pong);
        assert_eq!(sm.len(), 0);
    }

    #[test]
    fn full_channel_keeps_session() {
        let mut sm = SessionManager::new();
        let (tx, mut rx) = mpsc::channel(1);
        sm.add_session(1, tx);
        assert!(sm.send_to(1, DaemonEvent::Pong));
        assert!(sm.send_to(1, DaemonEvent::Pong));
        assert_eq!(sm.len(), 1);
        assert!(matches!(rx.try_recv(), Ok(DaemonEvent::Pong)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_to_unknown_session() {
        let mut sm = SessionManager::new();
        assert!(!sm.send_to(42, DaemonEvent::Pong));
    }
}
