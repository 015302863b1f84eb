//! Commands that talk to a running `aerokeysd`.

use aerokeys_core::protocol::{ClientRequest, DaemonEvent, ModesSnapshot};

use crate::daemon_client::request_blocking;

/// Tell the daemon AeroSpace entered `mode`. Meant to be called from
/// `aerospace.toml`: `exec-and-forget aerokeys-cli notify resize`.
pub fn cmd_notify(args: &[String]) -> i32 {
    let Some(mode) = args.first().filter(|m| !m.trim().is_empty()) else {
        eprintln!("Usage: aerokeys-cli notify <mode>");
        return 1;
    };
    match request_blocking(ClientRequest::ModeChanged {
        mode: mode.trim().to_string(),
    }) {
        Ok(DaemonEvent::ModeChanged { .. }) => 0,
        Ok(other) => unexpected(other),
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

pub fn cmd_reload() -> i32 {
    match request_blocking(ClientRequest::Reload) {
        Ok(DaemonEvent::Reloaded(snapshot)) => {
            let count: usize = snapshot.modes.iter().map(|m| m.bindings.len()).sum();
            println!("Reloaded {} modes ({count} bindings)", snapshot.modes.len());
            0
        }
        Ok(other) => unexpected(other),
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

pub fn cmd_modes() -> i32 {
    with_snapshot(|snapshot| {
        if snapshot.modes.is_empty() {
            println!("No modes loaded.");
            return;
        }
        println!("{:<2} {:<16} {:<16} BINDINGS", "", "ID", "NAME");
        for mode in &snapshot.modes {
            let marker = if mode.id == snapshot.current { "*" } else { "" };
            println!(
                "{marker:<2} {:<16} {:<16} {}",
                mode.id,
                mode.name,
                mode.bindings.len()
            );
        }
    })
}

pub fn cmd_status() -> i32 {
    with_snapshot(|snapshot| {
        println!("Current mode: {}", snapshot.current);
        println!("Modes loaded: {}", snapshot.modes.len());
        if snapshot.loaded_at.is_empty() {
            println!("Loaded at:    (loading)");
        } else {
            println!("Loaded at:    {}", snapshot.loaded_at);
        }
    })
}

fn with_snapshot(print: impl FnOnce(&ModesSnapshot)) -> i32 {
    match request_blocking(ClientRequest::GetModes) {
        Ok(DaemonEvent::Modes(snapshot)) => {
            print(&snapshot);
            0
        }
        Ok(other) => unexpected(other),
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn unexpected(event: DaemonEvent) -> i32 {
    match event {
        DaemonEvent::Error { message } => eprintln!("Daemon error: {message}"),
        other => eprintln!("Unexpected reply from daemon: {other:?}"),
    }
    1
}
