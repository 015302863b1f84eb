mod ipc_server;
mod session;
mod state;

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aerokeys_core::classify::Classifier;
use aerokeys_core::config::Settings;
use aerokeys_core::ipc::{daemon_pid_path, daemon_socket_path};
use aerokeys_core::paths::PathNamer;
use aerokeys_core::protocol::DaemonEvent;

fn check_pid_file(pid_path: &Path, socket_path: &Path) -> Result<(), String> {
    if pid_path.exists() {
        let content = fs::read_to_string(pid_path).unwrap_or_default();
        if let Ok(pid) = content.trim().parse::<i32>() {
            // Signal 0 only checks that the process exists.
            if unsafe { libc::kill(pid, 0) } == 0 {
                return Err(format!("Daemon already running (PID {pid})"));
            }
        }
        // Stale PID file, clean up
        let _ = fs::remove_file(pid_path);
        let _ = fs::remove_file(socket_path);
    }
    Ok(())
}

fn write_pid_file(pid_path: &Path) -> Result<(), String> {
    if let Some(parent) = pid_path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create dir: {e}"))?;
    }
    fs::write(pid_path, format!("{}", process::id()))
        .map_err(|e| format!("Failed to write PID file: {e}"))
}

fn cleanup_files(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AEROKEYS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn register_signal(kind: SignalKind) -> Signal {
    match signal(kind) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("aerokeysd: failed to register signal handler: {e}");
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let pid_path = daemon_pid_path();
    let socket_path = daemon_socket_path();

    // 1. PID file protocol
    if let Err(e) = check_pid_file(&pid_path, &socket_path) {
        eprintln!("aerokeysd: {e}");
        process::exit(1);
    }
    if let Err(e) = write_pid_file(&pid_path) {
        eprintln!("aerokeysd: {e}");
        process::exit(1);
    }
    let _ = fs::remove_file(&socket_path);

    // 2. Binding source and state
    let settings = Settings::load();
    let source = settings.mode_source();
    let mut daemon = state::Daemon::new(Arc::from(source), Classifier::new(PathNamer::from_env()));
    daemon.request_reload();

    // 3. Channels for IPC server <-> main loop
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<ipc_server::ServerCommand>();
    let (session_register_tx, mut session_register_rx) =
        mpsc::unbounded_channel::<(usize, mpsc::Sender<DaemonEvent>)>();
    let (session_unregister_tx, mut session_unregister_rx) = mpsc::unbounded_channel::<usize>();

    // 4. IPC server task
    let server_socket = socket_path.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) =
            ipc_server::run_server(server_socket, cmd_tx, session_register_tx, session_unregister_tx)
                .await
        {
            error!(error = %e, "IPC server error");
        }
    });

    // 5. Signals: HUP reloads, TERM/INT stop
    let mut sighup = register_signal(SignalKind::hangup());
    let mut sigterm = register_signal(SignalKind::terminate());
    let mut sigint = register_signal(SignalKind::interrupt());

    info!(pid = process::id(), socket = %socket_path.display(), "aerokeysd started");

    // 6. Main event loop
    loop {
        tokio::select! {
            // Registration first so a client's first request always has a session to answer
            biased;
            reg = session_register_rx.recv() => {
                if let Some((session_id, event_tx)) = reg {
                    daemon.sessions.add_session(session_id, event_tx);
                }
            }
            modes = daemon.reload_rx.recv() => {
                if let Some(modes) = modes {
                    daemon.apply_reload(modes);
                }
            }
            cmd = cmd_rx.recv() => {
                if let Some(cmd) = cmd {
                    if daemon.handle_request(cmd.request, cmd.session_id) {
                        info!("shutdown requested");
                        break;
                    }
                }
            }
            unreg = session_unregister_rx.recv() => {
                if let Some(session_id) = unreg {
                    daemon.sessions.remove_session(session_id);
                }
            }
            _ = sighup.recv() => {
                info!("received SIGHUP, reloading");
                daemon.request_reload();
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    server_handle.abort();
    cleanup_files(&pid_path, &socket_path);
    info!("aerokeysd stopped");
}
