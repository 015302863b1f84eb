use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use tracing::{debug, info, warn};

use aerokeys_core::ipc;
use aerokeys_core::protocol::{ClientRequest, DaemonEvent};

/// Command sent from a client handler to the main loop.
pub struct ServerCommand {
    pub session_id: usize,
    pub request: ClientRequest,
}

/// Per-client event buffer; a client that falls this far behind loses events.
const EVENT_BUFFER: usize = 64;

/// Read a length-delimited frame asynchronously.
async fn read_frame_async(
    reader: &mut (impl AsyncReadExt + Unpin),
) -> Result<Vec<u8>, std::io::Error> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = ipc::frame_len(len_buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Write a length-delimited frame asynchronously.
async fn write_frame_async(
    writer: &mut (impl AsyncWriteExt + Unpin),
    payload: &[u8],
) -> Result<(), std::io::Error> {
    writer.write_all(&ipc::encode_frame(payload)).await?;
    writer.flush().await?;
    Ok(())
}

/// Run the IPC server, accepting connections on the given socket path.
pub async fn run_server(
    socket_path: PathBuf,
    cmd_tx: mpsc::UnboundedSender<ServerCommand>,
    session_register_tx: mpsc::UnboundedSender<(usize, mpsc::Sender<DaemonEvent>)>,
    session_unregister_tx: mpsc::UnboundedSender<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = UnixListener::bind(&socket_path)?;
    info!(socket = %socket_path.display(), "IPC server listening");

    let mut next_session_id: usize = 1;

    loop {
        let (stream, _addr) = listener.accept().await?;
        let session_id = next_session_id;
        next_session_id += 1;
        debug!(session_id, "client connected");

        let cmd_tx = cmd_tx.clone();
        let session_register_tx = session_register_tx.clone();
        let session_unregister_tx = session_unregister_tx.clone();

        tokio::spawn(async move {
            handle_client(
                stream,
                session_id,
                cmd_tx,
                session_register_tx,
                session_unregister_tx,
            )
            .await;
        });
    }
}

async fn handle_client(
    stream: UnixStream,
    session_id: usize,
    cmd_tx: mpsc::UnboundedSender<ServerCommand>,
    session_register_tx: mpsc::UnboundedSender<(usize, mpsc::Sender<DaemonEvent>)>,
    session_unregister_tx: mpsc::UnboundedSender<usize>,
) {
    let (mut reader, mut writer) = tokio::io::split(stream);

    // Register before reading so replies to the first request have somewhere to go.
    let (event_tx, mut event_rx) = mpsc::channel::<DaemonEvent>(EVENT_BUFFER);
    if session_register_tx.send((session_id, event_tx)).is_err() {
        return;
    }

    let write_loop = async {
        while let Some(event) = event_rx.recv().await {
            let json = match serde_json::to_vec(&event) {
                Ok(j) => j,
                Err(e) => {
                    warn!(session_id, error = %e, "failed to serialize event");
                    continue;
                }
            };
            if write_frame_async(&mut writer, &json).await.is_err() {
                break;
            }
        }
    };

    let read_loop = async {
        loop {
            let payload = match read_frame_async(&mut reader).await {
                Ok(p) => p,
                Err(_) => break,
            };

            let request: ClientRequest = match serde_json::from_slice(&payload) {
                Ok(r) => r,
                Err(e) => {
                    warn!(session_id, error = %e, "invalid request from client");
                    continue;
                }
            };

            let is_shutdown = matches!(request, ClientRequest::Shutdown);
            if cmd_tx.send(ServerCommand { session_id, request }).is_err() {
                break;
            }
            if is_shutdown {
                break;
            }
        }
    };

    // Run both loops concurrently; when either finishes, clean up
    tokio::select! {
        _ = write_loop => {},
        _ = read_loop => {},
    }

    debug!(session_id, "client disconnected");
    let _ = session_unregister_tx.send(session_id);
}
