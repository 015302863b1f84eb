//! One-shot IPC client: connect, send one request, read one reply.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use aerokeys_core::ipc;
use aerokeys_core::protocol::{ClientRequest, DaemonEvent};

const CONNECT_ERROR: &str = "Failed to connect to daemon. Is it running? Start with: aerokeysd";

/// Longest we wait for the daemon's answer. A reload can take a few
/// AeroSpace queries, each bounded by its own timeout.
const REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect to daemon, send a request, wait for the first response event.
pub async fn request(req: ClientRequest) -> Result<DaemonEvent, String> {
    tokio::time::timeout(REPLY_TIMEOUT, request_inner(req))
        .await
        .map_err(|_| "Timed out waiting for the daemon".to_string())?
}

async fn request_inner(req: ClientRequest) -> Result<DaemonEvent, String> {
    let socket_path = ipc::daemon_socket_path();
    let mut stream = tokio::net::UnixStream::connect(&socket_path)
        .await
        .map_err(|_| CONNECT_ERROR.to_string())?;

    let json = serde_json::to_vec(&req).map_err(|e| format!("Serialize error: {e}"))?;
    stream
        .write_all(&ipc::encode_frame(&json))
        .await
        .map_err(|e| format!("Write error: {e}"))?;
    stream
        .flush()
        .await
        .map_err(|e| format!("Flush error: {e}"))?;

    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| format!("Read error: {e}"))?;
    let len = ipc::frame_len(len_buf).map_err(|e| e.to_string())?;
    let mut payload = vec![0u8; len];
    stream
        .read_exact(&mut payload)
        .await
        .map_err(|e| format!("Read error: {e}"))?;

    serde_json::from_slice(&payload).map_err(|e| format!("Deserialize error: {e}"))
}

/// Run `request` on a fresh current-thread runtime.
pub fn request_blocking(req: ClientRequest) -> Result<DaemonEvent, String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;
    rt.block_on(request(req))
}
