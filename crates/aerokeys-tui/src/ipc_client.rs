//! Long-lived daemon connection for the viewer.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::mpsc;

use aerokeys_core::ipc;
use aerokeys_core::protocol::{ClientRequest, DaemonEvent};

pub enum DaemonMessage {
    Event(Box<DaemonEvent>),
    /// The connection to the daemon was lost.
    Disconnected,
}

pub type Requests = mpsc::UnboundedSender<ClientRequest>;
pub type Messages = mpsc::UnboundedReceiver<DaemonMessage>;

/// Connect, subscribe to mode changes and ask for the current modes.
///
/// The first messages on the returned receiver are `Subscribed` and the
/// `Modes` snapshot; mode switches and reloads follow as they happen.
pub async fn subscribe() -> io::Result<(Requests, Messages)> {
    let stream = UnixStream::connect(ipc::daemon_socket_path()).await?;
    let (reader, writer) = tokio::io::split(stream);

    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();

    for req in [ClientRequest::Subscribe, ClientRequest::GetModes] {
        let _ = req_tx.send(req);
    }
    tokio::spawn(write_loop(writer, req_rx));
    tokio::spawn(read_loop(reader, msg_tx));

    Ok((req_tx, msg_rx))
}

async fn write_loop(
    mut writer: impl AsyncWrite + Unpin,
    mut req_rx: mpsc::UnboundedReceiver<ClientRequest>,
) {
    while let Some(req) = req_rx.recv().await {
        let Ok(json) = serde_json::to_vec(&req) else {
            continue;
        };
        if writer.write_all(&ipc::encode_frame(&json)).await.is_err()
            || writer.flush().await.is_err()
        {
            break;
        }
    }
}

async fn read_loop(mut reader: impl AsyncRead + Unpin, msg_tx: mpsc::UnboundedSender<DaemonMessage>) {
    loop {
        match read_event(&mut reader).await {
            Ok(Some(event)) => {
                if msg_tx.send(DaemonMessage::Event(Box::new(event))).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(_) => {
                let _ = msg_tx.send(DaemonMessage::Disconnected);
                return;
            }
        }
    }
}

/// Read one frame. `Ok(None)` is a well-formed frame this client does not
/// understand, e.g. an event added by a newer daemon.
async fn read_event(reader: &mut (impl AsyncRead + Unpin)) -> io::Result<Option<DaemonEvent>> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header).await?;
    let len = ipc::frame_len(header)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(serde_json::from_slice(&payload).ok())
}
