//! Wire framing and socket path resolution for IPC.

use std::io::{self, Read};
use std::path::PathBuf;

/// Default daemon socket path: `~/.local/share/aerokeys/daemon.sock`
pub fn daemon_socket_path() -> PathBuf {
    crate::config::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp/aerokeys"))
        .join("daemon.sock")
}

/// Default daemon PID file path: `~/.local/share/aerokeys/daemon.pid`
pub fn daemon_pid_path() -> PathBuf {
    crate::config::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp/aerokeys"))
        .join("daemon.pid")
}

/// Maximum frame payload size (1 MiB). A full mode snapshot is a few KiB.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

#[derive(Debug)]
pub enum FrameError {
    Io(io::Error),
    TooLarge(usize),
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "IO error: {e}"),
            FrameError::TooLarge(n) => write!(f, "Frame too large: {n} bytes"),
        }
    }
}

/// Encode: 4-byte big-endian length + payload.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode the length header, rejecting oversized frames.
pub fn frame_len(header: [u8; 4]) -> Result<usize, FrameError> {
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge(len));
    }
    Ok(len)
}

/// Decode one frame from a reader. Returns payload bytes.
pub fn decode_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>, FrameError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = frame_len(len_buf)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_carries_json() {
        let encoded = encode_frame(br#"{"type":"Ping"}"#);
        assert_eq!(&encoded[..4], &15u32.to_be_bytes());
        let decoded = decode_frame(&mut Cursor::new(encoded)).unwrap();
        assert_eq!(decoded, br#"{"type":"Ping"}"#);
    }

    #[test]
    fn empty_frame() {
        let encoded = encode_frame(b"");
        let mut cursor = Cursor::new(encoded);
        let decoded = decode_frame(&mut cursor).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn too_large_frame() {
        let len = (MAX_FRAME_SIZE + 1) as u32;
        let mut cursor = Cursor::new(len.to_be_bytes().to_vec());
        assert!(matches!(
            decode_frame(&mut cursor),
            Err(FrameError::TooLarge(_))
        ));
    }

    #[test]
    fn truncated_frame_is_io_error() {
        let mut bytes = encode_frame(b"hello");
        bytes.truncate(6);
        assert!(matches!(
            decode_frame(&mut Cursor::new(bytes)),
            Err(FrameError::Io(_))
        ));
    }
}
