//! Native-host transport helpers: length-prefixed envelope frames over
//! `Read`/`Write`, plus an async stdio loop for hosts that run as a
//! separate process.
//!
//! The frame is a 4-byte native-endian `u32` length followed by that many
//! bytes of UTF-8 envelope JSON. Whatever feeds decoded messages onward
//! must preserve arrival order; the sequential loop here does.

use std::io::{self, Read, Write};

use crate::envelope;
use crate::message::Message;

/// Size cap for outbound frames (bridge -> host).
pub const MAX_OUTBOUND: usize = 1_048_576; // 1 MB
/// Size cap for inbound frames (host -> bridge).
pub const MAX_INBOUND: usize = 64 * 1_048_576; // 64 MB

#[inline]
fn read_exact_u32_len<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    Ok(u32::from_ne_bytes(len_buf))
}

/// Encode a message into a frame: 4-byte native-endian length + envelope
/// JSON bytes.
pub fn encode_frame(message: &Message) -> io::Result<Vec<u8>> {
    let json = envelope::encode(message).into_bytes();
    if json.len() > MAX_OUTBOUND {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "outgoing message exceeds 1MB",
        ));
    }
    let mut out = Vec::with_capacity(4 + json.len());
    out.extend_from_slice(&(json.len() as u32).to_ne_bytes());
    out.extend_from_slice(&json);
    Ok(out)
}

/// Read one framed envelope from a reader as raw text (useful in tests).
pub fn read_frame<R: Read>(reader: &mut R, max_size: usize) -> io::Result<String> {
    let len = read_exact_u32_len(&mut *reader)? as usize;
    let cap = max_size.min(MAX_INBOUND);
    if len > cap {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "incoming message too large",
        ));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Read one frame and decode its envelope.
///
/// I/O and framing failures surface as errors; a frame that arrives intact
/// but holds a malformed envelope yields `Ok(None)` (logged and discarded,
/// per the envelope contract).
pub fn read_message<R: Read>(reader: &mut R, max_size: usize) -> io::Result<Option<Message>> {
    let raw = read_frame(reader, max_size)?;
    Ok(envelope::decode(&raw))
}

/// Read one framed message from stdin. Returns `Ok(None)` for an intact
/// frame carrying a malformed envelope.
#[cfg(feature = "tokio")]
pub async fn get_message() -> io::Result<Option<Message>> {
    tokio::task::spawn_blocking(move || {
        let mut stdin = io::stdin();
        read_message(&mut stdin, MAX_INBOUND)
    })
    .await
    .unwrap()
}

/// Write one framed message to stdout and flush.
///
/// stdout is reserved for frames; log to stderr or a file, never stdout.
#[cfg(feature = "tokio")]
pub async fn send_message(message: &Message) -> io::Result<()> {
    let frame = encode_frame(message)?;
    tokio::task::spawn_blocking(move || {
        let mut stdout = io::stdout();
        stdout.write_all(&frame)?;
        stdout.flush()?;
        Ok(())
    })
    .await
    .unwrap()
}

/// Run a host loop over stdin: frames are read sequentially, malformed
/// envelopes are skipped, and each decoded message is handed to `handler`
/// in arrival order. Returns when the reader errors (EOF from the embedder
/// is the normal shutdown path).
#[cfg(feature = "tokio")]
pub async fn event_loop<F, Fut>(mut handler: F) -> io::Result<()>
where
    F: FnMut(Message) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = io::Result<()>> + Send + 'static,
{
    loop {
        if let Some(message) = get_message().await? {
            handler(message).await?;
        }
    }
}
