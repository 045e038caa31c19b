//! Binary codec for subscriber-facing event frames.
//!
//! Wire format, per frame:
//! ```text
//! [kind:1][payload:1 or 24][timestamp_ms:8]
//! ```
//! Edge frames (pressed/released) carry a one-byte button identifier;
//! motion frames (moved/swayed) carry three f64 values.  All multi-byte
//! fields are big-endian regardless of host order.  The timestamp is
//! milliseconds since the Unix epoch, read at encode time.
//!
//! The layout is fixed and versionless — it is the on-wire contract
//! existing subscriber clients decode, and must not change.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::protocol::events::{EventKind, TrackerEvent, EDGE_FRAME_LEN, MOTION_FRAME_LEN};

/// Errors that can occur while decoding a frame.
///
/// Encoding is infallible: every [`TrackerEvent`] has exactly one encoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the frame its kind tag declares.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The leading kind tag is not a recognized value.
    #[error("unknown event kind: 0x{0:02X}")]
    UnknownEventKind(u8),
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes an event into its wire frame with the given timestamp.
///
/// The timestamp is normally taken from the system clock at encode time —
/// see [`encode_event_now`] — but is a parameter here so tests can pin it.
pub fn encode_event(event: &TrackerEvent, timestamp_ms: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(event.encoded_len());
    buf.push(event.kind() as u8);
    match event {
        TrackerEvent::Pressed { button } | TrackerEvent::Released { button } => {
            buf.push(*button);
        }
        TrackerEvent::Moved { position: values } | TrackerEvent::Swayed { orientation: values } => {
            for value in values {
                buf.extend_from_slice(&value.to_be_bytes());
            }
        }
    }
    buf.extend_from_slice(&timestamp_ms.to_be_bytes());
    buf
}

/// Encodes an event using the current system time as the timestamp.
///
/// Timestamps produced by one process are non-decreasing across successive
/// calls (the wall clock is read once per frame).
pub fn encode_event_now(event: &TrackerEvent) -> Vec<u8> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    encode_event(event, timestamp_ms)
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one frame from the beginning of `bytes`.
///
/// Returns the event, its timestamp, and the number of bytes consumed so
/// callers reading a stream can advance their cursor.  This is the
/// reference decoder for subscriber clients and for tests.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the kind tag is unknown or the slice is
/// shorter than the frame the tag declares.
pub fn decode_frame(bytes: &[u8]) -> Result<(TrackerEvent, u64, usize), ProtocolError> {
    let tag = *bytes.first().ok_or(ProtocolError::InsufficientData {
        needed: 1,
        available: 0,
    })?;
    let kind = EventKind::try_from(tag).map_err(|_| ProtocolError::UnknownEventKind(tag))?;

    let frame_len = match kind {
        EventKind::Pressed | EventKind::Released => EDGE_FRAME_LEN,
        EventKind::Moved | EventKind::Swayed => MOTION_FRAME_LEN,
    };
    if bytes.len() < frame_len {
        return Err(ProtocolError::InsufficientData {
            needed: frame_len,
            available: bytes.len(),
        });
    }

    let event = match kind {
        EventKind::Pressed => TrackerEvent::Pressed { button: bytes[1] },
        EventKind::Released => TrackerEvent::Released { button: bytes[1] },
        EventKind::Moved => TrackerEvent::Moved {
            position: read_f64_triple(&bytes[1..25]),
        },
        EventKind::Swayed => TrackerEvent::Swayed {
            orientation: read_f64_triple(&bytes[1..25]),
        },
    };

    let ts_off = frame_len - 8;
    let timestamp_ms = u64::from_be_bytes(
        bytes[ts_off..frame_len]
            .try_into()
            .expect("timestamp slice is exactly 8 bytes"),
    );
    Ok((event, timestamp_ms, frame_len))
}

fn read_f64_triple(bytes: &[u8]) -> [f64; 3] {
    let mut values = [0.0; 3];
    for (i, value) in values.iter_mut().enumerate() {
        *value = f64::from_be_bytes(
            bytes[i * 8..i * 8 + 8]
                .try_into()
                .expect("f64 slice is exactly 8 bytes"),
        );
    }
    values
}

// ── Tests ─────────────────────────────────────────────────────────────────────
