//! # tracker-core
//!
//! Shared library for Tracker-Over-IP containing the device-side record
//! protocol and the subscriber-side wire codec.
//!
//! This crate is used by the server binary and by any Rust subscriber client.
//! It has zero dependencies on OS APIs, serial ports, or network sockets.
//!
//! # Architecture overview
//!
//! Tracker-Over-IP bridges a motion-tracking device ("tracker") to TCP
//! subscribers.  The tracker streams fixed-length binary records over a
//! serial-over-USB link; each record describes one sensor ("station"):
//! its position, orientation, and stylus button state.  Subscribers connect
//! over TCP, name the single station they care about with a one-byte
//! handshake, and then receive a push-only event stream.
//!
//! This crate defines the two protocol halves:
//!
//! - **`device`** – How bytes arrive from the hardware.  A bounded receive
//!   window ([`ReceiveBuffer`]) collects the noisy serial feed, records are
//!   validated against the frame invariants ([`parse_record`]), and the
//!   [`EventDispatcher`] turns valid records into ordered, typed events
//!   with button edge detection.
//!
//! - **`protocol`** – How events leave over the network.  Each
//!   [`TrackerEvent`] is encoded into a compact fixed-layout frame with a
//!   one-byte kind tag and a big-endian millisecond timestamp.  The layout
//!   is versionless and is the on-wire contract subscriber clients decode.

pub mod device;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tracker_core::TrackerEvent` instead of the full module path.
pub use device::dispatch::EventDispatcher;
pub use device::framer::{ReceiveBuffer, BUFFER_CAPACITY};
pub use device::record::{parse_record, RecordError, StationRecord, RECORD_LEN};
pub use protocol::codec::{decode_frame, encode_event, encode_event_now, ProtocolError};
pub use protocol::events::{EventKind, TrackerEvent};
