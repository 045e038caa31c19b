//! Outbound protocol module: typed events and the binary frame codec.

pub mod codec;
pub mod events;

pub use codec::{decode_frame, encode_event, encode_event_now, ProtocolError};
pub use events::*;
