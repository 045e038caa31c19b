//! Application layer: the two pipelines that make up the server.
//!
//! - **`pump`** – The device-side loop.  Runs on a dedicated OS thread
//!   because serial I/O blocks; polls the tracker, frames and validates
//!   records, and forwards dispatched events over a channel.  Depends on
//!   the [`TrackerLink`](crate::infrastructure::tracker_link::TrackerLink)
//!   trait, not on a concrete port, so the whole loop is testable with a
//!   scripted mock.
//!
//! - **`broadcast`** – The network-side stage.  A tokio task that drains
//!   the event channel, encodes each event into its wire frame, and hands
//!   it to the subscriber registry for fan-out.
//!
//! The channel between them is the only coupling: the pump never touches
//! sockets and the broadcast stage never touches the serial port.

pub mod broadcast;
pub mod pump;

pub use pump::{EventPump, StationEvent};
