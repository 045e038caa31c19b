//! Device-side protocol: record framing, validation, and event dispatch.
//!
//! The tracker answers each ASCII poll command with one fixed-length binary
//! record per station.  The feed is noisy — records can arrive split across
//! reads or with garbage in between — so the pipeline here is:
//!
//! ```text
//! serial bytes → ReceiveBuffer → parse_record → EventDispatcher → events
//! ```
//!
//! Misaligned or corrupt windows are an ordinary outcome, handled by
//! discarding one leading byte at a time until the window realigns on a
//! true frame boundary.

pub mod dispatch;
pub mod framer;
pub mod record;

pub use dispatch::EventDispatcher;
pub use framer::{ReceiveBuffer, BUFFER_CAPACITY};
pub use record::{parse_record, RecordError, StationRecord, RECORD_LEN};
