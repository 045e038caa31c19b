//! Startup command sequence for the tracker.
//!
//! The tracker speaks a line-oriented ASCII command language (each
//! command terminated by a carriage return) but answers the poll command
//! with the fixed-layout binary records parsed by `tracker_core`.  This
//! module holds the canned commands and the two startup operations:
//! waiting for the device to come alive and configuring it for binary
//! polled output.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::infrastructure::tracker_link::{LinkError, TrackerLink};

/// Requests one binary record per station.  Sent once per pump cycle.
pub const POLL: &[u8] = b"P";

/// Bare carriage return; any response proves the device is listening.
const ATTENTION: &[u8] = b"\r";

/// Control-R: resets all stored reference frames.
const RESET_REFERENCE_FRAMES: &[u8] = &[0x12, b'*', b'\r'];

/// Tracks receivers on the negative-Z hemisphere of the source.
const SET_HEMISPHERE: &[u8] = b"H*,0,0,-1\r";

/// Zeroes the receiver rotation offsets.
const SET_ROTATION: &[u8] = b"G0,0,0\r";

/// Reports positions in centimetres.
const SET_UNITS_CM: &[u8] = b"U1\r";

/// Output list per station: position, Euler angles, stylus flag, CR/LF.
const SET_OUTPUT_LIST: &[u8] = b"O*,10,2,4,1\r";

/// Stylus button reported as a flag in the record, not as mouse input.
const SET_STYLUS_FLAG_MODE: &[u8] = b"L1,0\r";

/// Switches record output from ASCII to IEEE-754 binary.
const SET_BINARY_OUTPUT: &[u8] = b"F1\r";

/// Probes the tracker until it answers, or fails after `attempts` tries.
///
/// The device enumerates on USB well before its firmware starts
/// answering, so the first seconds after power-on look like a dead port.
/// Send and receive errors during the probe window are expected and are
/// retried, not propagated.
pub fn wait_for_device(
    link: &mut dyn TrackerLink,
    attempts: u32,
    retry_delay: Duration,
) -> Result<(), LinkError> {
    let mut scratch = [0u8; 512];
    for attempt in 1..=attempts {
        if link.send(ATTENTION).is_ok() {
            if let Ok(n) = link.receive(&mut scratch) {
                if n > 0 {
                    debug!(attempt, bytes = n, "tracker responded");
                    return Ok(());
                }
            }
        }
        trace!(attempt, "no response from tracker yet");
        std::thread::sleep(retry_delay);
    }
    Err(LinkError::NoResponse { attempts })
}

/// Configures the tracker for binary polled output.
///
/// `reference_frames` are forwarded verbatim as alignment commands (a
/// trailing carriage return is appended when missing).  The sequence
/// finishes with a single poll so the device leaves continuous mode
/// before the pump takes over.
pub fn initialize(
    link: &mut dyn TrackerLink,
    reference_frames: &[String],
) -> Result<(), LinkError> {
    info!("configuring tracker");

    link.send(RESET_REFERENCE_FRAMES)?;
    for frame in reference_frames {
        let mut command = frame.clone().into_bytes();
        if command.last() != Some(&b'\r') {
            command.push(b'\r');
        }
        link.send(&command)?;
    }

    link.send(SET_HEMISPHERE)?;
    link.send(SET_ROTATION)?;
    link.send(SET_UNITS_CM)?;
    link.send(SET_OUTPUT_LIST)?;
    link.send(SET_STYLUS_FLAG_MODE)?;
    link.send(SET_BINARY_OUTPUT)?;
    link.send(POLL)?;

    info!("tracker configured for binary polled output");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
