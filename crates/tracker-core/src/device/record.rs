//! Parsing and validation of the tracker's fixed-length device records.
//!
//! The tracker answers each poll with one 38-byte binary record per
//! station.  The device protocol is little-endian.  Layout:
//!
//! ```text
//! off  len  field
//!   0    2  sync header, u16 LE  == 0x594C (ASCII "LY")
//!   2    1  station number       1-based
//!   3    1  command tag          == b'P'
//!   4    1  error byte           informational
//!   5    1  reserved
//!   6    2  body size, i16 LE    informational
//!   8    4  button flag, i32 LE  0 or 1
//!  12   24  6 × f32 LE           x, y, z, azimuth, elevation, roll
//!  36    2  terminator           CR LF
//! ```
//!
//! A window that fails any invariant is an ordinary, expected outcome of
//! stream noise or misalignment — the framer resynchronizes by dropping a
//! byte — so rejection is a typed error, never a panic.

use thiserror::Error;

/// Size in bytes of one device record.
pub const RECORD_LEN: usize = 38;

/// Expected sync header, little-endian u16 over the leading "LY" bytes.
pub const SYNC_HEADER: u16 = 0x594C;

/// Command tag for position/orientation records.
pub const COMMAND_TAG: u8 = b'P';

const TERMINATOR_CR: u8 = 0x0D;
const TERMINATOR_LF: u8 = 0x0A;

/// Reasons a candidate window is not a valid record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The window holds fewer than [`RECORD_LEN`] bytes.
    #[error("truncated window: need {RECORD_LEN} bytes, got {available}")]
    Truncated { available: usize },

    /// The leading two bytes are not the sync header.
    #[error("bad sync header: 0x{0:04X}")]
    BadSyncHeader(u16),

    /// The station number is outside `[1, station_count]`.
    #[error("station number {station} out of range (1..={station_count})")]
    StationOutOfRange { station: u8, station_count: u8 },

    /// The command tag is not [`COMMAND_TAG`].
    #[error("bad command tag: 0x{0:02X}")]
    BadCommandTag(u8),

    /// The button flag is neither 0 nor 1.
    #[error("bad button flag: {0}")]
    BadButtonFlag(i32),

    /// The trailing two bytes are not CR LF.
    #[error("bad terminator: 0x{cr:02X} 0x{lf:02X}")]
    BadTerminator { cr: u8, lf: u8 },
}

/// One validated device record.
///
/// Transient: exists only between validation of a buffer window and the
/// dispatch of its events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRecord {
    /// 1-based station number, within `[1, station_count]`.
    pub station: u8,
    /// Device-reported error byte, passed through unvalidated.
    pub error_byte: u8,
    /// Declared body size, passed through unvalidated.
    pub body_size: i16,
    /// Stylus button state.
    pub button_pressed: bool,
    /// Position sample (x, y, z), in centimeters.
    pub position: [f32; 3],
    /// Orientation sample (azimuth, elevation, roll), in degrees.
    pub orientation: [f32; 3],
}

impl StationRecord {
    /// Zero-based station index, `station - 1`.
    pub fn station_index(&self) -> usize {
        usize::from(self.station) - 1
    }
}

/// Validates the leading [`RECORD_LEN`] bytes of `window` and parses them
/// into a [`StationRecord`].
///
/// # Errors
///
/// Returns the first violated invariant as a [`RecordError`].  Checks run
/// in wire order: sync header, station range, command tag, button flag,
/// terminator.
pub fn parse_record(window: &[u8], station_count: u8) -> Result<StationRecord, RecordError> {
    if window.len() < RECORD_LEN {
        return Err(RecordError::Truncated {
            available: window.len(),
        });
    }

    let header = u16::from_le_bytes([window[0], window[1]]);
    if header != SYNC_HEADER {
        return Err(RecordError::BadSyncHeader(header));
    }

    let station = window[2];
    if station < 1 || station > station_count {
        return Err(RecordError::StationOutOfRange {
            station,
            station_count,
        });
    }

    let command = window[3];
    if command != COMMAND_TAG {
        return Err(RecordError::BadCommandTag(command));
    }

    let button = i32::from_le_bytes([window[8], window[9], window[10], window[11]]);
    if button != 0 && button != 1 {
        return Err(RecordError::BadButtonFlag(button));
    }

    let (cr, lf) = (window[36], window[37]);
    if cr != TERMINATOR_CR || lf != TERMINATOR_LF {
        return Err(RecordError::BadTerminator { cr, lf });
    }

    let mut values = [0.0f32; 6];
    for (i, value) in values.iter_mut().enumerate() {
        let off = 12 + i * 4;
        *value = f32::from_le_bytes([
            window[off],
            window[off + 1],
            window[off + 2],
            window[off + 3],
        ]);
    }

    Ok(StationRecord {
        station,
        error_byte: window[4],
        body_size: i16::from_le_bytes([window[6], window[7]]),
        button_pressed: button == 1,
        position: [values[0], values[1], values[2]],
        orientation: [values[3], values[4], values[5]],
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a valid 38-byte record for the given station/button/values.
    pub(crate) fn make_record(station: u8, button: i32, values: [f32; 6]) -> [u8; RECORD_LEN] {
        let mut rec = [0u8; RECORD_LEN];
        rec[0] = b'L';
        rec[1] = b'Y';
        rec[2] = station;
        rec[3] = COMMAND_TAG;
        rec[4] = 0; // error byte
        rec[5] = 0; // reserved
        rec[6..8].copy_from_slice(&28i16.to_le_bytes());
        rec[8..12].copy_from_slice(&button.to_le_bytes());
        for (i, value) in values.iter().enumerate() {
            let off = 12 + i * 4;
            rec[off..off + 4].copy_from_slice(&value.to_le_bytes());
        }
        rec[36] = 0x0D;
        rec[37] = 0x0A;
        rec
    }

    const STATION_COUNT: u8 = 10;

    #[test]
    fn test_valid_record_parses_all_fields() {
        let raw = make_record(3, 1, [1.0, 2.0, 3.0, -10.0, 0.5, 90.0]);

        let record = parse_record(&raw, STATION_COUNT).expect("record must be valid");

        assert_eq!(record.station, 3);
        assert_eq!(record.station_index(), 2);
        assert!(record.button_pressed);
        assert_eq!(record.position, [1.0, 2.0, 3.0]);
        assert_eq!(record.orientation, [-10.0, 0.5, 90.0]);
        assert_eq!(record.body_size, 28);
    }

    #[test]
    fn test_truncated_window_is_rejected() {
        let raw = make_record(1, 0, [0.0; 6]);
        assert_eq!(
            parse_record(&raw[..37], STATION_COUNT),
            Err(RecordError::Truncated { available: 37 })
        );
    }

    #[test]
    fn test_bad_sync_header_is_rejected() {
        let mut raw = make_record(1, 0, [0.0; 6]);
        raw[0] = b'X';
        assert!(matches!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::BadSyncHeader(_))
        ));
    }

    #[test]
    fn test_station_zero_is_rejected() {
        let raw = make_record(0, 0, [0.0; 6]);
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::StationOutOfRange {
                station: 0,
                station_count: STATION_COUNT
            })
        );
    }

    #[test]
    fn test_station_above_count_is_rejected() {
        let raw = make_record(11, 0, [0.0; 6]);
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::StationOutOfRange {
                station: 11,
                station_count: STATION_COUNT
            })
        );
    }

    #[test]
    fn test_station_at_count_boundary_is_accepted() {
        let raw = make_record(STATION_COUNT, 0, [0.0; 6]);
        assert!(parse_record(&raw, STATION_COUNT).is_ok());
    }

    #[test]
    fn test_wrong_command_tag_is_rejected() {
        let mut raw = make_record(1, 0, [0.0; 6]);
        raw[3] = b'Q';
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::BadCommandTag(b'Q'))
        );
    }

    #[test]
    fn test_button_flag_outside_zero_one_is_rejected() {
        let raw = make_record(1, 2, [0.0; 6]);
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::BadButtonFlag(2))
        );

        let raw = make_record(1, -1, [0.0; 6]);
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::BadButtonFlag(-1))
        );
    }

    #[test]
    fn test_bad_terminator_is_rejected() {
        let mut raw = make_record(1, 0, [0.0; 6]);
        raw[37] = 0x00;
        assert_eq!(
            parse_record(&raw, STATION_COUNT),
            Err(RecordError::BadTerminator { cr: 0x0D, lf: 0x00 })
        );
    }

    #[test]
    fn test_all_zero_window_is_rejected_not_panicked() {
        let raw = [0u8; RECORD_LEN];
        assert!(parse_record(&raw, STATION_COUNT).is_err());
    }
}
