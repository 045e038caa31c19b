//! Typed tracker events and the wire-frame constants.
//!
//! Events are a closed set of four kinds.  The two *edge* kinds
//! (pressed/released) fire only when the stylus button state changes; the
//! two *motion* kinds (moved/swayed) fire on every valid record.

// ── Wire constants ────────────────────────────────────────────────────────────

/// Size in bytes of an encoded pressed or released frame:
/// kind tag (1) + button (1) + timestamp (8).
pub const EDGE_FRAME_LEN: usize = 10;

/// Size in bytes of an encoded moved or swayed frame:
/// kind tag (1) + 3 × f64 (24) + timestamp (8).
pub const MOTION_FRAME_LEN: usize = 33;

/// Button identifier carried in edge frames.  The tracker's stylus exposes
/// a single button, numbered 0 on the wire.
pub const STYLUS_BUTTON: u8 = 0;

// ── Event kind tags ───────────────────────────────────────────────────────────

/// One-byte kind tag leading every encoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    Pressed = 0,
    Released = 1,
    Moved = 2,
    Swayed = 3,
}

impl TryFrom<u8> for EventKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(EventKind::Pressed),
            1 => Ok(EventKind::Released),
            2 => Ok(EventKind::Moved),
            3 => Ok(EventKind::Swayed),
            _ => Err(()),
        }
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// A single event emitted for one station.
///
/// The station index itself is not part of the event: subscribers are pinned
/// to exactly one station at registration time, so frames on a given
/// connection all belong to that station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    /// The stylus button went from released to pressed.
    Pressed { button: u8 },
    /// The stylus button went from pressed to released.
    Released { button: u8 },
    /// New position sample (x, y, z), in centimeters.
    Moved { position: [f64; 3] },
    /// New orientation sample (azimuth, elevation, roll), in degrees.
    Swayed { orientation: [f64; 3] },
}

impl TrackerEvent {
    /// Returns the kind tag for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            TrackerEvent::Pressed { .. } => EventKind::Pressed,
            TrackerEvent::Released { .. } => EventKind::Released,
            TrackerEvent::Moved { .. } => EventKind::Moved,
            TrackerEvent::Swayed { .. } => EventKind::Swayed,
        }
    }

    /// Returns the total encoded frame size for this event, including the
    /// kind tag and trailing timestamp.
    pub fn encoded_len(&self) -> usize {
        match self {
            TrackerEvent::Pressed { .. } | TrackerEvent::Released { .. } => EDGE_FRAME_LEN,
            TrackerEvent::Moved { .. } | TrackerEvent::Swayed { .. } => MOTION_FRAME_LEN,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_round_trips_through_u8() {
        for kind in [
            EventKind::Pressed,
            EventKind::Released,
            EventKind::Moved,
            EventKind::Swayed,
        ] {
            assert_eq!(EventKind::try_from(kind as u8), Ok(kind));
        }
    }

    #[test]
    fn test_event_kind_rejects_unknown_tag() {
        assert!(EventKind::try_from(4).is_err());
        assert!(EventKind::try_from(0xFF).is_err());
    }

    #[test]
    fn test_edge_events_encode_to_ten_bytes() {
        assert_eq!(TrackerEvent::Pressed { button: 0 }.encoded_len(), 10);
        assert_eq!(TrackerEvent::Released { button: 0 }.encoded_len(), 10);
    }

    #[test]
    fn test_motion_events_encode_to_thirty_three_bytes() {
        assert_eq!(
            TrackerEvent::Moved { position: [0.0; 3] }.encoded_len(),
            33
        );
        assert_eq!(
            TrackerEvent::Swayed { orientation: [0.0; 3] }.encoded_len(),
            33
        );
    }

    #[test]
    fn test_kind_tags_match_wire_values() {
        assert_eq!(TrackerEvent::Pressed { button: 0 }.kind() as u8, 0);
        assert_eq!(TrackerEvent::Released { button: 0 }.kind() as u8, 1);
        assert_eq!(TrackerEvent::Moved { position: [0.0; 3] }.kind() as u8, 2);
        assert_eq!(
            TrackerEvent::Swayed { orientation: [0.0; 3] }.kind() as u8,
            3
        );
    }
}
