//! Turns validated records into ordered, typed events.
//!
//! The dispatcher is the only stateful stage of the device pipeline: it
//! remembers each station's last button flag so the edge events
//! (pressed/released) fire exactly once per state change, while the motion
//! events (moved/swayed) fire on every valid record.

use tracing::trace;

use crate::device::record::StationRecord;
use crate::protocol::events::{TrackerEvent, STYLUS_BUTTON};

/// Per-station button edge detection and event ordering.
///
/// Emission order per record is fixed: pressed/released (edge only), then
/// moved, then swayed.  Subscribers rely on this order matching record
/// arrival order.
#[derive(Debug)]
pub struct EventDispatcher {
    /// Last observed button flag per station index.
    ///
    /// `None` until a station's first record and compared as "released":
    /// a station first seen unpressed emits no spurious edge, while a
    /// station first seen pressed still emits its press edge.
    last_button: Vec<Option<bool>>,
}

impl EventDispatcher {
    /// Creates a dispatcher for `station_count` stations.
    pub fn new(station_count: usize) -> Self {
        Self {
            last_button: vec![None; station_count],
        }
    }

    /// Number of stations this dispatcher tracks.
    pub fn station_count(&self) -> usize {
        self.last_button.len()
    }

    /// Produces the events for one validated record, in emission order.
    ///
    /// # Panics
    ///
    /// Panics if the record's station index is out of range.  Validation
    /// guarantees the range, so reaching here with a bad index is an
    /// internal defect: fail fast rather than drop it silently.
    pub fn dispatch(&mut self, record: &StationRecord) -> Vec<TrackerEvent> {
        let index = record.station_index();
        let previous = self.last_button[index].unwrap_or(false);

        let mut events = Vec::with_capacity(3);
        if previous != record.button_pressed {
            let edge = if record.button_pressed {
                TrackerEvent::Pressed { button: STYLUS_BUTTON }
            } else {
                TrackerEvent::Released { button: STYLUS_BUTTON }
            };
            trace!(station = index, pressed = record.button_pressed, "button edge");
            events.push(edge);
        }
        self.last_button[index] = Some(record.button_pressed);

        events.push(TrackerEvent::Moved {
            position: [
                f64::from(record.position[0]),
                f64::from(record.position[1]),
                f64::from(record.position[2]),
            ],
        });
        events.push(TrackerEvent::Swayed {
            orientation: [
                f64::from(record.orientation[0]),
                f64::from(record.orientation[1]),
                f64::from(record.orientation[2]),
            ],
        });
        events
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
