//! Device pump: the blocking poll/frame/dispatch loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, trace, warn};

use tracker_core::{parse_record, EventDispatcher, ReceiveBuffer, TrackerEvent, BUFFER_CAPACITY};

use crate::infrastructure::tracker_link::{commands, TrackerLink};

/// A dispatched event tagged with the station it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEvent {
    pub station: usize,
    pub event: TrackerEvent,
}

/// Polls the tracker and feeds dispatched events into the broadcast
/// channel.
///
/// Runs on a dedicated OS thread because the link blocks.  Each cycle
/// does exactly one thing: poll the device when no complete record is
/// buffered, otherwise consume (or resynchronize past) the leading
/// record.  Keeping the cycle single-purpose bounds the time between
/// checks of the shutdown flag to one serial timeout.
pub struct EventPump<L: TrackerLink> {
    link: L,
    buffer: ReceiveBuffer,
    dispatcher: EventDispatcher,
    station_count: u8,
    events: mpsc::Sender<StationEvent>,
    running: Arc<AtomicBool>,
}

impl<L: TrackerLink> EventPump<L> {
    pub fn new(
        link: L,
        station_count: u8,
        events: mpsc::Sender<StationEvent>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            link,
            buffer: ReceiveBuffer::new(),
            dispatcher: EventDispatcher::new(usize::from(station_count)),
            station_count,
            events,
            running,
        }
    }

    /// Loops until the shutdown flag clears or the event channel closes.
    pub fn run(mut self) {
        info!("device pump started");
        while self.running.load(Ordering::Relaxed) {
            self.step();
        }
        info!("device pump stopped");
    }

    /// One pump cycle; public so tests can drive the loop by hand.
    pub fn step(&mut self) {
        if self.buffer.has_full_record() {
            self.consume_leading_record();
        } else {
            self.poll_device();
        }
    }

    fn consume_leading_record(&mut self) {
        match parse_record(self.buffer.window(), self.station_count) {
            Ok(record) => {
                let station = record.station_index();
                for event in self.dispatcher.dispatch(&record) {
                    if self
                        .events
                        .blocking_send(StationEvent { station, event })
                        .is_err()
                    {
                        // Broadcast stage is gone; nothing left to pump for.
                        warn!("event channel closed; stopping device pump");
                        self.running.store(false, Ordering::Relaxed);
                        return;
                    }
                }
                self.buffer.consume_record();
            }
            Err(e) => {
                trace!(error = %e, "rejected leading window; resynchronizing");
                self.buffer.drop_leading_byte();
            }
        }
    }

    fn poll_device(&mut self) {
        if let Err(e) = self.link.send(commands::POLL) {
            warn!(error = %e, "tracker poll failed");
            return;
        }
        let mut scratch = [0u8; BUFFER_CAPACITY];
        let vacancy = self.buffer.vacancy();
        match self.link.receive(&mut scratch[..vacancy]) {
            Ok(0) => {}
            Ok(n) => self.buffer.extend(&scratch[..n]),
            Err(e) => warn!(error = %e, "tracker read failed"),
        }
    }
}
