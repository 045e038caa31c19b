//! Broadcast stage: encodes events and fans them out.

use std::sync::Arc;

use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tracing::debug;

use tracker_core::encode_event_now;

use crate::application::StationEvent;
use crate::infrastructure::network::SubscriberRegistry;

/// Drains the event channel until it closes, stamping each event with
/// the current wall-clock time and fanning the frame out to the event's
/// station.
///
/// A single consumer task preserves per-station delivery order: events
/// leave the channel in pump order and each fan-out completes before the
/// next begins.
pub async fn run_broadcaster<S: AsyncWrite + Unpin + Send>(
    mut events: mpsc::Receiver<StationEvent>,
    registry: Arc<SubscriberRegistry<S>>,
) {
    while let Some(StationEvent { station, event }) = events.recv().await {
        let frame = encode_event_now(&event);
        registry.broadcast(station, &frame).await;
    }
    debug!("event channel closed; broadcast stage stopping");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
