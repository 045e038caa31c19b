//! Per-station subscriber sets with exclusive-fanout delivery.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Holds one subscriber set per station.
///
/// Each set sits behind its own async [`Mutex`], so registration and
/// fan-out for the same station are serialized while different stations
/// proceed independently.  Generic over the stream type so tests can
/// use in-memory duplex pipes instead of sockets.
pub struct SubscriberRegistry<S = TcpStream> {
    stations: Vec<Mutex<Vec<S>>>,
}

impl<S: AsyncWrite + Unpin + Send> SubscriberRegistry<S> {
    pub fn new(station_count: usize) -> Self {
        let stations = (0..station_count).map(|_| Mutex::new(Vec::new())).collect();
        Self { stations }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Adds `stream` to the subscriber set of `station`.
    ///
    /// Panics if `station` is out of range; the multiplexer validates
    /// selection bytes before calling this.
    pub async fn register(&self, station: usize, stream: S) {
        let mut subscribers = self.stations[station].lock().await;
        subscribers.push(stream);
        debug!(station, count = subscribers.len(), "subscriber added");
    }

    pub async fn subscriber_count(&self, station: usize) -> usize {
        self.stations[station].lock().await.len()
    }

    /// Writes `frame` to every subscriber of `station`.
    ///
    /// A subscriber whose write fails is removed on the spot; the frame
    /// still reaches every remaining subscriber.  Removal swaps the last
    /// element into the vacated slot, so the index is not advanced after
    /// a removal — the swapped-in subscriber gets the frame next.
    pub async fn broadcast(&self, station: usize, frame: &[u8]) {
        let mut subscribers = self.stations[station].lock().await;
        let mut i = 0;
        while i < subscribers.len() {
            match subscribers[i].write_all(frame).await {
                Ok(()) => i += 1,
                Err(e) => {
                    warn!(station, error = %e, "dropping subscriber after failed write");
                    subscribers.swap_remove(i);
                }
            }
        }
    }

    /// Drops every subscriber, closing the underlying connections.
    pub async fn close_all(&self) {
        for (station, set) in self.stations.iter().enumerate() {
            let mut subscribers = set.lock().await;
            if !subscribers.is_empty() {
                debug!(station, count = subscribers.len(), "closing subscribers");
            }
            subscribers.clear();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, DuplexStream};

    fn registry() -> SubscriberRegistry<DuplexStream> {
        SubscriberRegistry::new(10)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_registered_subscriber() {
        // Arrange
        let registry = registry();
        let (tx, mut rx) = duplex(64);
        registry.register(3, tx).await;

        // Act
        registry.broadcast(3, b"hello").await;

        // Assert
        let mut buf = [0u8; 5];
        rx.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[tokio::test]
    async fn test_broadcast_is_scoped_to_one_station() {
        let registry = registry();
        let (tx_a, mut rx_a) = duplex(64);
        let (tx_b, mut rx_b) = duplex(64);
        registry.register(0, tx_a).await;
        registry.register(1, tx_b).await;

        registry.broadcast(0, b"x").await;
        drop(registry);

        let mut buf = [0u8; 1];
        rx_a.read_exact(&mut buf).await.unwrap();
        // Station 1 must see only EOF from the dropped registry.
        assert_eq!(rx_b.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_subscriber_removed_and_others_still_served() {
        let registry = registry();
        let (tx_dead, rx_dead) = duplex(64);
        let (tx_live, mut rx_live) = duplex(64);
        registry.register(5, tx_dead).await;
        registry.register(5, tx_live).await;
        // Closing the read half makes writes to tx_dead fail.
        drop(rx_dead);

        registry.broadcast(5, b"frame").await;

        assert_eq!(registry.subscriber_count(5).await, 1);
        let mut buf = [0u8; 5];
        rx_live.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"frame");
    }

    #[tokio::test]
    async fn test_close_all_empties_every_station() {
        let registry = registry();
        let (tx_a, _rx_a) = duplex(64);
        let (tx_b, _rx_b) = duplex(64);
        registry.register(0, tx_a).await;
        registry.register(9, tx_b).await;

        registry.close_all().await;

        assert_eq!(registry.subscriber_count(0).await, 0);
        assert_eq!(registry.subscriber_count(9).await, 0);
    }

    #[tokio::test]
    #[should_panic]
    async fn test_register_out_of_range_station_panics() {
        let registry = registry();
        let (tx, _rx) = duplex(64);
        registry.register(10, tx).await;
    }
}
