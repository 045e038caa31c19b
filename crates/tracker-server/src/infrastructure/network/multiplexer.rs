//! Accept loop and station-selection handshake.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::infrastructure::network::SubscriberRegistry;

/// Accepts TCP connections and runs the one-byte station handshake.
///
/// Each accepted connection is parked in a [`JoinSet`] until its
/// selection byte arrives, so a client that connects and then stalls
/// never blocks the accept loop or other handshakes.
pub struct ConnectionMultiplexer {
    listener: TcpListener,
    registry: Arc<SubscriberRegistry>,
    station_count: u8,
}

impl ConnectionMultiplexer {
    pub fn new(
        listener: TcpListener,
        registry: Arc<SubscriberRegistry>,
        station_count: u8,
    ) -> Self {
        Self {
            listener,
            registry,
            station_count,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs until `shutdown` fires.  Pending handshakes are aborted on
    /// the way out; registered subscribers are left to the registry.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut pending = JoinSet::new();
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        debug!(%addr, "connection accepted; awaiting station selection");
                        let registry = Arc::clone(&self.registry);
                        let station_count = self.station_count;
                        pending.spawn(handshake(stream, addr, registry, station_count));
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                },
                Some(_) = pending.join_next(), if !pending.is_empty() => {}
                _ = shutdown.changed() => break,
            }
        }
        pending.shutdown().await;
        info!("connection multiplexer stopped");
    }
}

/// Reads the selection byte and registers the stream, or drops it.
async fn handshake(
    mut stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<SubscriberRegistry>,
    station_count: u8,
) {
    let mut selection = [0u8; 1];
    match stream.read_exact(&mut selection).await {
        Ok(_) if selection[0] < station_count => {
            let station = usize::from(selection[0]);
            registry.register(station, stream).await;
            info!(%addr, station, "subscriber registered");
        }
        Ok(_) => {
            warn!(
                %addr,
                selection = selection[0],
                station_count,
                "station selection out of range; dropping connection"
            );
        }
        Err(e) => debug!(%addr, error = %e, "connection closed before station selection"),
    }
}
