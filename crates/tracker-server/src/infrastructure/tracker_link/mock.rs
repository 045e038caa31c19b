//! Scripted in-memory [`TrackerLink`] for tests.

use std::collections::VecDeque;

use crate::infrastructure::tracker_link::{LinkError, TrackerLink};

/// Replays a queue of scripted byte chunks and records every command
/// written to it.  One chunk is handed out per `receive` call; an empty
/// chunk models a read timeout, and an exhausted queue returns `Ok(0)`
/// forever.
#[derive(Default)]
pub struct MockLink {
    incoming: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `bytes` to be returned by a future `receive` call.
    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.incoming.push_back(bytes.to_vec());
    }

    /// Every command written so far, in order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl TrackerLink for MockLink {
    fn send(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        self.sent.push(bytes.to_vec());
        Ok(bytes.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let Some(chunk) = self.incoming.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            // Caller's buffer was smaller than the chunk; keep the rest.
            self.incoming.push_front(chunk[n..].to_vec());
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_replays_chunks_in_order_then_times_out() {
        let mut link = MockLink::new();
        link.push_incoming(b"ab");
        link.push_incoming(b"c");

        let mut buf = [0u8; 8];
        assert_eq!(link.receive(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(link.receive(&mut buf).unwrap(), 1);
        assert_eq!(link.receive(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_mock_splits_chunk_larger_than_buffer() {
        let mut link = MockLink::new();
        link.push_incoming(b"abcdef");

        let mut buf = [0u8; 4];
        assert_eq!(link.receive(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(link.receive(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn test_mock_records_sent_commands() {
        let mut link = MockLink::new();
        link.send(b"P").unwrap();
        link.send(b"F1\r").unwrap();

        assert_eq!(link.sent(), &[b"P".to_vec(), b"F1\r".to_vec()]);
    }
}
