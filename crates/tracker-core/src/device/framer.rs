//! Bounded receive window for the raw serial feed.
//!
//! The buffer grows from empty as bytes arrive and shifts left as the
//! framer discards them — either one byte at a time during
//! resynchronization, or a whole record after dispatch.  The rest of the
//! system only ever looks at the leading [`RECORD_LEN`] bytes.

use crate::device::record::RECORD_LEN;

/// Fixed capacity of the receive window, in bytes.
///
/// Sized generously: thirteen full records plus margin.  The tracker never
/// has more than one poll response in flight, so the window cannot fill up
/// under the polling discipline; overflowing it indicates a configuration
/// or programming error, not a runtime condition.
pub const BUFFER_CAPACITY: usize = 512;

/// The receive window.
#[derive(Debug)]
pub struct ReceiveBuffer {
    data: Vec<u8>,
}

impl ReceiveBuffer {
    /// Creates an empty window with [`BUFFER_CAPACITY`] reserved.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Free space at the tail, in bytes.  Reads from the device must be
    /// capped to this.
    pub fn vacancy(&self) -> usize {
        BUFFER_CAPACITY - self.data.len()
    }

    /// Appends received bytes at the tail.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` exceeds [`vacancy`](Self::vacancy).  Exceeding the
    /// fixed capacity is an internal defect: fail fast.
    pub fn extend(&mut self, bytes: &[u8]) {
        assert!(
            bytes.len() <= self.vacancy(),
            "receive window overflow: {} buffered + {} incoming > {BUFFER_CAPACITY}",
            self.data.len(),
            bytes.len(),
        );
        self.data.extend_from_slice(bytes);
    }

    /// True if the window holds at least one full record.
    pub fn has_full_record(&self) -> bool {
        self.data.len() >= RECORD_LEN
    }

    /// The leading [`RECORD_LEN`] bytes — the candidate record.
    ///
    /// # Panics
    ///
    /// Panics if the window does not hold a full record; callers must check
    /// [`has_full_record`](Self::has_full_record) first.
    pub fn window(&self) -> &[u8] {
        &self.data[..RECORD_LEN]
    }

    /// Discards the leading byte, shifting the rest left.  This is the
    /// one-byte resynchronization step taken after a rejected window.
    pub fn drop_leading_byte(&mut self) {
        if !self.data.is_empty() {
            self.data.remove(0);
        }
    }

    /// Discards the leading [`RECORD_LEN`] bytes after a record has been
    /// accepted and dispatched.
    pub fn consume_record(&mut self) {
        self.data.drain(..RECORD_LEN);
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
