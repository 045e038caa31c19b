//! Byte-stream transport to the motion tracker.
//!
//! The device pump only ever talks to the [`TrackerLink`] trait.  In
//! production the implementation is [`SerialLink`], which owns the
//! serial-over-USB port; in tests it is [`MockLink`], which replays a
//! scripted byte stream.

pub mod commands;
pub mod mock;
pub mod serial;

pub use mock::MockLink;
pub use serial::SerialLink;

use thiserror::Error;

/// Errors raised by the tracker transport.
#[derive(Debug, Error)]
pub enum LinkError {
    /// No serial port matched the tracker's USB identity.
    #[error("no tracker found (vendor {vendor_id:#06x}, product {product_id:#06x})")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// The tracker never answered the attention probe.
    #[error("tracker did not respond after {attempts} attempts")]
    NoResponse { attempts: u32 },

    /// Serial port enumeration or open failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// A read or write on the open link failed.
    #[error("tracker link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking byte-stream transport to the tracker.
///
/// Implementations must be `Send` because the device pump runs on its
/// own OS thread.
pub trait TrackerLink: Send {
    /// Writes `bytes` to the device, returning the number written.
    fn send(&mut self, bytes: &[u8]) -> Result<usize, LinkError>;

    /// Reads available bytes into `buf`, returning the number read.
    ///
    /// A read timeout is not an error: implementations return `Ok(0)`
    /// when the device had nothing to say within the configured window.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;
}
