//! Serial-over-USB transport to the tracker hardware.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::infrastructure::storage::config::DeviceConfig;
use crate::infrastructure::tracker_link::{LinkError, TrackerLink};

/// Line rate of the tracker's USB CDC endpoint.
const BAUD_RATE: u32 = 115_200;

/// Minimum gap between consecutive writes.  The tracker firmware drops
/// commands that arrive back-to-back faster than it can parse them.
const COMMAND_PACING: Duration = Duration::from_millis(5);

/// Production [`TrackerLink`] over a serial port.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Opens the tracker's serial port.
    ///
    /// Uses `config.serial_path` when set; otherwise scans the system
    /// port list for the tracker's USB vendor/product identity.
    pub fn open(config: &DeviceConfig) -> Result<Self, LinkError> {
        let path = match &config.serial_path {
            Some(path) => path.clone(),
            None => find_port(config.vendor_id, config.product_id)?,
        };

        let port = serialport::new(&path, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()?;

        info!(path = %path, baud = BAUD_RATE, "tracker serial link opened");
        Ok(Self { port })
    }
}

/// Scans the system serial ports for the tracker's USB identity.
fn find_port(vendor_id: u16, product_id: u16) -> Result<String, LinkError> {
    for port in serialport::available_ports()? {
        if let SerialPortType::UsbPort(usb) = &port.port_type {
            if usb.vid == vendor_id && usb.pid == product_id {
                debug!(port = %port.port_name, "tracker port located by USB identity");
                return Ok(port.port_name.clone());
            }
        }
    }
    Err(LinkError::DeviceNotFound {
        vendor_id,
        product_id,
    })
}

impl TrackerLink for SerialLink {
    fn send(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        // Pace every command so the firmware keeps up.
        std::thread::sleep(COMMAND_PACING);
        self.port.write_all(bytes)?;
        Ok(bytes.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
