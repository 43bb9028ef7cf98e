//! Serial port byte link to the board.
//!
//! The board talks 38400 baud, 8 data bits, no parity, one stop bit,
//! no flow control. Send and receive are try-once as required by
//! [`ByteLink`]; a short read timeout maps to "nothing arrived yet".

use norprog_core::link::ByteLink;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;
use thiserror::Error;

/// Line speed of the board firmware.
pub const BAUD_RATE: u32 = 38_400;

/// Poll granularity for the single-byte receive.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Errors opening the serial link.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("cannot open serial port '{device}': {source}")]
    Open {
        device: String,
        source: serialport::Error,
    },
}

/// Serial port link.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open and configure the port for the board.
    pub fn open(device: &str) -> Result<Self, SerialError> {
        let port = serialport::new(device, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| SerialError::Open {
                device: device.to_string(),
                source,
            })?;

        log::info!("opened serial port {} at {} baud", device, BAUD_RATE);

        Ok(Self { port })
    }
}

impl ByteLink for SerialLink {
    fn send_byte(&mut self, byte: u8) -> bool {
        match self.port.write(&[byte]) {
            Ok(1) => true,
            Ok(_) => false,
            Err(e) => {
                log::trace!("serial write pending: {}", e);
                false
            }
        }
    }

    fn recv_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                None
            }
            Err(e) => {
                log::trace!("serial read pending: {}", e);
                None
            }
        }
    }

    fn drain(&mut self) {
        if let Err(e) = self.port.flush() {
            log::warn!("serial drain failed: {}", e);
        }
    }
}
