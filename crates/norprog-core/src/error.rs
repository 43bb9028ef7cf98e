//! Error types for norprog-core.
//!
//! Link-level send/receive retries are not represented here: the bus
//! layer retries them indefinitely and they are never surfaced. Every
//! error below is fatal for the whole requested operation.

use thiserror::Error;

/// Core error type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input exceeds the flash capacity; rejected before any bus
    /// traffic is generated.
    #[error("size of file is bigger than the capacity of the Flash ROM ({size} > {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    /// An empty-check found a byte that is not the erased value 0xFF.
    #[error("addr 0x{addr:06X} not empty, data is 0x{found:02X}")]
    NotErased { addr: u32, found: u8 },

    /// Verify found a byte differing from the source.
    #[error("addr 0x{addr:06X}, file = 0x{expected:02X}, ROM = 0x{found:02X}")]
    Mismatch { addr: u32, expected: u8, found: u8 },

    /// Whole-chip check/read; a full pass over the serial link takes
    /// about 2:30 h and is deliberately not implemented.
    #[error("{op} the whole chip would take about 2:30h, and thus is not implemented")]
    Unsupported { op: &'static str },
}

/// Result type alias using the core error.
pub type Result<T> = core::result::Result<T, Error>;
