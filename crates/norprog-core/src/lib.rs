//! norprog-core - Nibble-bus emulation and flash command engine
//!
//! Drives a parallel NOR flash chip through a serial byte channel by
//! emulating the address/data/control bus one nibble at a time, and
//! layers the chip's JEDEC unlock/command sequences on top:
//!
//! - [`link::ByteLink`] - the byte transport seam
//! - [`bus::NibbleBus`] - latch mirror and whole bus cycles
//! - [`flash::Flash`] - identify/erase/program/check/read/verify

pub mod bus;
pub mod error;
pub mod flash;
pub mod link;
pub mod protocol;

pub use error::{Error, Result};
pub use flash::{Flash, ProgramSession};
pub use link::ByteLink;
