//! norprog - NOR flash programmer for the nibble-bus serial board
//!
//! Library surface for the `norprog` binary: argument parsing and the
//! command implementations, generic over any [`norprog_core::ByteLink`]
//! so they run against real hardware or the test board emulator alike.

pub mod cli;
pub mod commands;
