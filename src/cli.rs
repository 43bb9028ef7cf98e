//! CLI argument parsing

use clap::{Parser, Subcommand};
use norprog_core::protocol::{ADDR_MASK, BOOT_SECTOR_COUNT, SECTOR_MAX};
use std::path::PathBuf;

/// Parse a number the way `strtoul(_, _, 0)` does: `0x` prefix for
/// hex, `0o` or a leading zero for octal, decimal otherwise.
fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(oct) = s.strip_prefix("0o") {
        (oct, 8)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    u32::from_str_radix(digits, radix).map_err(|e| format!("invalid number '{}': {}", s, e))
}

/// Parse an address, masked to the chip's 23 address bits.
pub fn parse_addr(s: &str) -> Result<u32, String> {
    Ok(parse_number(s)? & ADDR_MASK)
}

/// Parse a data byte, masked to 8 bits.
pub fn parse_data(s: &str) -> Result<u8, String> {
    Ok((parse_number(s)? & 0xFF) as u8)
}

/// Parse a 64 KiB sector index (0..=127).
pub fn parse_sector(s: &str) -> Result<u8, String> {
    let n = parse_number(s)?;
    if n > SECTOR_MAX as u32 {
        return Err(format!("illegal sector number {}", n));
    }
    Ok(n as u8)
}

/// Parse an 8 KiB boot sector index (0..=7).
pub fn parse_boot_sector(s: &str) -> Result<u8, String> {
    let n = parse_number(s)?;
    if n >= BOOT_SECTOR_COUNT as u32 {
        return Err(format!("illegal boot sector number {}", n));
    }
    Ok(n as u8)
}

#[derive(Parser)]
#[command(name = "norprog")]
#[command(author, version, about = "NOR flash programmer for the nibble-bus serial board", long_about = None)]
#[command(after_help = "Note: sector 0 comprises the eight boot sectors 0..7")]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Serial port connected to the board
    pub port: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Identify the chip by its four identifier bytes
    Id,

    /// Erase the total chip
    EraseChip,

    /// Erase 64 KiB sector <SECTOR> (0..127; 0 erases all boot sectors)
    EraseSector {
        #[arg(value_parser = parse_sector)]
        sector: u8,
    },

    /// Erase 8 KiB boot sector <SECTOR> (0..7)
    EraseBoot {
        #[arg(value_parser = parse_boot_sector)]
        sector: u8,
    },

    /// Check that the total chip is empty (not implemented)
    CheckChip,

    /// Check that 64 KiB sector <SECTOR> is empty (0 checks all boot sectors)
    CheckSector {
        #[arg(value_parser = parse_sector)]
        sector: u8,
    },

    /// Check that 8 KiB boot sector <SECTOR> is empty
    CheckBoot {
        #[arg(value_parser = parse_boot_sector)]
        sector: u8,
    },

    /// Read the total chip to a file (not implemented)
    ReadChip {
        /// Output file path
        file: PathBuf,
    },

    /// Read 64 KiB sector <SECTOR> to a file (0 reads all boot sectors)
    ReadSector {
        #[arg(value_parser = parse_sector)]
        sector: u8,
        /// Output file path
        file: PathBuf,
    },

    /// Read 8 KiB boot sector <SECTOR> to a file
    ReadBoot {
        #[arg(value_parser = parse_boot_sector)]
        sector: u8,
        /// Output file path
        file: PathBuf,
    },

    /// Program a single data byte
    ProgramByte {
        /// Flash address (decimal, 0x hex or octal)
        #[arg(value_parser = parse_addr)]
        addr: u32,
        /// Data byte
        #[arg(value_parser = parse_data)]
        data: u8,
    },

    /// Program a file starting at an address
    Program {
        /// Start address
        #[arg(value_parser = parse_addr)]
        addr: u32,
        /// Input file path
        file: PathBuf,
    },

    /// Verify flash contents against a file
    Verify {
        /// Start address
        #[arg(value_parser = parse_addr)]
        addr: u32,
        /// Input file path
        file: PathBuf,
    },
}
