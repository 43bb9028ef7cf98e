//! Wire protocol constants for the nibble-bus board link.
//!
//! The board exposes the parallel flash bus as nine 4-bit latches.
//! Every outbound byte is `(selector << 4) | nibble`: the high nibble
//! picks a latch (or requests a reply), the low nibble is the payload.
//! Selectors 0xB..=0xF are reserved and ignored by the board.

/// Address nibble latches, least significant nibble first.
pub const SEL_ADDR0: u8 = 0x0;
pub const SEL_ADDR1: u8 = 0x1;
pub const SEL_ADDR2: u8 = 0x2;
pub const SEL_ADDR3: u8 = 0x3;
pub const SEL_ADDR4: u8 = 0x4;
pub const SEL_ADDR5: u8 = 0x5;
/// Data nibble latches, low then high.
pub const SEL_DATA0: u8 = 0x6;
pub const SEL_DATA1: u8 = 0x7;
/// Control latch.
pub const SEL_CTRL: u8 = 0x8;
/// Request one data byte; the board answers with exactly one byte.
pub const SEL_GET_DATA: u8 = 0x9;
/// Request the ready/status byte; the board answers with exactly one byte.
pub const SEL_GET_READY: u8 = 0xA;

/// Number of mirrored latches (six address, two data, one control).
pub const LATCH_COUNT: usize = 9;
/// Number of address nibbles.
pub const ADDR_NIBBLES: u32 = 6;

/// Bit 0 of the ready byte signals erase/program completion.
pub const READY_BIT: u8 = 0x01;

/// Control latch codes. Bit 0 gates the flash output drivers during
/// read cycles; the remaining bits encode write strobe, reset and
/// standby. Treated as opaque codes, matching the board firmware.
pub mod ctrl {
    /// Reset line asserted.
    pub const RESET_HI: u8 = 0x0E;
    /// Idle bus, output enable active.
    pub const IDLE: u8 = 0x03;
    /// Write strobe asserted; must be followed by IDLE to latch.
    pub const WRITE_STROBE: u8 = 0x05;
    /// Chip deselected, safe power-down state.
    pub const STANDBY: u8 = 0x0F;
}

/// JEDEC command-set constants for the AM29LV640-style chip on the
/// board. Privileged operations are preceded by the two-write unlock
/// sequence AA@AAA, 55@555.
pub mod jedec {
    /// First unlock write address.
    pub const UNLOCK_ADDR1: u32 = 0xAAA;
    /// Second unlock write address.
    pub const UNLOCK_ADDR2: u32 = 0x555;
    /// First unlock write data.
    pub const UNLOCK_DATA1: u8 = 0xAA;
    /// Second unlock write data.
    pub const UNLOCK_DATA2: u8 = 0x55;

    /// Enter identify (autoselect) mode.
    pub const CMD_IDENTIFY: u8 = 0x90;
    /// Leave identify mode / reset command state machine.
    pub const CMD_RESET: u8 = 0xF0;
    /// Erase setup, armed by a second unlock sequence.
    pub const CMD_ERASE_SETUP: u8 = 0x80;
    /// Chip erase, written at UNLOCK_ADDR1 after erase setup.
    pub const CMD_ERASE_CHIP: u8 = 0x10;
    /// Sector erase, written at the sector's base address.
    pub const CMD_ERASE_SECTOR: u8 = 0x30;
    /// Program one byte; the next write cycle carries the data.
    pub const CMD_PROGRAM: u8 = 0xA0;
    /// Enter unlock-bypass mode for buffered programming.
    pub const CMD_BYPASS_ENTER: u8 = 0x20;
    /// First of the two unlock-bypass exit writes.
    pub const CMD_BYPASS_EXIT1: u8 = 0x90;
    /// Second of the two unlock-bypass exit writes.
    pub const CMD_BYPASS_EXIT2: u8 = 0x00;
}

/// 64 KiB sector size.
pub const SECTOR_SIZE: u32 = 64 * 1024;
/// 8 KiB boot sector size. The eight boot sectors together make up
/// sector 0.
pub const BOOT_SECTOR_SIZE: u32 = 8 * 1024;
/// Total flash capacity, 8 MiB.
pub const FLASH_SIZE: u32 = 8 * 1024 * 1024;

/// Address shift selecting a 64 KiB sector.
pub const SECTOR_SHIFT: u32 = 16;
/// Address shift selecting an 8 KiB boot sector.
pub const BOOT_SECTOR_SHIFT: u32 = 13;

/// Highest 64 KiB sector index.
pub const SECTOR_MAX: u8 = 127;
/// Number of boot sectors inside sector 0.
pub const BOOT_SECTOR_COUNT: u8 = 8;

/// Byte-program addresses are masked to 23 bits.
pub const ADDR_MASK: u32 = 0x7F_FFFF;

/// Identifier byte offsets read in identify mode.
pub const ID_OFFSETS: [u32; 4] = [0x00, 0x02, 0x1C, 0x1E];
/// Identifier bytes of the chip the board carries.
pub const EXPECTED_ID: [u8; 4] = [0x01, 0x7E, 0x10, 0x00];
