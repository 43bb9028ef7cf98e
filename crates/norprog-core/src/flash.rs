//! JEDEC flash command engine.
//!
//! Sequences bus cycles into the chip's unlock/command protocol:
//! identify, chip/sector/boot-sector erase, byte program, buffered
//! file program, plus the range-granular check/read/verify primitives
//! the command layer chunks over.

use crate::bus::NibbleBus;
use crate::error::{Error, Result};
use crate::link::ByteLink;
use crate::protocol::{jedec, BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE, FLASH_SIZE, ID_OFFSETS, SECTOR_SHIFT, SECTOR_SIZE};

/// Flash chip behind a nibble bus.
pub struct Flash<L: ByteLink> {
    bus: NibbleBus<L>,
}

impl<L: ByteLink> Flash<L> {
    /// Wrap a link. The board is not touched until [`Flash::init`].
    pub fn new(link: L) -> Self {
        Self {
            bus: NibbleBus::new(link),
        }
    }

    pub fn link(&self) -> &L {
        self.bus.link()
    }

    pub fn link_mut(&mut self) -> &mut L {
        self.bus.link_mut()
    }

    /// Prime the board latches and pulse the chip reset.
    pub fn init(&mut self) {
        self.bus.init();
        self.bus.reset();
    }

    /// Put the chip into standby.
    pub fn standby(&mut self) {
        self.bus.standby();
    }

    /// Flush the link's outbound buffer.
    pub fn drain(&mut self) {
        self.bus.link_mut().drain();
    }

    /// The two-write unlock prefix required before privileged commands.
    fn unlock(&mut self) {
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::UNLOCK_DATA1);
        self.bus.write(jedec::UNLOCK_ADDR2, jedec::UNLOCK_DATA2);
    }

    /// Read the four identifier bytes.
    ///
    /// Enters autoselect mode, reads offsets 0x00/0x02/0x1C/0x1E and
    /// leaves the mode again. No completion polling is involved.
    pub fn identify(&mut self) -> [u8; 4] {
        log::debug!("reading chip identifiers");
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_IDENTIFY);
        let id = ID_OFFSETS.map(|offset| self.bus.read(offset));
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_RESET);
        id
    }

    /// Erase the whole chip and wait for completion.
    pub fn erase_chip(&mut self) {
        log::debug!("erasing whole chip");
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_ERASE_SETUP);
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_ERASE_CHIP);
        self.bus.wait_ready();
    }

    /// Erase 64 KiB sector `sector` (1..=127; the dispatcher fans
    /// sector 0 out into its eight boot sectors). Only the high
    /// address bits select the sector, the low bits are don't-care.
    pub fn erase_sector(&mut self, sector: u8) {
        log::debug!("erasing sector {}", sector);
        self.erase_at((sector as u32) << SECTOR_SHIFT);
    }

    /// Erase 8 KiB boot sector `sector` (0..=7).
    pub fn erase_boot_sector(&mut self, sector: u8) {
        log::debug!("erasing boot sector {}", sector);
        self.erase_at((sector as u32) << BOOT_SECTOR_SHIFT);
    }

    fn erase_at(&mut self, addr: u32) {
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_ERASE_SETUP);
        self.unlock();
        self.bus.write(addr, jedec::CMD_ERASE_SECTOR);
        self.bus.wait_ready();
    }

    /// Program a single byte and wait for completion.
    pub fn program_byte(&mut self, addr: u32, data: u8) {
        log::debug!("programming 0x{:02X} at 0x{:06X}", data, addr);
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_PROGRAM);
        self.bus.write(addr, data);
        self.bus.wait_ready();
    }

    /// Check that `len` bytes starting at `start` hold the erased
    /// value 0xFF. Fails on the first violation without scanning
    /// further.
    pub fn check_range(&mut self, start: u32, len: u32) -> Result<()> {
        for offset in 0..len {
            let addr = start + offset;
            let found = self.bus.read(addr);
            if found != 0xFF {
                return Err(Error::NotErased { addr, found });
            }
        }
        Ok(())
    }

    /// Check that 64 KiB sector `sector` is empty.
    pub fn check_sector(&mut self, sector: u8) -> Result<()> {
        self.check_range((sector as u32) << SECTOR_SHIFT, SECTOR_SIZE)
    }

    /// Check that 8 KiB boot sector `sector` is empty.
    pub fn check_boot_sector(&mut self, sector: u8) -> Result<()> {
        self.check_range((sector as u32) << BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE)
    }

    /// Read `buf.len()` bytes starting at `start` into `buf`.
    pub fn read_range(&mut self, start: u32, buf: &mut [u8]) {
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.bus.read(start + offset as u32);
        }
    }

    /// Compare `expected` against the flash contents at `start`.
    ///
    /// Inputs longer than the chip are rejected before any bus
    /// traffic; the first mismatch aborts with address, file byte and
    /// chip byte.
    pub fn verify_range(&mut self, start: u32, expected: &[u8]) -> Result<()> {
        if expected.len() as u64 > FLASH_SIZE as u64 {
            return Err(Error::FileTooLarge {
                size: expected.len() as u64,
                max: FLASH_SIZE as u64,
            });
        }
        for (offset, &expected) in expected.iter().enumerate() {
            let addr = start + offset as u32;
            let found = self.bus.read(addr);
            if found != expected {
                return Err(Error::Mismatch {
                    addr,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Start a buffered program of `len` bytes at `start`.
    ///
    /// Rejects oversize inputs before any bus traffic, then enters
    /// unlock-bypass mode. The chip is polled once for the whole
    /// stream when the session is finished, not per byte.
    pub fn begin_program(&mut self, start: u32, len: u64) -> Result<ProgramSession<'_, L>> {
        if len > FLASH_SIZE as u64 {
            return Err(Error::FileTooLarge {
                size: len,
                max: FLASH_SIZE as u64,
            });
        }
        log::debug!("programming {} bytes at 0x{:06X}", len, start);
        self.unlock();
        self.bus.write(jedec::UNLOCK_ADDR1, jedec::CMD_BYPASS_ENTER);
        Ok(ProgramSession {
            flash: self,
            // The re-arm write for the first byte reuses the address
            // of the bypass-enter command. The hardware treats it as
            // don't-care; keep the exact sequence the board was
            // validated with.
            last_addr: jedec::UNLOCK_ADDR1,
            next_addr: start,
        })
    }

    /// Buffered program of `data` at `start` in one call.
    pub fn program_range(&mut self, start: u32, data: &[u8]) -> Result<()> {
        let mut session = self.begin_program(start, data.len() as u64)?;
        session.write(data);
        session.finish();
        Ok(())
    }
}

/// In-progress buffered program started by [`Flash::begin_program`].
///
/// Every byte is preceded by a 0xA0 re-arm write at the previous
/// address; completion is polled once in [`ProgramSession::finish`],
/// which also issues the two bypass-exit writes.
pub struct ProgramSession<'a, L: ByteLink> {
    flash: &'a mut Flash<L>,
    last_addr: u32,
    next_addr: u32,
}

impl<L: ByteLink> ProgramSession<'_, L> {
    /// Stream the next chunk of bytes.
    pub fn write(&mut self, data: &[u8]) {
        for &byte in data {
            self.flash.bus.write(self.last_addr, jedec::CMD_PROGRAM);
            self.flash.bus.write(self.next_addr, byte);
            self.last_addr = self.next_addr;
            self.next_addr = self.next_addr.wrapping_add(1);
        }
    }

    /// Wait for the chip and leave unlock-bypass mode.
    pub fn finish(self) {
        self.flash.bus.wait_ready();
        self.flash.bus.write(self.last_addr, jedec::CMD_BYPASS_EXIT1);
        self.flash.bus.write(self.last_addr, jedec::CMD_BYPASS_EXIT2);
    }
}
