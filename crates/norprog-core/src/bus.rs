//! Bus cycle layer: drives the board's nine nibble latches over the
//! byte link and composes them into whole read/write bus cycles.
//!
//! The board's latches power up in an undefined state, so the mirror
//! is only trusted after [`NibbleBus::init`] has force-written every
//! latch once. After that, a latch byte goes on the wire only when its
//! value actually changes; the serial link is slow relative to local
//! computation and most cycles touch only a nibble or two.

use crate::link::ByteLink;
use crate::protocol::*;

/// Nibble-bus driver owning the link and the latch mirror.
pub struct NibbleBus<L: ByteLink> {
    link: L,
    /// Last nibble accepted by the board, indexed by selector 0..=8.
    /// This is the only place the previously sent value is remembered.
    latches: [u8; LATCH_COUNT],
}

impl<L: ByteLink> NibbleBus<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            latches: [0; LATCH_COUNT],
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Push one byte, retrying until the link accepts it.
    fn send(&mut self, byte: u8) {
        while !self.link.send_byte(byte) {}
    }

    /// Spin until a reply byte arrives.
    fn recv(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.link.recv_byte() {
                return byte;
            }
        }
    }

    /// Send `nibble` to the latch picked by `selector` if it differs
    /// from the mirrored value. The caller masks `nibble` to 4 bits.
    fn write_field(&mut self, selector: u8, nibble: u8) {
        let slot = selector as usize;
        if self.latches[slot] != nibble {
            self.send((selector << 4) | nibble);
            self.latches[slot] = nibble;
        }
    }

    /// Send `nibble` regardless of the mirror and resynchronize it.
    fn force_field(&mut self, selector: u8, nibble: u8) {
        self.send((selector << 4) | nibble);
        self.latches[selector as usize] = nibble;
    }

    /// Force every latch to a known value: address and data zero,
    /// control in standby. Required once per session because the
    /// hardware latches power up undefined.
    pub fn init(&mut self) {
        log::debug!("priming board latches");
        for selector in SEL_ADDR0..=SEL_DATA1 {
            self.force_field(selector, 0x0);
        }
        self.force_field(SEL_CTRL, ctrl::STANDBY);
    }

    /// Latch a 24-bit address, least significant nibble first.
    pub fn set_addr(&mut self, addr: u32) {
        for i in 0..ADDR_NIBBLES {
            let nibble = ((addr >> (4 * i)) & 0xF) as u8;
            self.write_field(SEL_ADDR0 + i as u8, nibble);
        }
    }

    /// Latch a data byte, low nibble first.
    pub fn set_data(&mut self, data: u8) {
        self.write_field(SEL_DATA0, data & 0xF);
        self.write_field(SEL_DATA1, data >> 4);
    }

    /// Latch a control code.
    pub fn set_ctrl(&mut self, code: u8) {
        self.write_field(SEL_CTRL, code & 0xF);
    }

    /// Request the data byte at the currently latched address.
    pub fn get_data(&mut self) -> u8 {
        self.send(SEL_GET_DATA << 4);
        self.recv()
    }

    /// Request the ready/status byte.
    pub fn get_ready(&mut self) -> u8 {
        self.send(SEL_GET_READY << 4);
        self.recv()
    }

    /// Whole read cycle: address, output enable, fetch.
    pub fn read(&mut self, addr: u32) -> u8 {
        self.set_addr(addr);
        self.set_ctrl(ctrl::IDLE);
        let data = self.get_data();
        log::trace!("read cycle 0x{:06X} -> 0x{:02X}", addr, data);
        data
    }

    /// Whole write cycle. The strobe-then-idle pair is the latch
    /// pulse; omitting either half leaves the write line unlatched or
    /// stuck high.
    pub fn write(&mut self, addr: u32, data: u8) {
        log::trace!("write cycle 0x{:06X} <- 0x{:02X}", addr, data);
        self.set_addr(addr);
        self.set_data(data);
        self.set_ctrl(ctrl::WRITE_STROBE);
        self.set_ctrl(ctrl::IDLE);
    }

    /// Pulse the chip reset line.
    pub fn reset(&mut self) {
        self.set_ctrl(ctrl::RESET_HI);
        self.set_ctrl(ctrl::IDLE);
    }

    /// Put the chip into standby.
    pub fn standby(&mut self) {
        self.set_ctrl(ctrl::STANDBY);
    }

    /// Busy-spin on the ready byte until bit 0 is set. No backoff and
    /// no timeout: the datasheet bounds erase/program completion, the
    /// software does not.
    pub fn wait_ready(&mut self) {
        while self.get_ready() & READY_BIT == 0 {}
    }
}
