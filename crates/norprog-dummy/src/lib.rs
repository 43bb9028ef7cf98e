//! norprog-dummy - In-memory board emulator for testing
//!
//! Implements [`ByteLink`] against an emulated board: the nine nibble
//! latches, an 8 MiB NOR array initialized to 0xFF and the chip's
//! JEDEC command state machine. Useful for testing and development
//! without real hardware.

use norprog_core::link::ByteLink;
use norprog_core::protocol::{
    ctrl, jedec, BOOT_SECTOR_SIZE, EXPECTED_ID, FLASH_SIZE, ID_OFFSETS, SECTOR_SIZE, SEL_CTRL,
    SEL_DATA0, SEL_DATA1, SEL_GET_DATA, SEL_GET_READY,
};
use std::collections::VecDeque;

/// JEDEC command state, advanced on every write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmdState {
    Idle,
    Unlock1,
    Unlock2,
    EraseSetup,
    EraseUnlock1,
    EraseUnlock2,
    /// Autoselect mode; reads return identifier bytes.
    Identify,
    /// 0xA0 seen, the next write carries the data byte.
    ProgramArmed,
    /// Unlock-bypass mode for buffered programming.
    Bypass,
    /// 0xA0 re-arm seen inside bypass mode.
    BypassArmed,
    /// First bypass-exit write seen.
    BypassExit,
}

/// Emulated board and flash chip.
pub struct DummyBoard {
    addr: [u8; 6],
    data: [u8; 2],
    ctrl: u8,
    mem: Vec<u8>,
    state: CmdState,
    replies: VecDeque<u8>,
    /// Ready polls answered "busy" before completion is reported.
    busy_polls: u32,
    trace: Vec<u8>,
}

impl Default for DummyBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyBoard {
    pub fn new() -> Self {
        Self {
            addr: [0; 6],
            data: [0; 2],
            ctrl: 0,
            mem: vec![0xFF; FLASH_SIZE as usize],
            state: CmdState::Idle,
            replies: VecDeque::new(),
            busy_polls: 0,
            trace: Vec::new(),
        }
    }

    /// Emulated flash contents.
    pub fn mem(&self) -> &[u8] {
        &self.mem
    }

    /// Total bytes accepted from the host so far.
    pub fn accepted(&self) -> usize {
        self.trace.len()
    }

    /// Every byte accepted from the host, in order.
    pub fn trace(&self) -> &[u8] {
        &self.trace
    }

    /// Answer the next `polls` ready requests with "busy".
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    fn latched_addr(&self) -> u32 {
        self.addr
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &nib)| acc | (nib as u32) << (4 * i))
    }

    fn latched_data(&self) -> u8 {
        self.data[0] | (self.data[1] << 4)
    }

    fn read_cycle(&self) -> u8 {
        let addr = self.latched_addr();
        if self.state == CmdState::Identify {
            return ID_OFFSETS
                .iter()
                .position(|&offset| offset == (addr & 0xFF))
                .map(|i| EXPECTED_ID[i])
                .unwrap_or(0x00);
        }
        self.mem[(addr as usize) % self.mem.len()]
    }

    fn program(&mut self, addr: u32, byte: u8) {
        // NOR programming can only clear bits.
        let slot = (addr as usize) % self.mem.len();
        self.mem[slot] &= byte;
    }

    fn erase_block(&mut self, addr: u32) {
        // Bottom-boot layout: sector 0 is split into 8 KiB blocks.
        let block = if addr < SECTOR_SIZE {
            BOOT_SECTOR_SIZE
        } else {
            SECTOR_SIZE
        };
        let base = (addr & !(block - 1)) as usize;
        self.mem[base..base + block as usize].fill(0xFF);
    }

    fn write_cycle(&mut self) {
        let addr = self.latched_addr();
        let data = self.latched_data();
        let cmd_addr = addr & 0xFFF;
        use CmdState::*;
        self.state = match self.state {
            Idle | Identify => match (cmd_addr, data) {
                (0xAAA, d) if d == jedec::UNLOCK_DATA1 => Unlock1,
                (_, d) if d == jedec::CMD_RESET => Idle,
                _ => self.state,
            },
            Unlock1 => match (cmd_addr, data) {
                (0x555, d) if d == jedec::UNLOCK_DATA2 => Unlock2,
                _ => Idle,
            },
            Unlock2 => match (cmd_addr, data) {
                (0xAAA, d) if d == jedec::CMD_IDENTIFY => Identify,
                (0xAAA, d) if d == jedec::CMD_ERASE_SETUP => EraseSetup,
                (0xAAA, d) if d == jedec::CMD_PROGRAM => ProgramArmed,
                (0xAAA, d) if d == jedec::CMD_BYPASS_ENTER => Bypass,
                _ => Idle,
            },
            EraseSetup => match (cmd_addr, data) {
                (0xAAA, d) if d == jedec::UNLOCK_DATA1 => EraseUnlock1,
                _ => Idle,
            },
            EraseUnlock1 => match (cmd_addr, data) {
                (0x555, d) if d == jedec::UNLOCK_DATA2 => EraseUnlock2,
                _ => Idle,
            },
            EraseUnlock2 => {
                if data == jedec::CMD_ERASE_CHIP && cmd_addr == 0xAAA {
                    self.mem.fill(0xFF);
                } else if data == jedec::CMD_ERASE_SECTOR {
                    self.erase_block(addr);
                }
                Idle
            }
            ProgramArmed => {
                self.program(addr, data);
                Idle
            }
            Bypass => match data {
                d if d == jedec::CMD_PROGRAM => BypassArmed,
                d if d == jedec::CMD_BYPASS_EXIT1 => BypassExit,
                _ => Bypass,
            },
            BypassArmed => {
                self.program(addr, data);
                Bypass
            }
            BypassExit => match data {
                d if d == jedec::CMD_BYPASS_EXIT2 => Idle,
                _ => Bypass,
            },
        };
    }
}

impl ByteLink for DummyBoard {
    fn send_byte(&mut self, byte: u8) -> bool {
        self.trace.push(byte);
        let selector = byte >> 4;
        let nibble = byte & 0xF;
        match selector {
            0x0..=0x5 => self.addr[selector as usize] = nibble,
            s if s == SEL_DATA0 => self.data[0] = nibble,
            s if s == SEL_DATA1 => self.data[1] = nibble,
            s if s == SEL_CTRL => {
                // The write latch fires on the strobe edge; the host's
                // delta suppression guarantees each strobe byte is one.
                if nibble == ctrl::WRITE_STROBE && self.ctrl != ctrl::WRITE_STROBE {
                    self.ctrl = nibble;
                    self.write_cycle();
                } else {
                    self.ctrl = nibble;
                }
            }
            s if s == SEL_GET_DATA => {
                let data = self.read_cycle();
                self.replies.push_back(data);
            }
            s if s == SEL_GET_READY => {
                let ready = if self.busy_polls > 0 {
                    self.busy_polls -= 1;
                    0x00
                } else {
                    0x01
                };
                self.replies.push_back(ready);
            }
            _ => log::warn!("dummy: ignoring reserved selector 0x{:X}", selector),
        }
        true
    }

    fn recv_byte(&mut self) -> Option<u8> {
        self.replies.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(board: &mut DummyBoard, bytes: &[u8]) {
        for &b in bytes {
            board.send_byte(b);
        }
    }

    #[test]
    fn decodes_a_raw_program_byte_sequence() {
        let mut board = DummyBoard::new();
        // Unlock: AA @ 0xAAA, 55 @ 0x555, A0 @ 0xAAA, then 0x5A @ 0x10.
        send(&mut board, &[0x0A, 0x1A, 0x2A, 0x30, 0x40, 0x50]);
        send(&mut board, &[0x6A, 0x7A, 0x85, 0x83]);
        send(&mut board, &[0x05, 0x15, 0x25, 0x65, 0x75, 0x85, 0x83]);
        send(&mut board, &[0x0A, 0x1A, 0x2A, 0x60, 0x7A, 0x85, 0x83]);
        send(&mut board, &[0x00, 0x11, 0x20, 0x6A, 0x75, 0x85, 0x83]);
        assert_eq!(board.mem()[0x10], 0x5A);
    }
}
