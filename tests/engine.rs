//! Flash command engine tests against the emulated board.

use norprog_core::protocol::{
    BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE, EXPECTED_ID, FLASH_SIZE, SECTOR_SHIFT,
};
use norprog_core::{Error, Flash};
use norprog_dummy::DummyBoard;

fn board_flash() -> Flash<DummyBoard> {
    let mut flash = Flash::new(DummyBoard::new());
    flash.init();
    flash
}

#[test]
fn identify_reports_the_chip_id_and_leaves_autoselect() {
    let mut flash = board_flash();
    assert_eq!(flash.identify(), EXPECTED_ID);

    // Back in read mode the array contents show through again.
    let mut buf = [0u8; 4];
    flash.read_range(0, &mut buf);
    assert_eq!(buf, [0xFF; 4]);
}

#[test]
fn program_byte_clears_bits_at_the_given_address() {
    let mut flash = board_flash();
    flash.program_byte(0x1234, 0x5A);
    let mut buf = [0u8; 3];
    flash.read_range(0x1233, &mut buf);
    assert_eq!(buf, [0xFF, 0x5A, 0xFF]);
}

#[test]
fn program_verify_roundtrip() {
    let mut flash = board_flash();
    let data: Vec<u8> = (0..=255).collect();
    flash.program_range(0x1000, &data).unwrap();
    flash.verify_range(0x1000, &data).unwrap();
}

#[test]
fn verify_reports_the_first_mismatch_only() {
    let mut flash = board_flash();
    flash.program_range(0x20, &[0xAA, 0xBB, 0xCC]).unwrap();
    let err = flash.verify_range(0x20, &[0xAA, 0xBC, 0xCD]).unwrap_err();
    assert_eq!(
        err,
        Error::Mismatch {
            addr: 0x21,
            expected: 0xBC,
            found: 0xBB,
        }
    );
}

#[test]
fn erase_then_program_scenario() {
    let mut flash = board_flash();
    let base = 3u32 << BOOT_SECTOR_SHIFT;

    // Leave stale data in boot sector 3, then erase it.
    flash.program_range(base + 0x100, &[0xDE; 16]).unwrap();
    flash.erase_boot_sector(3);
    flash.check_boot_sector(3).unwrap();

    flash.program_range(base, &[0x11, 0x22, 0x33, 0x44]).unwrap();
    flash.verify_range(base, &[0x11, 0x22, 0x33, 0x44]).unwrap();

    // The check now trips on the first programmed byte and scans no
    // further.
    assert_eq!(
        flash.check_boot_sector(3).unwrap_err(),
        Error::NotErased {
            addr: base,
            found: 0x11,
        }
    );
}

#[test]
fn erase_sector_only_touches_its_own_64k() {
    let mut flash = board_flash();
    flash.program_byte(2 << SECTOR_SHIFT, 0x00);
    flash.program_byte(3 << SECTOR_SHIFT, 0x00);
    flash.erase_sector(2);
    assert_eq!(flash.link().mem()[(2 << SECTOR_SHIFT) as usize], 0xFF);
    assert_eq!(flash.link().mem()[(3 << SECTOR_SHIFT) as usize], 0x00);
}

#[test]
fn erase_chip_restores_the_erased_value_everywhere() {
    let mut flash = board_flash();
    flash.program_byte(0x0000, 0x00);
    flash.program_byte(0x7F_FFFF, 0x00);
    flash.erase_chip();
    flash.check_range(0, 64).unwrap();
    flash.check_range(FLASH_SIZE - 64, 64).unwrap();
}

#[test]
fn boot_sector_erase_granularity_is_8k() {
    let mut flash = board_flash();
    flash.program_byte(0x0000, 0x00);
    flash.program_byte(BOOT_SECTOR_SIZE, 0x00); // first byte of boot sector 1
    flash.erase_boot_sector(0);
    assert_eq!(flash.link().mem()[0], 0xFF);
    assert_eq!(flash.link().mem()[BOOT_SECTOR_SIZE as usize], 0x00);
}

#[test]
fn oversize_program_is_rejected_before_any_bus_traffic() {
    let mut flash = board_flash();
    let before = flash.link().accepted();
    let err = flash
        .begin_program(0, FLASH_SIZE as u64 + 1)
        .map(|_| ())
        .unwrap_err();
    assert_eq!(
        err,
        Error::FileTooLarge {
            size: FLASH_SIZE as u64 + 1,
            max: FLASH_SIZE as u64,
        }
    );
    assert_eq!(flash.link().accepted(), before);
}

#[test]
fn oversize_verify_is_rejected_before_any_bus_traffic() {
    let mut flash = board_flash();
    let data = vec![0u8; FLASH_SIZE as usize + 1];
    let before = flash.link().accepted();
    assert!(matches!(
        flash.verify_range(0, &data),
        Err(Error::FileTooLarge { .. })
    ));
    assert_eq!(flash.link().accepted(), before);
}

#[test]
fn erase_completion_is_polled_until_ready() {
    let mut flash = board_flash();
    flash.program_byte(1 << BOOT_SECTOR_SHIFT, 0x00);
    flash.link_mut().set_busy_polls(3);
    flash.erase_boot_sector(1);
    assert_eq!(flash.link().mem()[(1 << BOOT_SECTOR_SHIFT) as usize], 0xFF);
}

#[test]
fn sequential_reads_ride_on_delta_suppression() {
    let mut flash = board_flash();
    let before = flash.link().accepted();
    let mut buf = [0u8; 16];
    flash.read_range(0, &mut buf);
    // First read reuses the all-zero latches entirely; each further
    // read changes exactly one address nibble. 15 latch bytes plus 16
    // data requests.
    assert_eq!(flash.link().accepted() - before, 31);
}

#[test]
fn first_rearm_write_of_a_program_session_reuses_the_command_address() {
    let mut flash = board_flash();
    let mut session = flash.begin_program(0x1000, 1).unwrap();
    session.write(&[0x55]);
    session.finish();

    // The re-arm write cycle for the first byte targets 0xAAA, which
    // is still latched from the bypass-enter command, so no address
    // bytes may appear before the 0xA0 data write.
    // finish() appends one ready request and the two bypass-exit
    // write cycles (1 + 4 + 3 bytes); the 11 bytes before those are
    // the programmed byte itself.
    let trace = flash.link().trace();
    let tail = &trace[trace.len() - 19..trace.len() - 8];
    assert_eq!(
        tail,
        [0x7A, 0x85, 0x83, 0x00, 0x10, 0x20, 0x31, 0x65, 0x75, 0x85, 0x83]
    );
}
