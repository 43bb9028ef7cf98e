//! Command-layer tests: sector-0 fan-out, file handling, dispatch.

use norprog::cli::Command;
use norprog::commands;
use norprog_core::protocol::{BOOT_SECTOR_COUNT, BOOT_SECTOR_SHIFT, FLASH_SIZE, SECTOR_SIZE};
use norprog_core::{Error, Flash};
use norprog_dummy::DummyBoard;
use std::fs;
use std::path::PathBuf;

fn board_flash() -> Flash<DummyBoard> {
    let mut flash = Flash::new(DummyBoard::new());
    flash.init();
    flash
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("norprog-test-{}-{}", std::process::id(), name))
}

#[test]
fn erase_sector_zero_fans_out_to_all_boot_sectors() {
    let mut fanned = board_flash();
    commands::erase::run_erase_sector(&mut fanned, 0).unwrap();

    let mut manual = board_flash();
    for boot in 0..BOOT_SECTOR_COUNT {
        commands::erase::run_erase_boot(&mut manual, boot).unwrap();
    }

    // Byte-identical wire traffic.
    assert_eq!(fanned.link().trace(), manual.link().trace());
}

#[test]
fn check_sector_zero_fans_out_to_all_boot_sectors() {
    let mut fanned = board_flash();
    commands::check::run_check_sector(&mut fanned, 0).unwrap();

    let mut manual = board_flash();
    for boot in 0..BOOT_SECTOR_COUNT {
        commands::check::run_check_boot(&mut manual, boot).unwrap();
    }

    assert_eq!(fanned.link().trace(), manual.link().trace());
}

#[test]
fn read_sector_zero_accumulates_into_one_file() {
    let path = temp_path("read-fanout.bin");
    let mut flash = board_flash();
    for boot in 0..BOOT_SECTOR_COUNT {
        flash.program_byte((boot as u32) << BOOT_SECTOR_SHIFT, boot);
    }

    commands::read::run_read_sector(&mut flash, 0, &path).unwrap();
    let contents = fs::read(&path).unwrap();
    assert_eq!(contents.len(), SECTOR_SIZE as usize);
    for boot in 0..BOOT_SECTOR_COUNT {
        assert_eq!(contents[(boot as usize) << BOOT_SECTOR_SHIFT], boot);
    }

    // A second run starts over instead of appending further.
    commands::read::run_read_sector(&mut flash, 0, &path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), SECTOR_SIZE as u64);

    fs::remove_file(&path).unwrap();
}

#[test]
fn read_boot_truncates_the_output_file() {
    let path = temp_path("read-boot.bin");
    fs::write(&path, vec![0u8; 100 * 1024]).unwrap();

    let mut flash = board_flash();
    flash.program_byte(2 << BOOT_SECTOR_SHIFT, 0x42);
    commands::read::run_read_boot(&mut flash, 2, &path).unwrap();

    let contents = fs::read(&path).unwrap();
    assert_eq!(contents.len(), 8 * 1024);
    assert_eq!(contents[0], 0x42);
    assert_eq!(contents[1], 0xFF);

    fs::remove_file(&path).unwrap();
}

#[test]
fn program_and_verify_files_roundtrip() {
    let src = temp_path("program-src.bin");
    let data: Vec<u8> = (0..=255).collect();
    fs::write(&src, &data).unwrap();

    let mut flash = board_flash();
    commands::program::run_program_file(&mut flash, 0x1000, &src).unwrap();
    commands::verify::run_verify_file(&mut flash, 0x1000, &src).unwrap();

    // A corrupted source makes verify trip with the absolute address.
    let bad = temp_path("program-bad.bin");
    let mut corrupted = data.clone();
    corrupted[7] ^= 0x01;
    fs::write(&bad, &corrupted).unwrap();
    let err = commands::verify::run_verify_file(&mut flash, 0x1000, &bad).unwrap_err();
    let core = err.downcast_ref::<Error>().unwrap();
    assert!(matches!(core, Error::Mismatch { addr: 0x1007, .. }));

    fs::remove_file(&src).unwrap();
    fs::remove_file(&bad).unwrap();
}

#[test]
fn oversize_input_file_is_rejected_before_any_bus_traffic() {
    let path = temp_path("oversize.bin");
    let file = fs::File::create(&path).unwrap();
    file.set_len(FLASH_SIZE as u64 + 1).unwrap();
    drop(file);

    let mut flash = board_flash();
    let before = flash.link().accepted();
    let err = commands::program::run_program_file(&mut flash, 0, &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::FileTooLarge { .. })
    ));
    assert_eq!(flash.link().accepted(), before);

    let err = commands::verify::run_verify_file(&mut flash, 0, &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::FileTooLarge { .. })
    ));
    assert_eq!(flash.link().accepted(), before);

    fs::remove_file(&path).unwrap();
}

#[test]
fn whole_chip_check_and_read_are_refused() {
    let mut flash = board_flash();
    let before = flash.link().accepted();

    let err = commands::dispatch(&mut flash, Command::CheckChip).unwrap_err();
    assert!(err.to_string().contains("not implemented"));

    let err = commands::dispatch(
        &mut flash,
        Command::ReadChip {
            file: temp_path("never-created.bin"),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("not implemented"));

    assert_eq!(flash.link().accepted(), before);
}
