//! Empty-check command implementations

use super::{byte_progress, CHUNK_SIZE};
use norprog_core::protocol::{
    BOOT_SECTOR_COUNT, BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE, SECTOR_SHIFT, SECTOR_SIZE,
};
use norprog_core::{ByteLink, Flash};

/// Check that a 64 KiB sector holds only the erased value 0xFF.
/// Sector 0 fans out into its eight boot sectors.
pub fn run_check_sector<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    if sector == 0 {
        for boot in 0..BOOT_SECTOR_COUNT {
            run_check_boot(flash, boot)?;
        }
        return Ok(());
    }

    check_with_progress(flash, (sector as u32) << SECTOR_SHIFT, SECTOR_SIZE)?;
    println!("Sector {} is empty", sector);
    Ok(())
}

/// Check that an 8 KiB boot sector holds only 0xFF.
pub fn run_check_boot<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    check_with_progress(flash, (sector as u32) << BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE)?;
    println!("Boot sector {} is empty", sector);
    Ok(())
}

/// Scan a range chunk by chunk; the first non-0xFF byte aborts the
/// whole operation.
fn check_with_progress<L: ByteLink>(
    flash: &mut Flash<L>,
    start: u32,
    len: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = byte_progress(len as u64)?;

    let mut offset = 0u32;
    while offset < len {
        let chunk = (len - offset).min(CHUNK_SIZE as u32);
        flash.check_range(start + offset, chunk)?;
        offset += chunk;
        pb.set_position(offset as u64);
    }

    pb.finish_and_clear();
    Ok(())
}
