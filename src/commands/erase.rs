//! Erase command implementations

use indicatif::{ProgressBar, ProgressStyle};
use norprog_core::protocol::{BOOT_SECTOR_COUNT, BOOT_SECTOR_SIZE, FLASH_SIZE, SECTOR_SIZE};
use norprog_core::{ByteLink, Flash};
use std::time::Duration;

fn erase_spinner(what: String) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(what);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Erase the whole chip.
pub fn run_erase_chip<L: ByteLink>(flash: &mut Flash<L>) -> Result<(), Box<dyn std::error::Error>> {
    let pb = erase_spinner(format!(
        "Erasing {} bytes (this may take a while)...",
        FLASH_SIZE
    ))?;
    flash.erase_chip();
    pb.finish_with_message(format!("Erased {} bytes", FLASH_SIZE));
    Ok(())
}

/// Erase a 64 KiB sector. Sector 0 comprises the eight boot sectors
/// and fans out into eight boot-sector erases.
pub fn run_erase_sector<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    if sector == 0 {
        for boot in 0..BOOT_SECTOR_COUNT {
            run_erase_boot(flash, boot)?;
        }
        return Ok(());
    }

    let pb = erase_spinner(format!("Erasing sector {} ({} bytes)...", sector, SECTOR_SIZE))?;
    flash.erase_sector(sector);
    pb.finish_with_message(format!("Erased sector {}", sector));
    Ok(())
}

/// Erase an 8 KiB boot sector.
pub fn run_erase_boot<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = erase_spinner(format!(
        "Erasing boot sector {} ({} bytes)...",
        sector, BOOT_SECTOR_SIZE
    ))?;
    flash.erase_boot_sector(sector);
    pb.finish_with_message(format!("Erased boot sector {}", sector));
    Ok(())
}
