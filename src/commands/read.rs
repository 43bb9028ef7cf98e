//! Read command implementations

use super::{byte_progress, CHUNK_SIZE};
use norprog_core::protocol::{
    BOOT_SECTOR_COUNT, BOOT_SECTOR_SHIFT, BOOT_SECTOR_SIZE, SECTOR_SHIFT, SECTOR_SIZE,
};
use norprog_core::{ByteLink, Flash};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Read a 64 KiB sector to `file`. Sector 0 fans out into its eight
/// boot sectors, appending after the first so the output accumulates
/// into one file.
pub fn run_read_sector<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if sector == 0 {
        for boot in 0..BOOT_SECTOR_COUNT {
            read_range_to_file(
                flash,
                (boot as u32) << BOOT_SECTOR_SHIFT,
                BOOT_SECTOR_SIZE,
                file,
                boot != 0,
            )?;
        }
    } else {
        read_range_to_file(flash, (sector as u32) << SECTOR_SHIFT, SECTOR_SIZE, file, false)?;
    }
    println!("Wrote {} bytes to {:?}", SECTOR_SIZE, file);
    Ok(())
}

/// Read an 8 KiB boot sector to `file`.
pub fn run_read_boot<L: ByteLink>(
    flash: &mut Flash<L>,
    sector: u8,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    read_range_to_file(
        flash,
        (sector as u32) << BOOT_SECTOR_SHIFT,
        BOOT_SECTOR_SIZE,
        file,
        false,
    )?;
    println!("Wrote {} bytes to {:?}", BOOT_SECTOR_SIZE, file);
    Ok(())
}

fn read_range_to_file<L: ByteLink>(
    flash: &mut Flash<L>,
    start: u32,
    len: u32,
    path: &Path,
    append: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = if append {
        OpenOptions::new().append(true).create(true).open(path)
    } else {
        File::create(path)
    }
    .map_err(|e| format!("cannot open output file '{}': {}", path.display(), e))?;

    let pb = byte_progress(len as u64)?;

    let mut buf = [0u8; CHUNK_SIZE];
    let mut offset = 0u32;
    while offset < len {
        let chunk = ((len - offset) as usize).min(CHUNK_SIZE);
        flash.read_range(start + offset, &mut buf[..chunk]);
        file.write_all(&buf[..chunk])
            .map_err(|e| format!("cannot write to output file '{}': {}", path.display(), e))?;
        offset += chunk as u32;
        pb.set_position(offset as u64);
    }

    pb.finish_and_clear();
    Ok(())
}
