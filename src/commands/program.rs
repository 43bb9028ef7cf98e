//! Program command implementations

use super::{byte_progress, CHUNK_SIZE};
use norprog_core::protocol::FLASH_SIZE;
use norprog_core::{ByteLink, Error, Flash};
use std::fs;
use std::path::Path;

/// Program a single byte.
pub fn run_program_byte<L: ByteLink>(
    flash: &mut Flash<L>,
    addr: u32,
    data: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    flash.program_byte(addr, data);
    println!("Programmed 0x{:02X} at 0x{:06X}", data, addr);
    Ok(())
}

/// Program a whole file starting at `start`, using the chip's
/// buffered write protocol: one unlock prefix and one completion poll
/// for the entire file.
pub fn run_program_file<L: ByteLink>(
    flash: &mut Flash<L>,
    start: u32,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_source(path)?;

    let pb = byte_progress(data.len() as u64)?;
    let mut session = flash.begin_program(start, data.len() as u64)?;
    for chunk in data.chunks(CHUNK_SIZE) {
        session.write(chunk);
        pb.inc(chunk.len() as u64);
    }
    session.finish();
    pb.finish_and_clear();

    println!("Programmed {} bytes at 0x{:06X}", data.len(), start);
    Ok(())
}

/// Read a source file, rejecting anything bigger than the chip before
/// a single byte goes over the link.
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let size = fs::metadata(path)
        .map_err(|e| format!("cannot open input file '{}': {}", path.display(), e))?
        .len();
    if size > FLASH_SIZE as u64 {
        return Err(Error::FileTooLarge {
            size,
            max: FLASH_SIZE as u64,
        }
        .into());
    }
    fs::read(path).map_err(|e| format!("cannot read from input file '{}': {}", path.display(), e).into())
}
