//! Verify command implementation

use super::{byte_progress, CHUNK_SIZE};
use norprog_core::{ByteLink, Flash};
use std::path::Path;

/// Compare flash contents against a file; the first mismatch aborts
/// with address, file byte and chip byte.
pub fn run_verify_file<L: ByteLink>(
    flash: &mut Flash<L>,
    start: u32,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = super::program::read_source(path)?;

    let pb = byte_progress(data.len() as u64)?;
    for (i, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        flash.verify_range(start + (i * CHUNK_SIZE) as u32, chunk)?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    println!("Verified {} bytes at 0x{:06X}", data.len(), start);
    Ok(())
}
