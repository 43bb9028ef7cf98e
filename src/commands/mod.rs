//! Command implementations

pub mod check;
pub mod erase;
pub mod identify;
pub mod program;
pub mod read;
pub mod verify;

use crate::cli::Command;
use indicatif::{ProgressBar, ProgressStyle};
use norprog_core::{ByteLink, Error, Flash};

/// Run one command against an initialized flash board.
pub fn dispatch<L: ByteLink>(
    flash: &mut Flash<L>,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Id => identify::run_id(flash),
        Command::EraseChip => erase::run_erase_chip(flash),
        Command::EraseSector { sector } => erase::run_erase_sector(flash, sector),
        Command::EraseBoot { sector } => erase::run_erase_boot(flash, sector),
        Command::CheckChip => Err(Error::Unsupported { op: "checking" }.into()),
        Command::CheckSector { sector } => check::run_check_sector(flash, sector),
        Command::CheckBoot { sector } => check::run_check_boot(flash, sector),
        Command::ReadChip { .. } => Err(Error::Unsupported { op: "reading" }.into()),
        Command::ReadSector { sector, file } => read::run_read_sector(flash, sector, &file),
        Command::ReadBoot { sector, file } => read::run_read_boot(flash, sector, &file),
        Command::ProgramByte { addr, data } => program::run_program_byte(flash, addr, data),
        Command::Program { addr, file } => program::run_program_file(flash, addr, &file),
        Command::Verify { addr, file } => verify::run_verify_file(flash, addr, &file),
    }
}

/// Chunk size the commands iterate the core range operations with.
pub(crate) const CHUNK_SIZE: usize = 4096;

/// Byte-granular progress bar in the house style.
pub(crate) fn byte_progress(total: u64) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
