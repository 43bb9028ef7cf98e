//! norprog - NOR flash programmer for the nibble-bus serial board
//!
//! Talks to a board that exposes a parallel NOR flash bus over a
//! serial line, one nibble latch per byte. The session owns the bus
//! end to end: open, prime the latches, reset the chip, run exactly
//! one command, then return the chip to standby and drain the line on
//! every exit path.

use clap::Parser;
use norprog::cli::Cli;
use norprog::commands;
use norprog_core::Flash;
use norprog_serial::SerialLink;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {}
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let link = SerialLink::open(&cli.port)?;
    let mut flash = Flash::new(link);
    flash.init();

    let result = commands::dispatch(&mut flash, cli.command);

    // Safe shutdown on success and failure alike: standby, drain the
    // line, give the board a moment, then let drop close the port.
    flash.standby();
    flash.drain();
    std::thread::sleep(Duration::from_secs(1));

    result
}
