//! Identify command implementation

use norprog_core::protocol::EXPECTED_ID;
use norprog_core::{ByteLink, Flash};

/// Read and print the chip identifier bytes next to the expected ones.
pub fn run_id<L: ByteLink>(flash: &mut Flash<L>) -> Result<(), Box<dyn std::error::Error>> {
    let id = flash.identify();

    let fmt = |bytes: [u8; 4]| {
        bytes
            .iter()
            .map(|b| format!("0x{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("result should be    : {}", fmt(EXPECTED_ID));
    println!("result actually is  : {}", fmt(id));

    Ok(())
}
