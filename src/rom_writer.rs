//! The ROM-programming transport: a pure big-endian bit-packing function plus
//! the `RomProgrammer` trait pinning how packed words reach a board. No real
//! serial-hardware crate is part of this project's dependency stack, so the
//! only shipped implementation is a dry-run logger; wiring an actual device
//! is left to a downstream integration.

use anyhow::Result;

pub trait RomProgrammer {
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }
    fn write(&mut self, address: usize, bytes: &[u8]) -> Result<()>;
    fn end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Packs a `W`-bit ASCII binary word into `⌈W/8⌉` big-endian bytes. The final
/// byte, when `W` is not a multiple of 8, holds just the trailing bits
/// without padding, matching how the board's program interprets a short
/// final chunk.
pub fn pack_word(word: &str) -> Vec<u8> {
    word.as_bytes()
        .chunks(8)
        .map(|chunk| {
            let text = std::str::from_utf8(chunk).expect("word is ASCII binary digits");
            u8::from_str_radix(text, 2).expect("word contains only '0'/'1' characters")
        })
        .collect()
}

/// Dry-run backend: logs what it would send instead of talking to a board.
#[derive(Default)]
pub struct DryRunProgrammer;

impl RomProgrammer for DryRunProgrammer {
    fn begin(&mut self) -> Result<()> {
        tracing::info!("dry run: would begin ROM programming session");
        Ok(())
    }

    fn write(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        tracing::info!(address, bytes = ?bytes, "dry run: would write word to board");
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        tracing::info!("dry run: would end ROM programming session");
        Ok(())
    }
}

/// Drives a `RomProgrammer` over the assembled words, one `write` per
/// machine address.
pub fn program(words: &[String], programmer: &mut impl RomProgrammer) -> Result<()> {
    programmer.begin()?;
    for (address, word) in words.iter().enumerate() {
        programmer.write(address, &pack_word(word))?;
    }
    programmer.end()?;
    Ok(())
}
