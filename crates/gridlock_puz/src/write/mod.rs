mod error;

pub use error::*;

use std::io::{self, Write};

use crate::{Checksums, Puzzle};

/// Extension trait for [`Write`] with the primitive writes mirroring
/// [`PuzRead`](crate::PuzRead)
pub trait PuzWrite: Write {
    /// Write a [`u8`]
    fn write_u8(&mut self, val: u8) -> io::Result<()> {
        self.write_all(&[val])
    }

    /// Write a little-endian [`u16`]
    fn write_u16(&mut self, val: u16) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }

    /// Write a little-endian [`u32`]
    fn write_u32(&mut self, val: u32) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }

    /// Write the bytes followed by a terminating NUL
    ///
    /// # Assumptions
    /// The argument does not already include a terminating `\0` byte
    fn write_str0(&mut self, val: &[u8]) -> io::Result<()> {
        self.write_all(val)?;
        self.write_u8(b'\0')
    }
}

impl<W: Write> PuzWrite for W {}

/// Emitter for the binary container format
///
/// Freshly computed checksums are stamped into the emitted header; the
/// puzzle itself is left untouched. Extension sections are written in the
/// fixed order GRBS, RTBL, LTIM, GEXT, RUSR.
#[derive(Debug, Default)]
pub struct PuzWriter;

impl PuzWriter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn write<W: PuzWrite>(&self, writer: &mut W, puzzle: &Puzzle) -> Result<()> {
        let sums = Checksums::of(puzzle);

        let mut header = puzzle.header().clone();
        sums.stamp(&mut header);

        header.write_with(writer)?;
        puzzle.grids().write_with(writer)?;
        puzzle.strings().write_with(writer)?;
        puzzle.extras().write_with(writer, &sums)?;

        Ok(())
    }

    /// Convenience wrapper producing an owned buffer sized with
    /// [`Puzzle::size`]
    pub fn write_vec(&self, puzzle: &Puzzle) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(puzzle.size());
        self.write(&mut bytes, puzzle)?;

        Ok(bytes)
    }
}
