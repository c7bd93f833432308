use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Per-cell flag byte carried by the `GEXT` overlay
    ///
    /// The four known bits are
    /// - [`PREVIOUSLY_INCORRECT`](CellStyle::PREVIOUSLY_INCORRECT) (`0x10`) for a cell that once held a wrong entry
    /// - [`INCORRECT`](CellStyle::INCORRECT) (`0x20`) for a cell currently marked wrong
    /// - [`REVEALED`](CellStyle::REVEALED) (`0x40`) for a cell whose solution was given away
    /// - [`CIRCLED`](CellStyle::CIRCLED) (`0x80`) for a circled cell
    ///
    /// Unknown bits are preserved rather than rejected; the overlay is
    /// carried verbatim on a round-trip.
    #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
    #[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
    pub struct CellStyle: u8 {
        /// Cell previously held an incorrect entry
        const PREVIOUSLY_INCORRECT = 1 << 4;

        /// Cell currently holds an incorrect entry
        const INCORRECT            = 1 << 5;

        /// Cell solution was revealed to the player
        const REVEALED             = 1 << 6;

        /// Cell is circled
        const CIRCLED              = 1 << 7;
    }
}

impl CellStyle {
    /// Interpret a raw overlay byte, keeping any bits outside the known set
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    pub fn is_circled(&self) -> bool {
        self.contains(CellStyle::CIRCLED)
    }
}

impl fmt::Display for CellStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks = [
            (CellStyle::CIRCLED, '@'),
            (CellStyle::REVEALED, '*'),
            (CellStyle::INCORRECT, '!'),
            (CellStyle::PREVIOUSLY_INCORRECT, '~'),
        ];

        for (style, mark) in marks {
            if self.contains(style) {
                write!(f, "{mark}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_survive() {
        let style = CellStyle::from_byte(0x83);

        assert!(style.is_circled());
        assert_eq!(style.bits(), 0x83);
    }
}
