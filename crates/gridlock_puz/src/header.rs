use gridlock_core::Version;

use crate::{Context, PuzRead, PuzWrite, format, read, write};

/// The fixed 0x34-byte prefix of a container file
///
/// Everything is kept exactly as read, including the two "noise" regions
/// that carry whatever happened to sit in the writing program's memory;
/// they round-trip verbatim and are never normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    // Checksums as stored in the file
    pub cksum_puz: u16,
    pub cksum_cib: u16,
    pub magic_10: [u8; 4],
    pub magic_14: [u8; 4],

    // Identity
    pub signature: [u8; 12],
    pub version: [u8; 4],

    // Solution lock
    pub scrambled_cksum: u16,
    pub scrambled_tag: u16,

    // Dimensions and counts
    pub width: u8,
    pub height: u8,
    pub clue_count: u16,
    pub x_unk_30: u16,

    // Unwritten-memory noise, preserved for byte-exact round-trips
    pub noise_1c: [u8; 2],
    pub noise_20: [u8; 12],
}

impl Header {
    /// `"ACROSS&DOWN\0"`
    pub const SIGNATURE: [u8; 12] = *b"ACROSS&DOWN\0";

    /// Size of the fixed prefix
    pub const LEN: usize = 0x34;

    /// Number of cells in the grid
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// The 8-byte checksummable header summary: width, height, clue count,
    /// the `0x30` bitmask and the lock tag, shorts in little-endian
    pub fn cib(&self) -> [u8; 8] {
        let [clues_lo, clues_hi] = self.clue_count.to_le_bytes();
        let [unk_lo, unk_hi] = self.x_unk_30.to_le_bytes();
        let [tag_lo, tag_hi] = self.scrambled_tag.to_le_bytes();

        [
            self.width, self.height, clues_lo, clues_hi, unk_lo, unk_hi, tag_lo, tag_hi,
        ]
    }

    /// The parsed form of the raw version bytes
    pub fn parsed_version(&self) -> format::Result<Version> {
        Ok(Version::new(&self.version)?)
    }

    /// Whether the solution is scrambled
    pub fn is_locked(&self) -> bool {
        self.scrambled_tag != 0
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            cksum_puz: 0,
            cksum_cib: 0,
            magic_10: [0; 4],
            magic_14: [0; 4],
            signature: Self::SIGNATURE,
            version: Version::default().as_bytes(),
            scrambled_cksum: 0,
            scrambled_tag: 0,
            width: 0,
            height: 0,
            clue_count: 0,
            x_unk_30: 1,
            noise_1c: [0; 2],
            noise_20: [0; 12],
        }
    }
}

/// # Read
impl Header {
    pub(crate) fn read_from<R: PuzRead>(reader: &mut R) -> read::Result<Self> {
        let cksum_puz = reader.read_u16().context("File checksum")?;
        let signature = reader.read_slice::<12>().context("Signature")?;

        let cksum_cib = reader.read_u16().context("CIB checksum")?;
        let magic_10 = reader.read_slice::<4>().context("Magic 10")?;
        let magic_14 = reader.read_slice::<4>().context("Magic 14")?;
        let version = reader.read_slice::<4>().context("Version")?;

        let noise_1c = reader.read_slice::<2>().context("Noise 1C")?;
        let scrambled_cksum = reader.read_u16().context("Scrambled checksum")?;
        let noise_20 = reader.read_slice::<12>().context("Noise 20")?;

        let width = reader.read_u8().context("Width")?;
        let height = reader.read_u8().context("Height")?;
        let clue_count = reader.read_u16().context("Clue count")?;
        let x_unk_30 = reader.read_u16().context("Bitmask 30")?;
        let scrambled_tag = reader.read_u16().context("Scrambled tag")?;

        Ok(Header {
            cksum_puz,
            cksum_cib,
            magic_10,
            magic_14,
            signature,
            version,
            scrambled_cksum,
            scrambled_tag,
            width,
            height,
            clue_count,
            x_unk_30,
            noise_1c,
            noise_20,
        })
    }
}

/// # Write
impl Header {
    pub(crate) fn write_with<W: PuzWrite>(&self, writer: &mut W) -> write::Result<()> {
        writer.write_u16(self.cksum_puz).context("File checksum")?;
        writer.write_all(&self.signature).context("Signature")?;

        writer.write_u16(self.cksum_cib).context("CIB checksum")?;
        writer.write_all(&self.magic_10).context("Magic 10")?;
        writer.write_all(&self.magic_14).context("Magic 14")?;
        writer.write_all(&self.version).context("Version")?;

        writer.write_all(&self.noise_1c).context("Noise 1C")?;
        writer
            .write_u16(self.scrambled_cksum)
            .context("Scrambled checksum")?;
        writer.write_all(&self.noise_20).context("Noise 20")?;

        writer.write_u8(self.width).context("Width")?;
        writer.write_u8(self.height).context("Height")?;
        writer.write_u16(self.clue_count).context("Clue count")?;
        writer.write_u16(self.x_unk_30).context("Bitmask 30")?;
        writer
            .write_u16(self.scrambled_tag)
            .context("Scrambled tag")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn defaults_match_a_fresh_file() {
        let header = Header::default();

        assert_eq!(header.signature, *b"ACROSS&DOWN\0");
        assert_eq!(header.version, *b"1.2\0");
        assert_eq!(header.x_unk_30, 1);
        assert!(!header.is_locked());
    }

    #[test]
    fn cib_packs_the_summary_little_endian() {
        let header = Header {
            width: 15,
            height: 15,
            clue_count: 0x0102,
            x_unk_30: 1,
            scrambled_tag: 4,
            ..Default::default()
        };

        assert_eq!(header.cib(), [15, 15, 0x02, 0x01, 1, 0, 4, 0]);
    }

    #[test]
    fn prefix_round_trips() {
        let header = Header {
            cksum_puz: 0xBEEF,
            width: 3,
            height: 5,
            clue_count: 7,
            noise_1c: [0xAA, 0xBB],
            noise_20: *b"\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0A\x0B\x0C",
            ..Default::default()
        };

        let mut bytes = Vec::new();
        header.write_with(&mut bytes).unwrap();
        assert_eq!(bytes.len(), Header::LEN);

        let reread = Header::read_from(&mut Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(reread, header);
    }
}
