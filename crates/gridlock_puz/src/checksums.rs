use crate::{
    Header, Puzzle, Strings,
    extras::{StoredSums, timer_text},
    read::{self, ReadState},
};

/// XOR mask over the low checksum bytes at offset `0x10`
pub const MASK_10: [u8; 4] = *b"ICHE";
/// XOR mask over the high checksum bytes at offset `0x14`
pub const MASK_14: [u8; 4] = *b"ATED";

/// The rolling checksum every region of the file is summed with
///
/// Per byte: rotate the running value right by one (the dropped bit
/// re-enters at bit 15), then add the byte with natural 16-bit wrap. The
/// seed is the initial running value, which is how regions chain: the sum
/// of region `n` seeds region `n + 1`.
pub fn region_checksum(region: &[u8], seed: u16) -> u16 {
    let mut checksum = seed;

    for &byte in region {
        checksum = checksum.rotate_right(1);
        checksum = checksum.wrapping_add(u16::from(byte));
    }

    checksum
}

/// Sum a string together with its terminating NUL; an empty string
/// contributes nothing at all
fn str0_checksum(bytes: &[u8], seed: u16) -> u16 {
    if bytes.is_empty() {
        return seed;
    }

    region_checksum(&[0], region_checksum(bytes, seed))
}

/// Chain the text block: title, author, copyright and notes with their
/// NULs, every clue without one
fn text_checksum(strings: &Strings, seed: u16) -> u16 {
    let mut checksum = seed;

    checksum = str0_checksum(&strings.title, checksum);
    checksum = str0_checksum(&strings.author, checksum);
    checksum = str0_checksum(&strings.copyright, checksum);

    for clue in &strings.clues {
        checksum = region_checksum(clue, checksum);
    }

    str0_checksum(&strings.notes, checksum)
}

/// Every checksum a container file carries, freshly computed from a puzzle
///
/// The four component sums (header summary, solution, player grid, text
/// block) feed the masked magic arrays; the primary file checksum chains
/// all of them, seeded with the summary sum. Extension sums are zero when
/// the section is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksums {
    /// The primary checksum stored at offset 0
    pub file: u16,

    /// Component sums: header summary (CIB), solution, player grid, text
    pub cib: u16,
    pub solution: u16,
    pub entries: u16,
    pub text: u16,

    /// The masked low/high component bytes at `0x10` and `0x14`
    pub magic_10: [u8; 4],
    pub magic_14: [u8; 4],

    /// Extension sums
    pub grbs: u16,
    pub rtbl: u16,
    pub ltim: u16,
    pub gext: u16,
    pub rusr: u16,
}

impl Checksums {
    pub fn of(puzzle: &Puzzle) -> Self {
        let header = puzzle.header();
        let grids = puzzle.grids();
        let strings = puzzle.strings();
        let extras = puzzle.extras();

        let cib = region_checksum(&header.cib(), 0);
        let solution = region_checksum(grids.solution.cells(), 0);
        let entries = region_checksum(grids.entries.cells(), 0);
        let text = text_checksum(strings, 0);

        // The primary sum chains the whole body, seeded with the CIB sum
        let mut file = cib;
        file = region_checksum(grids.solution.cells(), file);
        file = region_checksum(grids.entries.cells(), file);
        file = text_checksum(strings, file);

        let sums = [cib, solution, entries, text];

        let (grbs, rtbl) = match &extras.rebus {
            None => (0, 0),
            Some(rebus) => (
                region_checksum(rebus.overlay.cells(), 0),
                region_checksum(&rebus.table_text(), 0),
            ),
        };

        let ltim = extras
            .timer
            .as_ref()
            .map_or(0, |timer| region_checksum(&timer_text(timer), 0));

        let gext = extras
            .styles
            .as_ref()
            .map_or(0, |styles| region_checksum(styles.cells(), 0));

        let rusr = extras
            .user_rebus
            .as_ref()
            .map_or(0, |rusr| region_checksum(&rusr.wire_bytes(), 0));

        Self {
            file,
            cib,
            solution,
            entries,
            text,
            magic_10: magic_bytes(sums, MASK_10, 0),
            magic_14: magic_bytes(sums, MASK_14, 1),
            grbs,
            rtbl,
            ltim,
            gext,
            rusr,
        }
    }

    /// The component sums in header order
    pub fn sums(&self) -> [u16; 4] {
        [self.cib, self.solution, self.entries, self.text]
    }

    /// Copy the computed header values into a header
    pub(crate) fn stamp(&self, header: &mut Header) {
        header.cksum_puz = self.file;
        header.cksum_cib = self.cib;
        header.magic_10 = self.magic_10;
        header.magic_14 = self.magic_14;
    }

    pub(crate) fn stored_sums(&self) -> StoredSums {
        StoredSums {
            grbs: self.grbs,
            rtbl: self.rtbl,
            ltim: self.ltim,
            gext: self.gext,
            rusr: self.rusr,
        }
    }
}

/// One masked magic array: the low (`half == 0`) or high (`half == 1`)
/// byte of each component sum XORed with its mask byte
fn magic_bytes(sums: [u16; 4], mask: [u8; 4], half: usize) -> [u8; 4] {
    std::array::from_fn(|i| sums[i].to_le_bytes()[half] ^ mask[i])
}

impl Puzzle {
    /// Compute every checksum from the current contents
    pub fn checksums(&self) -> Checksums {
        Checksums::of(self)
    }

    /// Compute the checksums and store them in the header and the
    /// extension records
    pub fn commit_checksums(&mut self) {
        let sums = Checksums::of(self);

        sums.stamp(self.header_mut());
        self.extras_mut().stored = sums.stored_sums();
    }

    /// Compare every stored checksum against a freshly computed one and
    /// return the number of disagreements; zero means the puzzle passes
    pub fn verify(&self) -> usize {
        self.checksum_mismatches().len()
    }

    fn checksum_mismatches(&self) -> Vec<(String, u16, u16)> {
        let header = self.header();
        let extras = self.extras();
        let sums = Checksums::of(self);

        let mut fields: Vec<(String, u16, u16)> = vec![
            ("CIB".into(), header.cksum_cib, sums.cib),
            ("File".into(), header.cksum_puz, sums.file),
        ];

        for i in 0..4 {
            fields.push((
                format!("Magic 10 #{}", i + 1),
                u16::from(header.magic_10[i]),
                u16::from(sums.magic_10[i]),
            ));
            fields.push((
                format!("Magic 14 #{}", i + 1),
                u16::from(header.magic_14[i]),
                u16::from(sums.magic_14[i]),
            ));
        }

        if extras.rebus.is_some() {
            fields.push(("GRBS".into(), extras.stored.grbs, sums.grbs));
            fields.push(("RTBL".into(), extras.stored.rtbl, sums.rtbl));
        }
        if extras.timer.is_some() {
            fields.push(("LTIM".into(), extras.stored.ltim, sums.ltim));
        }
        if extras.styles.is_some() {
            fields.push(("GEXT".into(), extras.stored.gext, sums.gext));
        }
        if extras.user_rebus.is_some() {
            fields.push(("RUSR".into(), extras.stored.rusr, sums.rusr));
        }

        fields
            .into_iter()
            .filter(|(kind, stored, computed)| {
                let mismatch = stored != computed;

                if mismatch {
                    tracing::debug!(
                        "{kind} checksum mismatch: stored {stored:#06x}, computed {computed:#06x}"
                    );
                }

                mismatch
            })
            .collect()
    }

    /// Strict reading treats any stored/computed disagreement as an error;
    /// lenient reading downgrades them to warnings
    pub(crate) fn validate_checksums(&self, state: &mut ReadState) -> read::Result<()> {
        for (kind, stored, computed) in self.checksum_mismatches() {
            let result: read::Result<()> = Err(read::Error {
                kind: read::ErrorKind::InvalidChecksum {
                    kind: kind.clone(),
                    stored,
                    computed,
                },
                context: kind,
            });

            state.ok_or_warn(result)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 0, 0)]
    #[case(&[], 0xBEEF, 0xBEEF)]
    #[case(&[0x41], 0, 0x0041)]
    #[case(&[0x41, 0x42], 0, 0x8062)]
    fn kernel_vectors(#[case] region: &[u8], #[case] seed: u16, #[case] expected: u16) {
        assert_eq!(region_checksum(region, seed), expected);
    }

    #[test]
    fn kernel_is_seed_dependent() {
        // Seeding with 0x41 rotates into 0x8020 before the byte is added
        assert_eq!(region_checksum(&[0x41], 0x41), 0x8061);
        assert_ne!(region_checksum(&[0x41], 0x41), region_checksum(&[0x41], 0));
    }

    #[test]
    fn magic_mask_vectors() {
        let sums = [0x1234, 0x5678, 0x9ABC, 0xDEF0];

        assert_eq!(
            magic_bytes(sums, MASK_10, 0),
            [0x7D, 0x3B, 0xF4, 0xB5]
        );
        assert_eq!(
            magic_bytes(sums, MASK_14, 1),
            [0x53, 0x02, 0xDF, 0x9A]
        );
    }

    #[test]
    fn masked_bytes_recombine_into_the_sums() {
        let sums = [0x0000, 0x0102, 0xFFFF, 0x8421];
        let low = magic_bytes(sums, MASK_10, 0);
        let high = magic_bytes(sums, MASK_14, 1);

        for i in 0..4 {
            let recombined =
                u16::from(low[i] ^ MASK_10[i]) | (u16::from(high[i] ^ MASK_14[i]) << 8);
            assert_eq!(recombined, sums[i]);
        }
    }

    #[test]
    fn empty_strings_leave_the_chain_untouched() {
        let with_title = Strings {
            title: b"T".to_vec(),
            ..Default::default()
        };
        let without = Strings::default();

        assert_eq!(text_checksum(&without, 0x1234), 0x1234);
        assert_ne!(text_checksum(&with_title, 0x1234), 0x1234);
    }

    #[test]
    fn clues_are_summed_without_their_nul() {
        let strings = Strings {
            clues: vec![b"AB".to_vec()],
            ..Default::default()
        };

        assert_eq!(text_checksum(&strings, 0), region_checksum(b"AB", 0));
    }
}
