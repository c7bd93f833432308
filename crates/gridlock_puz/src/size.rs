use crate::{Header, Puzzle};

impl Puzzle {
    /// Bytes required to serialise the puzzle in the binary form
    ///
    /// This is exact: [`save`](Self::save) produces a buffer of precisely
    /// this length.
    pub fn size(&self) -> usize {
        Header::LEN + 2 * self.area() + self.strings().byte_len() + self.extras().byte_len()
    }
}

#[cfg(test)]
mod tests {
    use crate::{FileKind, Grids, Puzzle};
    use gridlock_core::{Timer, TimerState};
    use std::time::Duration;

    #[test]
    fn size_matches_the_emitted_length() {
        let mut puzzle = Puzzle::new();

        puzzle.set_dimensions(2, 2);
        puzzle.set_solution(b"AB.D").unwrap();
        let entries = Grids::blank_entries(&puzzle.grids().solution);
        puzzle.set_entries(entries.cells()).unwrap();

        puzzle.set_title("Sized");
        puzzle.set_clues([&b"One"[..], b"Two"]).unwrap();
        puzzle.set_rebus(&[1, 0, 0, 0], [&b" 0:ABC"[..]]).unwrap();
        puzzle.set_timer(Timer::new(Duration::from_secs(5), TimerState::Stopped));
        puzzle.set_styles(&[0x80, 0, 0, 0]).unwrap();
        puzzle
            .set_user_rebus(vec![Some(b"ABC".to_vec()), None, None, None])
            .unwrap();
        puzzle.commit_checksums();

        let bytes = puzzle.save(FileKind::Binary).unwrap();
        assert_eq!(puzzle.size(), bytes.len());
    }

    #[test]
    fn a_bare_puzzle_is_header_grids_and_nuls() {
        let mut puzzle = Puzzle::new();

        puzzle.set_dimensions(1, 1);
        puzzle.set_solution(b"A").unwrap();
        puzzle.set_entries(b"-").unwrap();

        // Header, two 1-byte grids, four NULs for the empty strings
        assert_eq!(puzzle.size(), 0x34 + 2 + 4);
    }
}
