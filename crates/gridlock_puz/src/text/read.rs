use crate::{Grids, Puzzle, text};

/// The sections of the authoring format, in the order their markers have
/// to appear
///
/// Each variant covers the lines between its own marker and the next one;
/// [`Init`](Section::Init) covers anything before the file marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Init,
    File,
    Title,
    Author,
    Copyright,
    Size,
    Grid,
    Across,
    Down,
}

impl Section {
    /// The marker that closes this section and opens the next one
    fn next_marker(self) -> Option<(&'static str, Section)> {
        match self {
            Section::Init => Some(("<ACROSS PUZZLE>", Section::File)),
            Section::File => Some(("<TITLE>", Section::Title)),
            Section::Title => Some(("<AUTHOR>", Section::Author)),
            Section::Author => Some(("<COPYRIGHT>", Section::Copyright)),
            Section::Copyright => Some(("<SIZE>", Section::Size)),
            Section::Size => Some(("<GRID>", Section::Grid)),
            Section::Grid => Some(("<ACROSS>", Section::Across)),
            Section::Across => Some(("<DOWN>", Section::Down)),
            Section::Down => None,
        }
    }
}

/// Reader for the authoring text format
///
/// ```
/// use gridlock_puz::text::TxtReader;
///
/// let input = b"<ACROSS PUZZLE>\n<TITLE>\nTiny\n<AUTHOR>\nA. Setter\n\
///               <COPYRIGHT>\n<SIZE>\n2x2\n<GRID>\nAB\nC.\n\
///               <ACROSS>\nFirst\nSecond\n<DOWN>\nThird\n";
/// let puzzle = TxtReader::default().read(input).unwrap();
///
/// assert_eq!(puzzle.title(), b"Tiny");
/// assert_eq!(puzzle.clue_count(), 3);
/// assert_eq!(puzzle.verify(), 0);
/// ```
#[derive(Debug, Default)]
pub struct TxtReader;

impl TxtReader {
    pub fn read(&self, bytes: &[u8]) -> text::Result<Puzzle> {
        let mut puzzle = Puzzle::new();
        let mut section = Section::Init;
        let mut lines: Vec<Vec<u8>> = Vec::new();

        for line in split_lines(bytes) {
            let line = line.trim_ascii();

            if line.first() == Some(&b'<') {
                let (marker, next) = section.next_marker().ok_or(text::Error::BadMarker {
                    expected: "end of input",
                    found: String::from_utf8_lossy(line).into_owned(),
                })?;

                if line != marker.as_bytes() {
                    return Err(text::Error::BadMarker {
                        expected: marker,
                        found: String::from_utf8_lossy(line).into_owned(),
                    });
                }

                self.flush(&mut puzzle, section, &mut lines)?;
                section = next;
            } else if !line.is_empty() {
                lines.push(line.to_vec());
            }
        }

        // The clue list only ends with the input itself
        if let Some((marker, _)) = section.next_marker() {
            return Err(text::Error::MissingMarker { expected: marker });
        }

        self.flush(&mut puzzle, section, &mut lines)?;
        puzzle.commit_checksums();

        Ok(puzzle)
    }

    /// Commit the accumulated lines of the section that is being closed
    fn flush(
        &self,
        puzzle: &mut Puzzle,
        section: Section,
        lines: &mut Vec<Vec<u8>>,
    ) -> text::Result<()> {
        match section {
            // Anything before the title marker is ignored
            Section::Init | Section::File => {}

            Section::Title => puzzle.set_title(concat(lines)),
            Section::Author => puzzle.set_author(concat(lines)),
            Section::Copyright => puzzle.set_copyright(concat(lines)),

            Section::Size => {
                let (width, height) = parse_size(&concat(lines))?;
                puzzle.set_dimensions(width, height);
            }

            Section::Grid => {
                puzzle.set_solution(&concat(lines))?;
                let entries = Grids::blank_entries(&puzzle.grids().solution);
                puzzle.set_entries(entries.cells())?;
            }

            // Across clues stay in the accumulator so that the downs are
            // appended behind them
            Section::Across => return Ok(()),

            Section::Down => {
                puzzle.set_clues(std::mem::take(lines))?;
            }
        }

        lines.clear();
        Ok(())
    }
}

fn concat(lines: &[Vec<u8>]) -> Vec<u8> {
    lines.concat()
}

fn parse_size(text: &[u8]) -> text::Result<(u8, u8)> {
    let err = || text::Error::BadSize {
        found: String::from_utf8_lossy(text).into_owned(),
    };

    let text = std::str::from_utf8(text).map_err(|_| err())?;
    let (width, height) = text.split_once('x').ok_or_else(err)?;

    Ok((
        width.trim().parse().map_err(|_| err())?,
        height.trim().parse().map_err(|_| err())?,
    ))
}

/// Split on `\n`, `\r\n` or a bare `\r`
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = bytes;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let end = rest
            .iter()
            .position(|&byte| byte == b'\r' || byte == b'\n')
            .unwrap_or(rest.len());
        let line = &rest[..end];

        rest = match rest.get(end..=end + 1) {
            Some(b"\r\n") => &rest[end + 2..],
            _ => &rest[(end + 1).min(rest.len())..],
        };

        Some(line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const INPUT: &[u8] = b"<ACROSS PUZZLE>\r\n\
        <TITLE>\r\nA Text Puzzle\r\n\
        <AUTHOR>\r\nSome Author\r\n\
        <COPYRIGHT>\r\n(c) 2006\r\n\
        <SIZE>\r\n3x3\r\n\
        <GRID>\r\nABC\r\n.D.\r\nEFG\r\n\
        <ACROSS>\r\nFirst across\r\nSecond across\r\n\
        <DOWN>\r\nFirst down\r\nSecond down\r\n";

    #[test]
    fn a_full_file_populates_the_puzzle() {
        let puzzle = TxtReader::default().read(INPUT).unwrap();

        assert_eq!(puzzle.title(), b"A Text Puzzle");
        assert_eq!(puzzle.author(), b"Some Author");
        assert_eq!(puzzle.copyright(), b"(c) 2006");
        assert_eq!((puzzle.width(), puzzle.height()), (3, 3));
        assert_eq!(puzzle.solution(), b"ABC.D.EFG");
        assert_eq!(puzzle.entries(), b"---.-.---");

        // Across clues come first, downs behind them
        assert_eq!(puzzle.clue_count(), 4);
        assert_eq!(puzzle.clue(0), Some(b"First across".as_slice()));
        assert_eq!(puzzle.clue(3), Some(b"Second down".as_slice()));

        // The reader commits checksums on the way out
        assert_eq!(puzzle.verify(), 0);
    }

    #[test]
    fn markers_out_of_order_are_rejected() {
        let input = b"<ACROSS PUZZLE>\n<AUTHOR>\n";

        assert!(matches!(
            TxtReader::default().read(input),
            Err(text::Error::BadMarker {
                expected: "<TITLE>",
                ..
            })
        ));
    }

    #[test]
    fn truncated_input_names_the_missing_marker() {
        let input = b"<ACROSS PUZZLE>\n<TITLE>\nTiny\n";

        assert!(matches!(
            TxtReader::default().read(input),
            Err(text::Error::MissingMarker {
                expected: "<AUTHOR>"
            })
        ));
    }

    #[rstest]
    #[case(b"3x".as_slice())]
    #[case(b"three by three".as_slice())]
    #[case(b"300x3".as_slice())]
    fn bad_sizes_are_rejected(#[case] size: &[u8]) {
        assert!(parse_size(size).is_err());
    }

    #[test]
    fn line_splitting_handles_every_ending() {
        let lines: Vec<&[u8]> = split_lines(b"a\r\nb\nc\rd").collect();

        assert_eq!(lines, [b"a".as_slice(), b"b", b"c", b"d"]);
    }
}
