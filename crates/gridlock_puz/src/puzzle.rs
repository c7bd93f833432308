use gridlock_core::{Board, Timer};

use crate::{
    Extras, Grids, Header, MAX_REBUS_LEN, PuzReader, PuzWriter, Rebus, Strings, UserRebus, format,
    read, write,
};

/// Which on-disk form to read or write
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Binary,
    Text,
    /// Sniff the format: text starts with `<` and keeps byte `0x0D`
    /// non-zero, everything else is binary
    #[default]
    Auto,
}

impl FileKind {
    fn name(self) -> &'static str {
        match self {
            FileKind::Binary => "binary",
            FileKind::Text => "text",
            FileKind::Auto => "auto",
        }
    }

    fn sniff(bytes: &[u8]) -> FileKind {
        match bytes.first() == Some(&b'<') && bytes.get(0x0D).is_some_and(|&byte| byte != 0) {
            true => FileKind::Text,
            false => FileKind::Binary,
        }
    }
}

/// An in-memory puzzle: the parsed header, both grids, the text block and
/// the extension sections
///
/// A fresh puzzle starts with the container defaults (signature, version
/// `1.2`, the `0x30` bitmask set to one) and everything else empty.
/// Mutators copy their inputs; all owned buffers live and die with the
/// puzzle. Checksums only become valid after
/// [`commit_checksums`](Self::commit_checksums).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Puzzle {
    header: Header,
    grids: Grids,
    strings: Strings,
    extras: Extras,
}

impl Puzzle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        header: Header,
        grids: Grids,
        strings: Strings,
        extras: Extras,
    ) -> Self {
        Self {
            header,
            grids,
            strings,
            extras,
        }
    }

    /// Parse a puzzle from an in-memory buffer
    ///
    /// An explicitly requested kind has to agree with what the buffer
    /// looks like; [`Auto`](FileKind::Auto) just takes the sniffed one.
    pub fn load(bytes: &[u8], kind: FileKind) -> read::Result<Self> {
        let sniffed = FileKind::sniff(bytes);

        match (kind, sniffed) {
            (FileKind::Binary | FileKind::Auto, FileKind::Binary) => {
                PuzReader::default().read(bytes)
            }
            (FileKind::Text | FileKind::Auto, FileKind::Text) => Self::load_text(bytes),

            (FileKind::Binary, _) | (FileKind::Text, _) => Err(read::Error {
                kind: read::ErrorKind::KindMismatch {
                    requested: kind.name(),
                    sniffed: sniffed.name(),
                },
                context: "Load".into(),
            }),
            (FileKind::Auto, FileKind::Auto) => unreachable!("sniffing is decisive"),
        }
    }

    #[cfg(feature = "text")]
    fn load_text(bytes: &[u8]) -> read::Result<Self> {
        crate::text::TxtReader::default()
            .read(bytes)
            .map_err(|err| read::Error {
                kind: err.into(),
                context: "Text puzzle".into(),
            })
    }

    #[cfg(not(feature = "text"))]
    fn load_text(_bytes: &[u8]) -> read::Result<Self> {
        Err(read::Error {
            kind: read::ErrorKind::TextDisabled,
            context: "Text puzzle".into(),
        })
    }

    /// Serialise the puzzle; only the binary form can be written
    pub fn save(&self, kind: FileKind) -> write::Result<Vec<u8>> {
        match kind {
            FileKind::Binary | FileKind::Auto => PuzWriter::new().write_vec(self),
            FileKind::Text => Err(write::Error {
                kind: write::ErrorKind::Unsupported { kind: "text" },
                context: "Text puzzle".into(),
            }),
        }
    }
}

/// # Components
impl Puzzle {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn grids(&self) -> &Grids {
        &self.grids
    }

    pub(crate) fn grids_mut(&mut self) -> &mut Grids {
        &mut self.grids
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    pub(crate) fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

/// # Accessors
impl Puzzle {
    pub fn width(&self) -> u8 {
        self.header.width
    }

    pub fn height(&self) -> u8 {
        self.header.height
    }

    pub fn area(&self) -> usize {
        self.header.area()
    }

    pub fn solution(&self) -> &[u8] {
        self.grids.solution.cells()
    }

    /// The player's entries, `-` for empty cells
    pub fn entries(&self) -> &[u8] {
        self.grids.entries.cells()
    }

    pub fn title(&self) -> &[u8] {
        &self.strings.title
    }

    pub fn author(&self) -> &[u8] {
        &self.strings.author
    }

    pub fn copyright(&self) -> &[u8] {
        &self.strings.copyright
    }

    pub fn notes(&self) -> &[u8] {
        &self.strings.notes
    }

    pub fn clue_count(&self) -> u16 {
        self.header.clue_count
    }

    pub fn clues(&self) -> &[Vec<u8>] {
        &self.strings.clues
    }

    pub fn clue(&self, n: usize) -> Option<&[u8]> {
        self.strings.clues.get(n).map(Vec::as_slice)
    }

    pub fn rebus(&self) -> Option<&Rebus> {
        self.extras.rebus.as_ref()
    }

    pub fn has_rebus(&self) -> bool {
        self.extras.rebus.is_some()
    }

    pub fn rebus_count(&self) -> usize {
        self.rebus().map_or(0, |rebus| rebus.table.len())
    }

    /// The rebus table in its on-disk `"k1:v1;k2:v2;"` form
    pub fn rebus_table_text(&self) -> Option<Vec<u8>> {
        self.rebus().map(Rebus::table_text)
    }

    pub fn timer(&self) -> Option<Timer> {
        self.extras.timer
    }

    pub fn has_timer(&self) -> bool {
        self.extras.timer.is_some()
    }

    /// The per-cell style overlay from `GEXT`
    pub fn styles(&self) -> Option<&Board> {
        self.extras.styles.as_ref()
    }

    pub fn has_styles(&self) -> bool {
        self.extras.styles.is_some()
    }

    pub fn user_rebus(&self) -> Option<&UserRebus> {
        self.extras.user_rebus.as_ref()
    }

    pub fn has_user_rebus(&self) -> bool {
        self.extras.user_rebus.is_some()
    }

    /// Whether any extension section is present at all
    pub fn has_extras(&self) -> bool {
        self.has_rebus() || self.has_timer() || self.has_styles() || self.has_user_rebus()
    }

    pub fn is_locked(&self) -> bool {
        self.header.is_locked()
    }

    /// Checksum of the real solution letters while locked
    pub fn locked_cksum(&self) -> u16 {
        self.header.scrambled_cksum
    }
}

/// # Mutators
impl Puzzle {
    /// Set the grid dimensions
    ///
    /// Boards and overlays are not resized; the grid and extension setters
    /// check against the new area.
    pub fn set_dimensions(&mut self, width: u8, height: u8) {
        self.header.width = width;
        self.header.height = height;
    }

    pub fn set_solution(&mut self, cells: &[u8]) -> format::Result<()> {
        self.grids.solution = self.sized_board("solution", cells)?;
        Ok(())
    }

    pub fn set_entries(&mut self, cells: &[u8]) -> format::Result<()> {
        self.grids.entries = self.sized_board("player", cells)?;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<Vec<u8>>) {
        self.strings.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<Vec<u8>>) {
        self.strings.author = author.into();
    }

    pub fn set_copyright(&mut self, copyright: impl Into<Vec<u8>>) {
        self.strings.copyright = copyright.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<Vec<u8>>) {
        self.strings.notes = notes.into();
    }

    /// Replace the whole clue array, keeping the header count in sync
    pub fn set_clues<I, C>(&mut self, clues: I) -> format::Result<()>
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let clues: Vec<Vec<u8>> = clues.into_iter().map(Into::into).collect();

        self.header.clue_count =
            u16::try_from(clues.len()).map_err(|_| format::Error::SizeOverflow {
                kind: "clues",
                size: clues.len(),
                max_size: usize::from(u16::MAX),
            })?;
        self.strings.clues = clues;

        Ok(())
    }

    pub fn set_clue(&mut self, n: usize, text: impl Into<Vec<u8>>) -> Option<&[u8]> {
        let clue = self.strings.clues.get_mut(n)?;
        *clue = text.into();

        Some(clue)
    }

    pub fn clear_clues(&mut self) {
        self.strings.clues.clear();
        self.header.clue_count = 0;
    }

    /// Install a rebus overlay together with its table
    ///
    /// The two only exist as a pair on disk, so they are set as one.
    pub fn set_rebus<I, C>(&mut self, overlay: &[u8], table: I) -> format::Result<()>
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let overlay = self.sized_board("rebus", overlay)?;

        self.extras.rebus = Some(Rebus {
            overlay,
            table: table.into_iter().map(Into::into).collect(),
        });

        Ok(())
    }

    /// Replace the rebus table from its on-disk `"k1:v1;k2:v2;"` form
    ///
    /// Only mutates an existing rebus; the overlay keeps deciding which
    /// cells point into the new table.
    pub fn set_rebus_table_text(&mut self, text: &[u8]) -> format::Result<()> {
        let rebus = self.extras.rebus.as_mut().ok_or(format::Error::MissingRebus)?;
        rebus.table = Rebus::parse_table(text);

        Ok(())
    }

    /// Empty the rebus table, leaving the overlay in place
    pub fn clear_rtbl(&mut self) {
        if let Some(rebus) = self.extras.rebus.as_mut() {
            rebus.table.clear();
        }

        self.extras.stored.rtbl = 0;
    }

    pub fn clear_rebus(&mut self) {
        self.extras.rebus = None;
        self.extras.stored.grbs = 0;
        self.extras.stored.rtbl = 0;
    }

    pub fn set_timer(&mut self, timer: Timer) {
        self.extras.timer = Some(timer);
    }

    pub fn clear_timer(&mut self) {
        self.extras.timer = None;
        self.extras.stored.ltim = 0;
    }

    pub fn set_styles(&mut self, overlay: &[u8]) -> format::Result<()> {
        self.extras.styles = Some(self.sized_board("style", overlay)?);
        Ok(())
    }

    pub fn clear_styles(&mut self) {
        self.extras.styles = None;
        self.extras.stored.gext = 0;
    }

    /// Install the player's rebus entries, one optional string per cell
    pub fn set_user_rebus(&mut self, cells: Vec<Option<Vec<u8>>>) -> format::Result<()> {
        if cells.len() != self.area() {
            return Err(self.area_mismatch("user rebus", cells.len()));
        }

        for cell in cells.iter().flatten() {
            if cell.len() > MAX_REBUS_LEN {
                return Err(format::Error::SizeOverflow {
                    kind: "user rebus entry",
                    size: cell.len(),
                    max_size: MAX_REBUS_LEN,
                });
            }
        }

        self.extras.user_rebus = Some(UserRebus { cells });
        Ok(())
    }

    pub fn clear_user_rebus(&mut self) {
        self.extras.user_rebus = None;
        self.extras.stored.rusr = 0;
    }

    fn sized_board(&self, kind: &'static str, cells: &[u8]) -> format::Result<Board> {
        if cells.len() != self.area() {
            return Err(self.area_mismatch(kind, cells.len()));
        }

        Ok(Board::from_vec(cells.to_vec(), self.width())?)
    }

    fn area_mismatch(&self, kind: &'static str, len: usize) -> format::Error {
        format::Error::AreaMismatch {
            kind,
            len,
            width: self.width(),
            height: self.height(),
            area: self.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grids;

    fn small_puzzle() -> Puzzle {
        let mut puzzle = Puzzle::new();

        puzzle.set_dimensions(3, 3);
        puzzle.set_solution(b"ABC.D.EFG").unwrap();
        let entries = Grids::blank_entries(&puzzle.grids().solution);
        puzzle.set_entries(entries.cells()).unwrap();

        puzzle.set_title("Tiny");
        puzzle.set_author("Nobody");
        puzzle
            .set_clues([&b"Alpha"[..], b"Bravo", b"Charlie", b"Delta"])
            .unwrap();

        puzzle
    }

    #[test]
    fn fresh_puzzles_carry_the_defaults() {
        let puzzle = Puzzle::new();

        assert_eq!(puzzle.header().signature, Header::SIGNATURE);
        assert_eq!(puzzle.header().x_unk_30, 1);
        assert_eq!(puzzle.clue_count(), 0);
        assert!(!puzzle.is_locked());
    }

    #[test]
    fn setters_keep_the_header_in_sync() {
        let mut puzzle = small_puzzle();

        assert_eq!(puzzle.clue_count(), 4);
        assert_eq!(puzzle.entries(), b"---.-.---");

        puzzle.clear_clues();
        assert_eq!(puzzle.clue_count(), 0);
    }

    #[test]
    fn grid_setters_check_the_area() {
        let mut puzzle = small_puzzle();

        assert!(matches!(
            puzzle.set_solution(b"TOOSHORT"),
            Err(format::Error::AreaMismatch { len: 8, .. })
        ));
    }

    #[test]
    fn the_rebus_table_can_be_replaced_and_cleared_alone() {
        let mut puzzle = small_puzzle();
        puzzle
            .set_rebus(&[1, 0, 0, 0, 0, 0, 0, 0, 2], [&b" 0:ONE"[..]])
            .unwrap();

        puzzle.set_rebus_table_text(b" 0:HEART; 1:SPADE;").unwrap();
        assert_eq!(puzzle.rebus_count(), 2);
        assert_eq!(
            puzzle.rebus_table_text().unwrap(),
            b" 0:HEART; 1:SPADE;".to_vec()
        );

        // Clearing the table keeps the overlay
        puzzle.clear_rtbl();
        assert_eq!(puzzle.rebus_count(), 0);
        assert!(puzzle.has_rebus());
    }

    #[test]
    fn the_table_setter_needs_an_overlay() {
        let mut puzzle = small_puzzle();

        assert!(matches!(
            puzzle.set_rebus_table_text(b" 0:LOST;"),
            Err(format::Error::MissingRebus)
        ));
    }

    #[test]
    fn extras_presence_is_aggregated() {
        let mut puzzle = small_puzzle();
        assert!(!puzzle.has_extras());

        puzzle.set_timer(Timer::default());
        assert!(puzzle.has_extras());

        puzzle.clear_timer();
        assert!(!puzzle.has_extras());
    }

    #[test]
    fn oversized_user_rebus_entries_are_rejected() {
        let mut puzzle = small_puzzle();
        let mut cells = vec![None; 9];
        cells[0] = Some(vec![b'X'; MAX_REBUS_LEN + 1]);

        assert!(puzzle.set_user_rebus(cells).is_err());
    }

    #[test]
    fn committed_checksums_verify_clean() {
        let mut puzzle = small_puzzle();

        assert_ne!(puzzle.verify(), 0);

        puzzle.commit_checksums();
        assert_eq!(puzzle.verify(), 0);
    }

    #[test]
    fn binary_sniffing_recognises_text() {
        let text = b"<ACROSS PUZZLE>\n<TITLE>\n";
        assert_eq!(FileKind::sniff(text), FileKind::Text);

        let binary = [0u8; 0x34];
        assert_eq!(FileKind::sniff(&binary), FileKind::Binary);
    }
}
