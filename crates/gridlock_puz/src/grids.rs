use gridlock_core::Board;

use crate::{Context, PuzRead, PuzWrite, format, read, write};

/// Marks a black square in both grids
pub const BLACK_CELL: u8 = b'.';
/// Marks an unfilled playable cell in the player grid
pub const EMPTY_CELL: u8 = b'-';

/// The two cell grids of a puzzle: the solution and the player's entries
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Grids {
    pub solution: Board,
    pub entries: Board,
}

impl Grids {
    /// Derive the pristine player grid from a solution: black squares stay,
    /// everything else becomes an empty cell
    pub fn blank_entries(solution: &Board) -> Board {
        solution.map(|cell| match cell {
            BLACK_CELL => BLACK_CELL,
            _ => EMPTY_CELL,
        })
    }

    pub fn validate(&self) -> format::Result<()> {
        for (kind, board, spare) in [
            ("solution", &self.solution, None),
            ("player", &self.entries, Some(EMPTY_CELL)),
        ] {
            for (index, &cell) in board.cells().iter().enumerate() {
                let valid =
                    cell == BLACK_CELL || cell.is_ascii_uppercase() || Some(cell) == spare;

                if !valid {
                    return Err(format::Error::InvalidCell { kind, index, cell });
                }
            }
        }

        // Black squares have to agree between the two grids
        for (index, (&sol, &entry)) in self
            .solution
            .cells()
            .iter()
            .zip(self.entries.cells())
            .enumerate()
        {
            if (sol == BLACK_CELL) != (entry == BLACK_CELL) {
                let width = self.solution.width().max(1);

                return Err(format::Error::CellMismatch {
                    solution_cell: sol as char,
                    entry_cell: entry as char,
                    row: (index / usize::from(width)) as u8,
                    col: (index % usize::from(width)) as u8,
                });
            }
        }

        Ok(())
    }
}

/// # Read
impl Grids {
    pub(crate) fn read_from<R: PuzRead>(reader: &mut R, width: u8, height: u8) -> read::Result<Self> {
        let area = usize::from(width) * usize::from(height);

        let solution = reader.read_vec(area).context("Solution grid")?;
        let solution = Board::from_vec(solution, width).context("Solution grid")?;

        let entries = reader.read_vec(area).context("Player grid")?;
        let entries = Board::from_vec(entries, width).context("Player grid")?;

        Ok(Self { solution, entries })
    }
}

/// # Write
impl Grids {
    pub(crate) fn write_with<W: PuzWrite>(&self, writer: &mut W) -> write::Result<()> {
        writer
            .write_all(self.solution.cells())
            .context("Solution grid")?;

        writer
            .write_all(self.entries.cells())
            .context("Player grid")?;

        Ok(())
    }
}

impl<T> Context<T, read::Error> for Result<T, gridlock_core::BoardError> {
    fn context<S: Into<String>>(self, context: S) -> read::Result<T> {
        self.map_err(format::Error::from).context(context)
    }
}
