use thiserror::Error;

/// A rectangular grid of cell bytes in row-major order
///
/// Width and height are both bounded by [`u8::MAX`], matching the one-byte
/// dimension fields of the container format. The cell values themselves are
/// uninterpreted here; the codec decides what `b'.'`, `b'-'` or a letter
/// means.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<u8>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("{len} cells do not divide into rows of width {width}")]
    NotRectangular { len: usize, width: u8 },

    #[error("{rows} rows do not fit the one-byte height field")]
    TooTall { rows: usize },
}

impl Board {
    /// Create a board of the given dimensions with every cell set to `fill`
    pub fn filled(width: u8, height: u8, fill: u8) -> Self {
        let area = usize::from(width) * usize::from(height);

        Self {
            width,
            height,
            cells: vec![fill; area],
        }
    }

    /// Wrap an owned cell vector, deriving the height from the width
    pub fn from_vec(cells: Vec<u8>, width: u8) -> Result<Self, BoardError> {
        if width == 0 || cells.is_empty() {
            return match cells.is_empty() {
                true => Ok(Self::default()),
                false => Err(BoardError::NotRectangular {
                    len: cells.len(),
                    width,
                }),
            };
        }

        if !cells.len().is_multiple_of(usize::from(width)) {
            return Err(BoardError::NotRectangular {
                len: cells.len(),
                width,
            });
        }

        let rows = cells.len() / usize::from(width);
        let height = u8::try_from(rows).map_err(|_| BoardError::TooTall { rows })?;

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub fn get(&self, row: u8, col: u8) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }

        Some(self.cells[usize::from(row) * usize::from(self.width) + usize::from(col)])
    }

    pub fn set(&mut self, row: u8, col: u8, cell: u8) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }

        let idx = usize::from(row) * usize::from(self.width) + usize::from(col);
        let old = self.cells[idx];
        self.cells[idx] = cell;

        Some(old)
    }

    /// Map every cell through `f` into a fresh board of the same dimensions
    pub fn map(&self, f: impl FnMut(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn from_vec_derives_height() {
        let board = Board::from_vec(b"ABCDEF".to_vec(), 3).unwrap();

        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(board.area(), 6);
        assert_eq!(board.get(1, 0), Some(b'D'));
        assert_eq!(board.get(2, 0), None);
    }

    #[rstest]
    #[case(b"ABCDE".to_vec(), 3)]
    #[case(b"AB".to_vec(), 0)]
    fn from_vec_rejects_ragged_input(#[case] cells: Vec<u8>, #[case] width: u8) {
        assert!(matches!(
            Board::from_vec(cells, width),
            Err(BoardError::NotRectangular { .. })
        ));
    }

    #[test]
    fn empty_input_is_the_empty_board() {
        let board = Board::from_vec(Vec::new(), 0).unwrap();

        assert!(board.is_empty());
        assert_eq!(board, Board::default());
    }

    #[test]
    fn set_returns_the_previous_cell() {
        let mut board = Board::filled(2, 2, b'-');

        assert_eq!(board.set(0, 1, b'X'), Some(b'-'));
        assert_eq!(board.get(0, 1), Some(b'X'));
        assert_eq!(board.set(2, 0, b'X'), None);
    }
}
