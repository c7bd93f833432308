//! Failures that can occur on both the reading and the writing side

use gridlock_core::{BoardError, VersionError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("version error: {0}")]
    Version(#[from] VersionError),

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("invalid timer: {reason}")]
    InvalidTimer { reason: String },

    #[error("no rebus overlay to attach the table to")]
    MissingRebus,

    #[error("{kind} has {len} cells, the {width}x{height} grid needs {area}")]
    AreaMismatch {
        kind: &'static str,
        len: usize,
        width: u8,
        height: u8,
        area: usize,
    },

    #[error("invalid cell {cell:#04x} at index {index} in the {kind} grid")]
    InvalidCell {
        kind: &'static str,
        index: usize,
        cell: u8,
    },

    #[error(
        "solution has '{solution_cell}' at {row}R{col}C where the player grid has '{entry_cell}'"
    )]
    CellMismatch {
        solution_cell: char,
        entry_cell: char,
        row: u8,
        col: u8,
    },

    #[error("size of {kind} is overflowing (found {size}, expected <= {max_size})")]
    SizeOverflow {
        kind: &'static str,
        size: usize,
        max_size: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
