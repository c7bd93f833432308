//! Building blocks shared by the `.puz` container codec.
//!
//! The types here are deliberately format-agnostic: a [`Board`] is a
//! rectangular byte grid, a [`CellStyle`] is a per-cell flag byte, a
//! [`Timer`] is elapsed time plus a running/stopped state and a
//! [`Version`] is an `x.y` format version. How each of them is laid out
//! on disk is the business of the codec crate.

mod board;
mod style;
mod timer;
mod version;

pub use board::{Board, BoardError};
pub use style::CellStyle;
pub use timer::{Timer, TimerState};
pub use version::{Version, VersionError};
