//! The line-oriented authoring front-end
//!
//! The format is a sequence of marker-delimited sections in a fixed order;
//! the lines between two markers belong to the section the first marker
//! opened. Reading populates a [`Puzzle`](crate::Puzzle) and commits its
//! checksums; there is no writing side.

mod error;
mod read;

pub use error::*;
pub use read::*;
