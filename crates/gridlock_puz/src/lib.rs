//! Codec for the binary `.puz` crossword container
//!
//! The crate covers three concerns:
//! - the **container codec**: [`PuzReader`] and [`PuzWriter`] parse and emit
//!   the fixed header, both grids, the NUL-delimited string block and the
//!   tagged extension sections (`GRBS`/`RTBL`, `GEXT`, `LTIM`, `RUSR`)
//! - the **checksum engine**: [`Checksums`] composes the four component sums
//!   into the primary file checksum and the two masked "magic" arrays, and
//!   [`Puzzle::verify`] counts how many stored values disagree
//! - the **solution lock**: [`Puzzle::lock_with_key`],
//!   [`Puzzle::unlock_with_key`] and [`Puzzle::brute_force_unlock`] apply and
//!   reverse the four-digit-key scramble of the solution letters
//!
//! # Errors and warnings
//! Reading distinguishes hard failures from recoverable oddities. A
//! [`PuzReader`] built with `strict == true` aborts on anything suspicious;
//! the default lenient reader collects [warnings](read::Warning) instead and
//! hands them back through [`PuzReader::read_with_warnings`]. An unknown
//! extension tag, for example, is skipped with a warning while a rebus
//! overlay without its table is always fatal.
//!
//! # Checksums
//! Every region of the file is summed with the same 16-bit kernel: rotate
//! the running value right by one bit, then add the next byte with natural
//! wrap-around ([`region_checksum`]). Regions are chained by seeding one
//! call with the result of the previous one. The primary checksum at offset
//! `0x00` seeds with the header-summary sum and then chains solution, player
//! grid and the text block; the masked arrays at `0x10`/`0x14` fold the low
//! and high bytes of the four component sums through the ASCII masks
//! `"ICHE"` and `"ATED"`.

pub mod read;
pub mod write;

#[cfg(feature = "text")]
pub mod text;

pub mod format;

mod checksums;
mod extras;
mod grids;
mod header;
mod puzzle;
mod scramble;
mod size;
mod strings;

pub use checksums::{Checksums, MASK_10, MASK_14, region_checksum};
pub use extras::{Extras, MAX_REBUS_LEN, Rebus, StoredSums, UserRebus};
pub use grids::{BLACK_CELL, EMPTY_CELL, Grids};
pub use header::Header;
pub use puzzle::{FileKind, Puzzle};
pub use read::{PuzRead, PuzReader, decode_text};
pub use scramble::LockError;
pub use strings::Strings;
pub use write::{PuzWrite, PuzWriter};

/// Attach a context string while lifting a low-level error into a
/// reading or writing [error](read::Error)
pub trait Context<T, E> {
    fn context<S: Into<String>>(self, context: S) -> std::result::Result<T, E>;
}

impl<T> Context<T, read::Error> for format::Result<T> {
    fn context<S: Into<String>>(self, context: S) -> read::Result<T> {
        self.map_err(|err| read::Error {
            kind: read::ErrorKind::Format(err),
            context: context.into(),
        })
    }
}

impl<T> Context<T, write::Error> for format::Result<T> {
    fn context<S: Into<String>>(self, context: S) -> write::Result<T> {
        self.map_err(|err| write::Error {
            kind: write::ErrorKind::Format(err),
            context: context.into(),
        })
    }
}
