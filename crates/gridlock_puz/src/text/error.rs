use thiserror::Error;

use crate::format;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected the {expected} marker, found {found:?}")]
    BadMarker {
        expected: &'static str,
        found: String,
    },

    #[error("input ended while waiting for the {expected} marker")]
    MissingMarker { expected: &'static str },

    #[error("size should be '<width>x<height>', found {found:?}")]
    BadSize { found: String },

    #[error("{0}")]
    Format(#[from] format::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
