use thiserror::Error;

use crate::{Context, format};

#[derive(Debug, Error)]
#[error("{kind} while reading '{context}'")]
pub struct Error {
    /// What kind of error occurred
    pub kind: ErrorKind,
    /// What was being parsed when the error occurred
    pub context: String,
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("{0}")]
    Format(#[from] format::Error),

    #[error("input ended before the field was complete")]
    Truncated,

    #[error("input ended after clue {read} of {expected}")]
    ClueCountShort { read: u16, expected: u16 },

    #[error("non-empty rebus overlay is not followed by an RTBL section")]
    MissingRtbl,

    #[error("malformed {tag} section: {reason}")]
    MalformedExtension { tag: String, reason: String },

    #[error("unknown extension tag {tag:?}")]
    UnknownSection { tag: String },

    #[error("{kind} checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    InvalidChecksum {
        kind: String,
        stored: u16,
        computed: u16,
    },

    #[error("the input looks like the {sniffed} format, not the requested {requested}")]
    KindMismatch {
        requested: &'static str,
        sniffed: &'static str,
    },

    #[error("the crate was built without the `text` feature")]
    TextDisabled,

    #[cfg(feature = "text")]
    #[error("text front-end error: {0}")]
    Text(#[from] crate::text::Error),
}

impl<T> Context<T, Error> for std::io::Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|err| Error {
            kind: match err.kind() {
                std::io::ErrorKind::UnexpectedEof => ErrorKind::Truncated,
                _ => ErrorKind::Io(err),
            },
            context: context.into(),
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// [Errors](struct@Error) that are recoverable when reading leniently
pub type Warning = Error;
