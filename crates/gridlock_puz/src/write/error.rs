use thiserror::Error;

use crate::{Context, format};

#[derive(Debug, Error)]
#[error("{kind} while writing '{context}'")]
pub struct Error {
    /// What kind of error occurred
    pub kind: ErrorKind,
    /// What was being written when the error occurred
    pub context: String,
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("{0}")]
    Format(#[from] format::Error),

    #[error("saving in the {kind} format is not supported")]
    Unsupported { kind: &'static str },
}

impl<T> Context<T, Error> for std::io::Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|err| Error {
            kind: ErrorKind::Io(err),
            context: context.into(),
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
