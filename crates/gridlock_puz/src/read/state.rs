use crate::read::{self, Warning};

/// Bookkeeping shared by the section readers: strictness and the warnings
/// collected so far
#[derive(Debug, Default)]
pub struct ReadState {
    strict: bool,
    pub warnings: Vec<Warning>,
}

impl ReadState {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            warnings: Vec::new(),
        }
    }

    /// Pass errors through in strict mode, downgrade them to warnings
    /// otherwise
    pub(crate) fn ok_or_warn<T>(&mut self, result: read::Result<T>) -> read::Result<Option<T>> {
        match result {
            Ok(val) => Ok(Some(val)),
            Err(err) if self.strict => Err(err),

            Err(warning) => {
                tracing::warn!("{warning}");
                self.warnings.push(warning);

                Ok(None)
            }
        }
    }
}
