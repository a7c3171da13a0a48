// Shared plumbing for every builder in the crate.
//
// A builder is created by `new(..)`, which applies the module defaults, then
// configured through consuming setters applied in caller order. Later setters
// overwrite earlier ones. Setters never fail eagerly: the first error is kept
// in an `ErrorSlot` and returned by the terminal `build()`.

use crate::{Error, Result};

/// Builders that can be configured through reusable option values.
///
/// An option is any `FnOnce(Self) -> Self`, which lets callers bundle several
/// setters into a single named value and apply it to many builders.
pub trait Builder: Sized {
    fn with<F>(self, option: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        option(self)
    }

    fn with_all<I, F>(self, options: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(Self) -> Self,
    {
        options.into_iter().fold(self, |builder, option| option(builder))
    }
}

/// Option kept in a heterogeneous list.
pub type BoxedOption<B> = Box<dyn FnOnce(B) -> B>;

/// First error raised while configuring a builder.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    first: Option<Error>,
}

impl ErrorSlot {
    pub fn record(&mut self, err: Error) {
        if self.first.is_none() {
            self.first = Some(err);
        }
    }

    /// Unwraps a fallible step, keeping its error if it is the first one.
    pub fn take<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    pub fn is_err(&self) -> bool {
        self.first.is_some()
    }

    pub fn into_result(self) -> Result<()> {
        match self.first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
