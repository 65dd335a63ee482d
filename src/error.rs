use std::sync::Arc;

/// An error that can occur in this crate.
///
/// The most common kind of error is a value out of its supported range:
/// a month of `13`, a day of `31` in April, a date arithmetic result
/// beyond the year `9999`. The other kinds are failures of the host
/// local-time oracle and ad hoc configuration problems (for example,
/// scaling a delta by a zero divisor).
///
/// This crate follows the "one error type" pattern: every fallible
/// operation returns this same type. Finer grained error enums
/// compose poorly once values start flowing through one another, so
/// introspection is limited to a few predicates like
/// [`Error::is_range`].
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// The `Arc` makes an `Error` cheap to clone and keeps the type at
    /// one word, which matters because nearly every API in this crate
    /// returns a `Result<T, Error>`.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// Callers usually build this via the internal `err!` macro.
    pub(crate) fn from_args(message: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError {
            message: message.to_string(),
        }))
    }

    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is
    /// out of range. (e.g., "month")
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError {
            what,
            given: given.into(),
            min: min.into(),
            max: max.into(),
        }))
    }

    /// Creates a new error for a failed host local-time conversion.
    ///
    /// `call` names the host routine that failed (e.g., "mktime").
    #[inline(never)]
    #[cold]
    pub(crate) fn oracle(call: &'static str) -> Error {
        Error::from(ErrorKind::Oracle(OracleError { call }))
    }

    /// Returns true when this error originated as a result of a value
    /// being out of its supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::civil::Date;
    ///
    /// assert!(Date::new(2025, 2, 29).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Range(_))
    }

    /// Returns true when this error originated from the host local-time
    /// oracle.
    pub fn is_oracle(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Oracle(_))
    }

    /// Attaches higher level context to this error.
    ///
    /// The consequent error becomes the message a caller sees first,
    /// with `self` as its cause.
    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        let err = consequent.into_error();
        // OK because we just created this error, so the Arc has exactly
        // one reference.
        let mut inner = Arc::try_unwrap(err.inner)
            .unwrap_or_else(|inner| ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError {
                    message: inner.kind.to_string(),
                }),
                cause: None,
            });
        inner.cause = Some(self);
        Error { inner: Arc::new(inner) }
    }

    /// Returns the root error in this chain.
    fn root(&self) -> &Error {
        // OK because `Error::chain` always yields at least one error.
        self.chain().last().unwrap()
    }

    /// Returns a chain of error values, starting with the highest level
    /// context and ending with the root cause.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Oracle(OracleError),
    Range(RangeError),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Adhoc(ref err) => err.fmt(f),
            ErrorKind::Oracle(ref err) => err.fmt(f),
            ErrorKind::Range(ref err) => err.fmt(f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}

/// A generic error message.
#[derive(Debug)]
struct AdhocError {
    message: String,
}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

/// An error that occurs when a value is out of its allowed range.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i128,
    min: i128,
    max: i128,
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

/// An error from the host local-time oracle.
#[derive(Debug)]
struct OracleError {
    call: &'static str,
}

impl core::fmt::Display for OracleError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "host local-time conversion via `{}` failed \
             (the input may be invalid or ambiguous for this host)",
            self.call,
        )
    }
}

/// A simple trait to encapsulate the things that can be converted to an
/// `Error`. Principally strings, for attaching context.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for &'static str {
    fn into_error(self) -> Error {
        Error::from_args(format_args!("{self}"))
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from_args(format_args!("{self}"))
    }
}

/// Contextualizes errors on `Result` values. This is the crate internal
/// analogue of `anyhow::Context`.
pub(crate) trait ErrorContext<T> {
    /// Attach the given context to the error within this result.
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Attach lazily built context to the error within this result.
    fn with_context<E: IntoError, F: FnOnce() -> E>(
        self,
        f: F,
    ) -> Result<T, Error>;
}

impl<T> ErrorContext<T> for Result<T, Error> {
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| err.context(consequent))
    }

    fn with_context<E: IntoError, F: FnOnce() -> E>(
        self,
        f: F,
    ) -> Result<T, Error> {
        self.map_err(|err| err.context(f()))
    }
}

/// Constructs an ad hoc [`Error`] from format arguments.
macro_rules! err {
    ($($tt:tt)*) => {
        crate::error::Error::from_args(format_args!($($tt)*))
    }
}

pub(crate) use err;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_message() {
        let err = Error::range("month", 13, 1, 12);
        assert_eq!(
            err.to_string(),
            "parameter 'month' with value 13 \
             is not in the required range of 1..=12",
        );
        assert!(err.is_range());
    }

    #[test]
    fn context_chain() {
        let err: Error = Error::range("day", 31, 1, 30);
        let err = err.context("failed to build date from ordinal");
        assert_eq!(
            err.to_string(),
            "failed to build date from ordinal: \
             parameter 'day' with value 31 \
             is not in the required range of 1..=30",
        );
        // The root cause survives contextualization.
        assert!(err.is_range());
    }

    #[test]
    fn adhoc_message() {
        let err = err!("scale factor {} is not finite", f64::NAN);
        assert_eq!(err.to_string(), "scale factor NaN is not finite");
        assert!(!err.is_range());
    }
}
