//! Precondition checks used when talking to the host.
//!
//! Every check returns a [`Result`] carrying one of the [`GuardKind`]
//! error kinds instead of aborting, so callers can use `?`.
use crate::error::{Error, Result};

/// The kind of error produced by a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    ArgumentNull,
    InvalidArgument,
    ServiceUnavailable,
}

impl GuardKind {
    /// Creates the error of this kind carrying `message`.
    pub fn error(self, message: impl Into<String>) -> Error {
        let message = message.into();
        match self {
            Self::ArgumentNull => Error::ArgumentNull(message),
            Self::InvalidArgument => Error::InvalidArgument(message),
            Self::ServiceUnavailable => Error::ServiceUnavailable(message),
        }
    }
}

/// Fails with an error of `kind` carrying `message` if `condition` is true.
///
/// # Examples
///
/// ```
/// use msbuild_toolsversion::guard::{fail_if, GuardKind};
///
/// assert!(fail_if(false, GuardKind::InvalidArgument, "cookie").is_ok());
/// assert!(fail_if(true, GuardKind::InvalidArgument, "cookie").is_err());
/// ```
pub fn fail_if(condition: bool, kind: GuardKind, message: impl Into<String>) -> Result<()> {
    if condition {
        Err(kind.error(message))
    } else {
        Ok(())
    }
}

/// Unwraps `value` or fails with [`GuardKind::ArgumentNull`].
pub fn if_null<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| GuardKind::ArgumentNull.error(name))
}

/// Fails with [`GuardKind::InvalidArgument`] if `condition` is true.
pub fn if_invalid(condition: bool, name: &str) -> Result<()> {
    fail_if(condition, GuardKind::InvalidArgument, name)
}

/// Unwraps a resolved host service or fails with [`GuardKind::ServiceUnavailable`].
pub fn service<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| GuardKind::ServiceUnavailable.error(name))
}
