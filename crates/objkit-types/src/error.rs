use std::fmt;

use thiserror::Error;

/// Result type used across objkit.
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Errors produced by objkit operations.
///
/// Each variant belongs to exactly one [`ErrorKind`]. Match on the variant to
/// tell "value absent" apart from "malformed input" apart from "subtype
/// mismatch"; match on [`ObjectError::kind`] when the coarse class is enough.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// A supplied argument violates a precondition.
    #[error("{0}")]
    IllegalArgument(String),

    /// The object's state forbids the requested operation.
    #[error("{0}")]
    IllegalState(String),

    /// Serialized input was malformed or missing required fields.
    #[error("{0}")]
    MalformedInput(String),

    /// The serialized subtype does not match the caller's expectation.
    #[error("Cannot deserialize Optional of type {actual} to {expected}")]
    SubTypeMismatch { actual: String, expected: String },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A value was requested from an empty container.
    #[error("No value present")]
    NoValuePresent,
}

/// Coarse failure classes surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IllegalArgument,
    IllegalState,
    RuntimeFailure,
    NotImplemented,
    GenericAbsence,
}

impl ObjectError {
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Self::IllegalArgument(msg.into())
    }

    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn sub_type_mismatch(actual: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::SubTypeMismatch {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// The taxonomy class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalArgument(_) => ErrorKind::IllegalArgument,
            Self::IllegalState(_) => ErrorKind::IllegalState,
            Self::MalformedInput(_) | Self::SubTypeMismatch { .. } => ErrorKind::RuntimeFailure,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::NoValuePresent => ErrorKind::GenericAbsence,
        }
    }

    /// Returns `true` for deserialization failures.
    pub fn is_runtime_failure(&self) -> bool {
        self.kind() == ErrorKind::RuntimeFailure
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalArgument => write!(f, "IllegalArgumentException"),
            Self::IllegalState => write!(f, "IllegalStateException"),
            Self::RuntimeFailure => write!(f, "RunTimeException"),
            Self::NotImplemented => write!(f, "NotImplementedException"),
            Self::GenericAbsence => write!(f, "NoSuchElementException"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_failures_share_runtime_kind() {
        let malformed = ObjectError::malformed("Cannot deserialize Optional from: `{}`");
        let mismatch = ObjectError::sub_type_mismatch("number", "string");
        assert_eq!(malformed.kind(), ErrorKind::RuntimeFailure);
        assert_eq!(mismatch.kind(), ErrorKind::RuntimeFailure);
        assert!(malformed.is_runtime_failure());
        assert_ne!(malformed, mismatch);
    }

    #[test]
    fn absence_is_distinct_from_runtime_failures() {
        let err = ObjectError::NoValuePresent;
        assert_eq!(err.kind(), ErrorKind::GenericAbsence);
        assert!(!err.is_runtime_failure());
        assert_eq!(err.to_string(), "No value present");
    }

    #[test]
    fn mismatch_message_names_both_types() {
        let err = ObjectError::sub_type_mismatch("number", "string");
        assert_eq!(
            err.to_string(),
            "Cannot deserialize Optional of type number to string"
        );
    }

    #[test]
    fn kind_display_uses_exception_names() {
        assert_eq!(
            ErrorKind::IllegalArgument.to_string(),
            "IllegalArgumentException"
        );
        assert_eq!(
            ObjectError::not_implemented("clone").kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(ObjectError::illegal_state("closed").kind(), ErrorKind::IllegalState);
    }
}
