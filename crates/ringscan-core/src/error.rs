use crate::token::KeyEncodingError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured planning error with a stable internal classification.
/// Every concern-specific error in the crate converts into this type so the
/// host engine sees one shape at the connector boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without a structured detail payload.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a planner-origin invariant violation.
    pub(crate) fn planner_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Planner,
            message.into(),
        )
    }

    /// Construct a resolver-origin internal error.
    pub fn resolver_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Resolver, message.into())
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message.into())
    }

    /// Construct a config-origin invalid-input error.
    pub(crate) fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidInput, ErrorOrigin::Config, message.into())
    }

    /// Construct a schema-origin invalid-input error.
    pub(crate) fn schema_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidInput, ErrorOrigin::Schema, message.into())
    }

    #[must_use]
    pub const fn is_key_encoding(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::KeyEncoding(_)))
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    KeyEncoding(KeyEncodingError),
}

impl From<KeyEncodingError> for InternalError {
    fn from(err: KeyEncodingError) -> Self {
        Self {
            class: ErrorClass::InvalidInput,
            origin: ErrorOrigin::Resolver,
            message: err.to_string(),
            detail: Some(ErrorDetail::KeyEncoding(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    Internal,
    InvalidInput,
    LimitExceeded,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Internal => "internal",
            Self::InvalidInput => "invalid_input",
            Self::LimitExceeded => "limit_exceeded",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Planner,
    Resolver,
    Schema,
    Serialize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Planner => "planner",
            Self::Resolver => "resolver",
            Self::Schema => "schema",
            Self::Serialize => "serialize",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::KeyEncodingReason;

    #[test]
    fn key_encoding_conversion_keeps_detail() {
        let err = InternalError::from(KeyEncodingError::new(
            "id",
            "abc",
            KeyEncodingReason::InvalidLiteral {
                cql_type: "int".to_string(),
            },
        ));

        assert!(err.is_key_encoding());
        assert_eq!(err.class, ErrorClass::InvalidInput);
        assert_eq!(err.origin, ErrorOrigin::Resolver);
        assert!(err.display_with_class().starts_with("resolver:invalid_input: "));
    }

    #[test]
    fn planner_invariant_has_no_detail() {
        let err = InternalError::planner_invariant("state drift");

        assert!(!err.is_key_encoding());
        assert_eq!(err.to_string(), "state drift");
    }
}
