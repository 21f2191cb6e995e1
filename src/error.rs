//! Error types for URL values marshaling and unmarshaling.
//!
//! Every failure aborts the whole call: there is no partial output and no
//! partial assignment into a destination record.
//!
//! ## Error Categories
//!
//! - **Argument shape**: nil or wrongly shaped top-level values and destinations
//! - **Tag grammar**: an unterminated `join='...` delimiter
//! - **Format verbs**: an unsupported float/complex verb character
//! - **Coercion**: text that cannot be parsed as the target scalar
//! - **Assignability**: a decoded value that does not fit the field type
//!
//! ## Examples
//!
//! ```rust
//! use urlvalues::{marshal, Error, Value};
//!
//! let err = marshal(&Value::from(3)).unwrap_err();
//! assert!(matches!(err, Error::InvalidArgument(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while converting between
/// records and URL values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The top-level argument or destination has the wrong shape
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A nil top-level value or destination
    #[error("{0} cannot be nil")]
    NilValue(String),

    /// A `join='` opener without a closing quote
    #[error("unterminated join delimiter in tag {tag:?}: found \"join='\" but no closing \"'\"")]
    UnterminatedJoin { tag: String },

    /// A format verb the numeric formatter does not understand
    #[error("unsupported format verb {verb:?}")]
    UnsupportedVerb { verb: String },

    /// Text could not be parsed as the target type
    #[error("cannot parse {input:?} as {target}: {reason}")]
    Parse {
        input: String,
        target: String,
        reason: String,
    },

    /// A value kind the codec cannot represent as text
    #[error("unsupported type {0}")]
    UnsupportedType(String),

    /// A decoded value does not fit the destination field
    #[error("{found} is not assignable to {expected}")]
    NotAssignable { found: String, expected: String },

    /// A record was asked to assign a field it does not declare
    #[error("record has no field named {0:?}")]
    UnknownField(String),

    /// Custom error raised by capability hooks
    #[error("Error: {0}")]
    Custom(String),

    /// Generic message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an argument shape error.
    pub fn invalid_argument(msg: &str) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates a nil value error naming what was nil.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use urlvalues::Error;
    ///
    /// let err = Error::nil("destination");
    /// assert_eq!(err.to_string(), "destination cannot be nil");
    /// ```
    pub fn nil(what: &str) -> Self {
        Error::NilValue(what.to_string())
    }

    pub fn unterminated_join(tag: &str) -> Self {
        Error::UnterminatedJoin {
            tag: tag.to_string(),
        }
    }

    pub fn unsupported_verb(verb: &str) -> Self {
        Error::UnsupportedVerb {
            verb: verb.to_string(),
        }
    }

    /// Creates a parse error carrying the underlying parser's message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use urlvalues::Error;
    ///
    /// let source = "x".parse::<i32>().unwrap_err();
    /// let err = Error::parse("x", "i32", source);
    /// assert!(err.to_string().contains("invalid digit"));
    /// ```
    pub fn parse<R: fmt::Display>(input: &str, target: &str, reason: R) -> Self {
        Error::Parse {
            input: input.to_string(),
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported_type(name: &str) -> Self {
        Error::UnsupportedType(name.to_string())
    }

    /// Creates an assignability error naming both types.
    pub fn not_assignable(found: &str, expected: &str) -> Self {
        Error::NotAssignable {
            found: found.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn unknown_field(name: &str) -> Self {
        Error::UnknownField(name.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// Intended for [`MarshalValues`](crate::MarshalValues) and
    /// [`UnmarshalValues`](crate::UnmarshalValues) implementations.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
