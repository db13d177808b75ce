use super::SupportedType;
use crate::input::PayloadClass;
use crate::parser::{ParseError, SchemaViolation, SchemaViolations};
use std::fmt;
use thiserror::Error;

/// Why a single file was skipped
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unable to determine file type")]
    UnknownType,

    #[error("format '{format}' is not supported for {file_type} files")]
    UnsupportedFormat {
        format: String,
        file_type: SupportedType,
    },

    #[error("{file_type} files require a {expected} payload")]
    PayloadShapeMismatch {
        file_type: SupportedType,
        expected: PayloadClass,
    },

    #[error("report failed schema validation with {} violation(s)", .items.len())]
    SchemaValidation { items: Vec<SchemaViolation> },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Classification tag for a [`ConvertError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownType,
    UnsupportedFormat,
    PayloadShapeMismatch,
    SchemaValidation,
    GenericParse,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnknownType => ErrorKind::UnknownType,
            ConvertError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ConvertError::PayloadShapeMismatch { .. } => ErrorKind::PayloadShapeMismatch,
            ConvertError::SchemaValidation { .. } => ErrorKind::SchemaValidation,
            ConvertError::Parse(_) => ErrorKind::GenericParse,
        }
    }
}

impl From<SchemaViolations> for ConvertError {
    fn from(violations: SchemaViolations) -> Self {
        ConvertError::SchemaValidation {
            items: violations.errors,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownType => "unknown_type",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::PayloadShapeMismatch => "payload_shape_mismatch",
            ErrorKind::SchemaValidation => "schema_validation",
            ErrorKind::GenericParse => "generic_parse",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
