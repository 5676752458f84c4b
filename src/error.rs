//! Error taxonomy for the synthesis core
//!
//! Everything except `DataFormat` and `Io` signals an inconsistency between the
//! operator registry, the enumerator and the register files. The search treats
//! those as fatal and aborts rather than retrying.

use crate::ir::types::ValueType;
use crate::parser::ParseError;
use std::fmt;
use std::path::PathBuf;

/// Errors raised by the value model, register files, loaders and search
#[derive(Debug)]
pub enum SynthError {
    /// A scalar accessor was used on an array value, or vice versa
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
    /// A register or element index beyond the current length
    IndexOutOfRange { index: i64, len: usize },
    /// A structural invariant of the register file or example set was broken
    InvariantViolation(String),
    /// Malformed example or prior file
    DataFormat(ParseError),
    /// A data file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SynthError {
    pub fn invariant(message: impl Into<String>) -> Self {
        SynthError::InvariantViolation(message.into())
    }

    /// Whether this error indicates a bug in the core rather than bad input data
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SynthError::TypeMismatch { .. }
                | SynthError::IndexOutOfRange { .. }
                | SynthError::InvariantViolation(_)
        )
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            SynthError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            SynthError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
            SynthError::DataFormat(err) => write!(f, "data format error: {}", err),
            SynthError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::DataFormat(err) => Some(err),
            SynthError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for SynthError {
    fn from(err: ParseError) -> Self {
        SynthError::DataFormat(err)
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
