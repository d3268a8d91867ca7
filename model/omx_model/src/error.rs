//! Fatal construction errors.

use omx_diagnostic::DiagCode;
use omx_ids::DuplicateId;
use omx_tree::Path;
use thiserror::Error;

/// Error aborting a bulk construction or a single append.
///
/// Everything recoverable goes to the diagnostic sink instead; an error here
/// means the session cannot produce a usable graph.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Same identifier assigned to two objects of one type.
    #[error("{source} (at `{path}`)")]
    DuplicateId { source: DuplicateId, path: Path },

    /// Tree shape does not match the record schema.
    #[error("structural mismatch at `{path}`: {detail}")]
    Structural { path: Path, detail: String },

    /// Value is not a permitted variant for the collection.
    #[error("`{found}` is not a {family} variant (at `{path}`)")]
    InvalidVariant {
        path: Path,
        family: &'static str,
        found: String,
    },

    /// Explicit kind discriminator names no known variant.
    #[error("unknown {family} kind `{kind}` (at `{path}`)")]
    UnknownVariant {
        path: Path,
        family: &'static str,
        kind: String,
    },

    /// No variant accepted the mapping in priority order.
    #[error("no {family} variant matched the mapping (at `{path}`)")]
    NoMatchingVariant { path: Path, family: &'static str },
}

impl BuildError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> DiagCode {
        match self {
            BuildError::DuplicateId { .. } => DiagCode::E0101,
            BuildError::Structural { .. } => DiagCode::E0102,
            BuildError::InvalidVariant { .. } => DiagCode::E0103,
            BuildError::UnknownVariant { .. } => DiagCode::E0104,
            BuildError::NoMatchingVariant { .. } => DiagCode::E0105,
        }
    }

    /// Path of the offending object.
    pub fn path(&self) -> &Path {
        match self {
            BuildError::DuplicateId { path, .. }
            | BuildError::Structural { path, .. }
            | BuildError::InvalidVariant { path, .. }
            | BuildError::UnknownVariant { path, .. }
            | BuildError::NoMatchingVariant { path, .. } => path,
        }
    }
}
