//! API errors for construction, mutation, and handle following.

use omx_diagnostic::DiagCode;
use omx_ids::DuplicateId;
use omx_model::BuildError;
use omx_resolve::IndexIncomplete;
use omx_tree::Path;
use thiserror::Error;

/// Error aborting document construction. No usable graph exists.
#[derive(Error, Debug)]
pub enum ConstructError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The index pass did not cover the session's identifier claims.
    #[error(transparent)]
    Index(#[from] IndexIncomplete),
}

impl ConstructError {
    pub fn code(&self) -> DiagCode {
        match self {
            ConstructError::Build(source) => source.code(),
            ConstructError::Index(_) => DiagCode::E0201,
        }
    }
}

/// Error rejecting an atomic mutation. The document is unchanged.
#[derive(Error, Debug)]
pub enum MutateError {
    /// The added subtree claims an identifier the document already holds.
    #[error("mutation rejected: {source} (at `{path}`)")]
    DuplicateId { source: DuplicateId, path: Path },

    /// The added payload failed to decode.
    #[error("mutation rejected: {source}")]
    Build {
        #[from]
        source: BuildError,
    },

    /// The named attachment target is absent from the document.
    #[error("mutation rejected: no object carries `{id}`")]
    UnknownTarget { id: String },
}

impl MutateError {
    pub fn code(&self) -> DiagCode {
        DiagCode::E0301
    }
}

/// A reference that cannot be followed to an object.
///
/// A linked reference goes stale only after out-of-band structural surgery
/// on the root; the mutation operations keep the index in step.
#[derive(Error, Debug)]
pub enum FollowError {
    /// The reference never linked; its target is absent from the document.
    #[error("reference to `{target}` is unresolved")]
    Unresolved { target: String },

    /// The index no longer locates the reference's target.
    #[error("stale handle: `{id}` does not reach its object")]
    Stale { id: String },
}
