//! Identifier assignment and validation.
//!
//! Every identity-bearing record in a document carries an identifier of the
//! form `Tag:Suffix`, optionally namespaced as
//! `urn:lsid:Authority:Tag:Suffix`. This crate owns the grammar, the
//! per-session numbering counters, duplicate-claim detection, and the repair
//! path for identifiers that fail validation.
//!
//! A registry is scoped to one construction session. Two documents built on
//! different threads each own their own [`IdRegistry`]; nothing here is
//! process-global.

pub mod format;
mod lsid;
mod registry;
mod tag;

pub use lsid::{Id, Lsid};
pub use registry::{Assigned, CheckedRef, DuplicateId, IdRegistry, ProvidedId};
pub use tag::Tag;
