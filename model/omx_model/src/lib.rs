//! Typed record catalog for scientific-imaging metadata documents.
//!
//! Records decode from [`omx_tree::Element`] construction events and encode
//! back to them. Identity-bearing records assign their identifiers through
//! the session's [`omx_ids::IdRegistry`] as they decode; reference fields
//! stay unresolved strings until the resolver's link pass binds them.
//!
//! Three record families are polymorphic: shapes on a region of interest,
//! structured annotations on the root, and light sources on an instrument.
//! Each is held by a [`UnionSeq`] that preserves insertion order across
//! variants.

mod access;
mod compat;
mod context;
mod encode;
mod entity;
mod error;
mod primitives;
pub mod records;
mod refs;
mod union;
pub mod visit;

pub use access::{EntityView, Viewable};
pub use compat::{canonical_name, DEPRECATED_NAMES};
pub use context::{BuildContext, DecodeMode, Fields, FromElement};
pub use encode::ToElement;
pub use entity::{Handle, Identified};
pub use error::BuildError;
pub use primitives::{
    Color, DetectorType, DimensionOrder, Marker, PixelType, SchemaToken, UnitsLength, UnitsTime,
};
pub use refs::{Ref, RefSlot, RefState};
pub use union::{UnionSeq, VariantFamily};
