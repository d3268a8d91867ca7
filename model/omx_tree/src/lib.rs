//! Attributed-tree interchange types for the omx metadata model.
//!
//! This crate defines the boundary format between the model core and the
//! markup parser/writer: a document arrives as a tree of [`Element`]s (one
//! construction event per record: type name + ordered field mapping) and
//! leaves the same way. Nothing here knows about the schema; an `Element`
//! is just a named, ordered bag of [`Value`]s.
//!
//! It also defines [`Path`], the object-location type every diagnostic in
//! the workspace carries ("where in the document tree did this happen"),
//! playing the role a source span plays in a compiler.

mod element;
mod path;
mod pretty;
mod value;

pub use element::{Element, FieldMap};
pub use path::{Path, Step};
pub use pretty::pretty;
pub use value::Value;
