//! In-memory object model for OME-style microscopy metadata documents.
//!
//! A document arrives as a generic attributed tree (an [`Element`] per
//! record) and comes up as a typed graph: identifiers are assigned or
//! validated as each record decodes, then a two-pass resolver binds every
//! cross-reference, tolerating forward references and reporting dangling
//! ones as warnings. The [`Document`] facade owns the resolved graph and
//! keeps its identifier index, reference links, and numbering counters in
//! step through atomic mutation operations.
//!
//! ```
//! use omx::{Document, Element, Value};
//!
//! let tree = Element::new("OME")
//!     .with_field(
//!         "projects",
//!         Element::new("Project").with_field("dataset_refs", "Dataset:0"),
//!     )
//!     .with_field("datasets", Element::new("Dataset").with_field("name", "wk1"));
//!
//! let doc = Document::construct(tree)?;
//! let project = &doc.root().projects[0];
//! let dataset = doc.follow(&project.dataset_refs[0])?;
//! assert_eq!(dataset.name.as_deref(), Some("wk1"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod document;
mod error;

pub use document::Document;
pub use error::{ConstructError, FollowError, MutateError};

pub use omx_diagnostic::{DiagCode, Diagnostic, DiagnosticSink, Severity};
pub use omx_ids::{Id, Lsid, Tag};
pub use omx_model::records;
pub use omx_model::{
    BuildError, Color, DetectorType, DimensionOrder, EntityView, Handle, Identified, Marker,
    PixelType, Ref, RefSlot, RefState, SchemaToken, ToElement, UnionSeq, UnitsLength, UnitsTime,
    VariantFamily, Viewable,
};
pub use omx_resolve::DanglingSite;
pub use omx_tree::{pretty, Element, Path, Step, Value};
