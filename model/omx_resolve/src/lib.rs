//! Reference resolution over constructed documents.
//!
//! Construction leaves every reference a raw string, so references may
//! point forward, sideways, or nowhere at all. Resolution runs two passes:
//! the index pass maps every assigned identifier to its location, then the
//! link pass binds each reference site against that map. A site whose
//! target never appears stays raw and is reported as a warning, never an
//! error; an index that fails to cover the session's identifier claims is
//! the one fatal condition here.

mod assign;
mod index;
mod link;
mod refer;

pub use assign::Assigner;
pub use index::{index_document, DocumentIndex, IndexEntry, IndexIncomplete};
pub use link::{link_document, DanglingSite};
pub use refer::{referrer_table, ReferrerTable};

use omx_diagnostic::DiagnosticSink;
use omx_ids::IdRegistry;
use omx_model::records::Ome;

/// Everything the resolver learned about one document.
#[derive(Debug)]
pub struct Resolution {
    pub index: DocumentIndex,
    /// Sites whose target is absent, in document order.
    pub dangling: Vec<DanglingSite>,
    pub referrers: ReferrerTable,
}

/// Index then link a freshly constructed document.
///
/// Every dangling site is reported to `sink` as a warning.
pub fn resolve(
    root: &mut Ome,
    registry: &IdRegistry,
    sink: &mut DiagnosticSink,
) -> Result<Resolution, IndexIncomplete> {
    resolve_with(root, registry, sink, &[])
}

/// Resolve, treating the sites in `known` as already reported.
///
/// A refresh after a committed mutation passes the previous dangling list
/// here: sites that bind now that their target exists produce nothing, and
/// sites that stay dangling are not reported twice. Only sites the
/// document has never been warned about reach `sink`.
pub fn resolve_with(
    root: &mut Ome,
    registry: &IdRegistry,
    sink: &mut DiagnosticSink,
    known: &[DanglingSite],
) -> Result<Resolution, IndexIncomplete> {
    let index = index_document(root, registry)?;
    let dangling = link_document(root, &index, registry, sink, known);
    let referrers = referrer_table(root);
    Ok(Resolution {
        index,
        dangling,
        referrers,
    })
}
