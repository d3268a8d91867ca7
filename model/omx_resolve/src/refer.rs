//! Reverse lookup from an identity to the sites that point at it.

use omx_ids::{Lsid, Tag};
use omx_model::records::Ome;
use omx_model::visit::{walk_document, Visit};
use omx_model::RefSlot;
use omx_tree::Path;
use rustc_hash::FxHashMap;

/// Which reference sites point at each identity, in document order.
///
/// Only linked sites appear. A dangling site has no target to file under.
#[derive(Debug, Default)]
pub struct ReferrerTable {
    entries: FxHashMap<Lsid, Vec<Path>>,
}

impl ReferrerTable {
    /// Paths of every site that points at `id`.
    pub fn of(&self, id: &str) -> &[Path] {
        self.entries.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct Collect {
    table: ReferrerTable,
}

impl Visit for Collect {
    fn visit_reference(&mut self, _tag: Tag, slot: &RefSlot, path: &Path) {
        if let Some(lsid) = slot.lsid() {
            self.table
                .entries
                .entry(lsid.clone())
                .or_default()
                .push(path.clone());
        }
    }
}

/// Collect the referrer table for a linked document.
pub fn referrer_table(root: &Ome) -> ReferrerTable {
    let mut collect = Collect {
        table: ReferrerTable::default(),
    };
    walk_document(&mut collect, root);
    collect.table
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::DiagnosticSink;
    use omx_ids::IdRegistry;
    use omx_model::{BuildContext, FromElement};
    use omx_tree::{Element, Value};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{index::index_document, link::link_document};

    #[test]
    fn table_lists_every_linked_site_in_document_order() {
        let el = Element::new("OME")
            .with_field(
                "projects",
                Value::List(vec![Element::new("Project")
                    .with_field("dataset_refs", Value::List(vec!["Dataset:0".into()]))
                    .into()]),
            )
            .with_field(
                "datasets",
                Value::List(vec![
                    Element::new("Dataset")
                        .with_field("image_refs", Value::List(vec!["Image:3".into()]))
                        .into(),
                ]),
            );
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let mut root = Ome::from_element(el, &mut cx).unwrap();
        let index = index_document(&root, &registry).unwrap();
        link_document(&mut root, &index, &registry, &mut sink, &[]);

        let table = referrer_table(&root);

        let sites = table.of("Dataset:0");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].to_string(), "projects[0].dataset_refs[0]");
        // The image reference dangled, so nothing points at Image:3.
        assert!(table.of("Image:3").is_empty());
    }
}
