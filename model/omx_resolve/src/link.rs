//! The link pass.

use omx_diagnostic::{dangling_reference, DiagnosticSink};
use omx_ids::{IdRegistry, Lsid, Tag};
use omx_model::records::Ome;
use omx_model::visit::{walk_document_mut, VisitMut};
use omx_model::{RefSlot, RefState};
use omx_tree::Path;

use crate::index::DocumentIndex;

/// A reference site whose target is absent from the document.
///
/// Dangling sites are legal. They stay in their unresolved form and link on
/// a later pass if the target appears.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingSite {
    /// Identity type the site expects.
    pub expected: Tag,
    /// Target as written, before any repair.
    pub target: String,
    pub path: Path,
}

struct Linker<'a> {
    index: &'a DocumentIndex,
    registry: &'a IdRegistry,
    sink: &'a mut DiagnosticSink,
    known: &'a [DanglingSite],
    dangling: Vec<DanglingSite>,
}

impl Linker<'_> {
    fn miss(&mut self, expected: Tag, target: &str, path: &Path) {
        let site = DanglingSite {
            expected,
            target: target.to_owned(),
            path: path.clone(),
        };
        if !self.known.contains(&site) {
            self.sink.report(dangling_reference(target, path.clone()));
        }
        self.dangling.push(site);
    }
}

impl VisitMut for Linker<'_> {
    fn visit_reference_mut(&mut self, tag: Tag, slot: &mut RefSlot, path: &Path) {
        let resolved: Option<Lsid> = match &slot.state {
            RefState::Linked(lsid) => {
                if self.index.contains(lsid.as_str()) {
                    return;
                }
                // The target vanished since the slot was linked.
                let stale = lsid.to_string();
                self.miss(tag, &stale, path);
                slot.state = RefState::Raw(stale);
                return;
            }
            RefState::Raw(target) => self.index.canonical(target).cloned(),
            RefState::Deferred(original) => self
                .registry
                .cast_target(tag, original)
                .and_then(|cast| self.index.canonical(cast.as_str()))
                .cloned(),
        };
        match resolved {
            Some(lsid) => slot.state = RefState::Linked(lsid),
            None => {
                let target = slot.target().to_owned();
                self.miss(tag, &target, path);
            }
        }
    }
}

/// Bind every reference slot in the document against `index`.
///
/// Sites in `known` stay dangling silently; the caller has already reported
/// them. The returned list is the full set of sites still dangling after
/// this pass, including the known ones.
pub fn link_document(
    root: &mut Ome,
    index: &DocumentIndex,
    registry: &IdRegistry,
    sink: &mut DiagnosticSink,
    known: &[DanglingSite],
) -> Vec<DanglingSite> {
    let mut linker = Linker {
        index,
        registry,
        sink,
        known,
        dangling: Vec::new(),
    };
    walk_document_mut(&mut linker, root);
    tracing::debug!(dangling = linker.dangling.len(), "link pass complete");
    linker.dangling
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::{DiagCode, DiagnosticSink};
    use omx_model::{BuildContext, FromElement};
    use omx_tree::{Element, Value};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::index::index_document;

    fn decode(el: Element) -> (Ome, IdRegistry, DiagnosticSink) {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let root = Ome::from_element(el, &mut cx).unwrap();
        (root, registry, sink)
    }

    fn project_before_dataset() -> Element {
        Element::new("OME")
            .with_field(
                "projects",
                Value::List(vec![Element::new("Project")
                    .with_field("dataset_refs", Value::List(vec!["Dataset:0".into()]))
                    .into()]),
            )
            .with_field(
                "datasets",
                Value::List(vec![Element::new("Dataset").into()]),
            )
    }

    #[test]
    fn forward_reference_links() {
        let (mut root, registry, mut sink) = decode(project_before_dataset());
        let index = index_document(&root, &registry).unwrap();

        let dangling = link_document(&mut root, &index, &registry, &mut sink, &[]);

        assert!(dangling.is_empty());
        assert!(sink.is_empty());
        let slot = &root.projects[0].dataset_refs[0].slot;
        assert_eq!(slot.lsid().unwrap().as_str(), "Dataset:0");
    }

    #[test]
    fn dangling_reference_warns_and_stays_raw() {
        let el = Element::new("OME").with_field(
            "projects",
            Value::List(vec![Element::new("Project")
                .with_field("dataset_refs", Value::List(vec!["Dataset:5".into()]))
                .into()]),
        );
        let (mut root, registry, mut sink) = decode(el);
        let index = index_document(&root, &registry).unwrap();

        let dangling = link_document(&mut root, &index, &registry, &mut sink, &[]);

        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].expected, Tag::Dataset);
        assert_eq!(dangling[0].target, "Dataset:5");
        assert_eq!(dangling[0].path.to_string(), "projects[0].dataset_refs[0]");
        let diags: Vec<_> = sink.iter().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagCode::W0201);
        assert!(!root.projects[0].dataset_refs[0].is_linked());
    }

    #[test]
    fn deferred_reference_follows_the_repair_memo() {
        // The ROI identifier fails the grammar; its assignment repairs it to
        // ROI:0 and the reference to the same bad spelling defers, then
        // links through the memo.
        let pixels = Element::new("Pixels")
            .with_field("dimension_order", "XYZCT")
            .with_field("kind", "uint8")
            .with_field("size_x", 2)
            .with_field("size_y", 2)
            .with_field("size_z", 1)
            .with_field("size_c", 1)
            .with_field("size_t", 1);
        let el = Element::new("OME")
            .with_field(
                "rois",
                Value::List(vec![Element::new("ROI")
                    .with_field("id", "NotAPattern")
                    .into()]),
            )
            .with_field(
                "images",
                Value::List(vec![Element::new("Image")
                    .with_field("pixels", pixels)
                    .with_field("roi_refs", Value::List(vec!["NotAPattern".into()]))
                    .into()]),
            );
        let (mut root, registry, mut sink) = decode(el);
        sink.take();
        let index = index_document(&root, &registry).unwrap();

        let dangling = link_document(&mut root, &index, &registry, &mut sink, &[]);

        assert!(dangling.is_empty());
        assert!(sink.is_empty());
        let slot = &root.images[0].roi_refs[0].slot;
        assert_eq!(slot.lsid().unwrap().as_str(), "ROI:0");
    }

    #[test]
    fn known_sites_are_not_reported_twice() {
        let el = Element::new("OME").with_field(
            "projects",
            Value::List(vec![Element::new("Project")
                .with_field("dataset_refs", Value::List(vec!["Dataset:5".into()]))
                .into()]),
        );
        let (mut root, registry, mut sink) = decode(el);
        let index = index_document(&root, &registry).unwrap();
        let first = link_document(&mut root, &index, &registry, &mut sink, &[]);
        sink.take();

        let second = link_document(&mut root, &index, &registry, &mut sink, &first);

        assert_eq!(second, first);
        assert!(sink.is_empty());
    }

    #[test]
    fn linked_slot_demotes_when_its_target_vanishes() {
        let (mut root, registry, mut sink) = decode(project_before_dataset());
        let index = index_document(&root, &registry).unwrap();
        link_document(&mut root, &index, &registry, &mut sink, &[]);

        root.datasets.clear();
        let mut pruned = IdRegistry::with_counters(registry.counters());
        for id in registry.claims().filter(|id| id.as_str() != "Dataset:0") {
            pruned.adopt(id.clone());
        }
        let index = index_document(&root, &pruned).unwrap();

        let dangling = link_document(&mut root, &index, &pruned, &mut sink, &[]);

        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target, "Dataset:0");
        let slot = &root.projects[0].dataset_refs[0].slot;
        assert!(matches!(slot.state, RefState::Raw(_)));
    }
}
