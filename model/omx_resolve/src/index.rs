//! The index pass.

use omx_diagnostic::{DiagCode, Diagnostic};
use omx_ids::{Id, IdRegistry, Lsid, Tag};
use omx_model::records::Ome;
use omx_model::visit::{walk_document, Visit};
use omx_tree::Path;
use rustc_hash::FxHashMap;

/// Where one identity lives in the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub tag: Tag,
    pub path: Path,
}

/// Identifier-to-location map over one document.
#[derive(Clone, Debug, Default)]
pub struct DocumentIndex {
    entries: FxHashMap<Lsid, IndexEntry>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        DocumentIndex::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The canonical identifier equal to `id`, sharing the index's storage.
    pub fn canonical(&self, id: &str) -> Option<&Lsid> {
        self.entries.get_key_value(id).map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Lsid, &IndexEntry)> {
        self.entries.iter()
    }
}

/// Walking a subtree over the index merges its identities in at the walked
/// paths, which is how a mutation extends the live index without a rebuild.
/// Identifier assignment runs on the subtree first, so an unassigned
/// identity cannot reach this and is skipped.
impl Visit for DocumentIndex {
    fn visit_identity(&mut self, tag: Tag, id: &Id, path: &Path) {
        if let Some(lsid) = id.lsid() {
            let entry = IndexEntry {
                tag,
                path: path.clone(),
            };
            self.entries.insert(lsid.clone(), entry);
        }
    }
}

/// The index pass missed identities the session claims to have assigned.
///
/// Decoded input cannot produce this: construction routes every identifier
/// through the registry, and the walk covers every identity position. It
/// means a record entered the document without assignment, or two records
/// carry one identifier. Resolution refuses to continue.
#[derive(Debug, thiserror::Error)]
#[error("document index does not cover every assigned identifier")]
pub struct IndexIncomplete {
    /// Claimed identifiers no walked record carries.
    pub missing: Vec<Lsid>,
    /// Paths of records whose identifier was never assigned.
    pub unassigned: Vec<Path>,
    /// Identifiers carried by more than one record.
    pub collided: Vec<Lsid>,
}

impl IndexIncomplete {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(DiagCode::E0201)
            .with_message("document index does not cover every assigned identifier");
        for id in &self.missing {
            diag = diag.with_note(format!("`{id}` is claimed but no record carries it"));
        }
        for path in &self.unassigned {
            diag = diag.with_note(format!("the record at {path} has no assigned identifier"));
        }
        for id in &self.collided {
            diag = diag.with_note(format!("`{id}` is carried by more than one record"));
        }
        diag
    }
}

struct Indexer {
    index: DocumentIndex,
    unassigned: Vec<Path>,
    collided: Vec<Lsid>,
}

impl Visit for Indexer {
    fn visit_identity(&mut self, tag: Tag, id: &Id, path: &Path) {
        match id.lsid() {
            Some(lsid) => {
                let entry = IndexEntry {
                    tag,
                    path: path.clone(),
                };
                if self.index.entries.insert(lsid.clone(), entry).is_some() {
                    self.collided.push(lsid.clone());
                }
            }
            None => self.unassigned.push(path.clone()),
        }
    }
}

/// Build the identifier index for a whole document.
///
/// Exhaustiveness is checked against the registry: every claim must come
/// back out of the walk exactly once.
pub fn index_document(root: &Ome, registry: &IdRegistry) -> Result<DocumentIndex, IndexIncomplete> {
    let mut indexer = Indexer {
        index: DocumentIndex::new(),
        unassigned: Vec::new(),
        collided: Vec::new(),
    };
    walk_document(&mut indexer, root);

    let mut missing: Vec<Lsid> = registry
        .claims()
        .filter(|id| !indexer.index.contains(id.as_str()))
        .cloned()
        .collect();
    missing.sort();

    if missing.is_empty() && indexer.unassigned.is_empty() && indexer.collided.is_empty() {
        tracing::debug!(objects = indexer.index.len(), "index pass complete");
        Ok(indexer.index)
    } else {
        Err(IndexIncomplete {
            missing,
            unassigned: indexer.unassigned,
            collided: indexer.collided,
        })
    }
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::DiagnosticSink;
    use omx_model::{BuildContext, FromElement};
    use omx_tree::Element;
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode(el: Element) -> (Ome, IdRegistry) {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let root = Ome::from_element(el, &mut cx).unwrap();
        (root, registry)
    }

    fn two_datasets() -> Element {
        Element::new("OME").with_field(
            "datasets",
            omx_tree::Value::List(vec![
                Element::new("Dataset").with_field("name", "a").into(),
                Element::new("Dataset").with_field("name", "b").into(),
            ]),
        )
    }

    #[test]
    fn index_locates_every_identity() {
        let (root, registry) = decode(two_datasets());
        let index = index_document(&root, &registry).unwrap();

        assert_eq!(index.len(), 2);
        let entry = index.get("Dataset:1").unwrap();
        assert_eq!(entry.tag, Tag::Dataset);
        assert_eq!(entry.path.to_string(), "datasets[1]");
        assert!(index.contains("Dataset:0"));
        assert!(!index.contains("Dataset:2"));
    }

    #[test]
    fn claim_without_a_record_is_fatal() {
        let (root, mut registry) = decode(two_datasets());
        registry.adopt(Lsid::from("Image:9"));

        let err = index_document(&root, &registry).unwrap_err();
        assert_eq!(err.missing, vec![Lsid::from("Image:9")]);
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, DiagCode::E0201);
        assert!(diag.notes[0].contains("Image:9"));
    }

    #[test]
    fn unassigned_identifier_is_fatal() {
        let (mut root, registry) = decode(two_datasets());
        root.datasets[1].id = Id::Auto;

        let err = index_document(&root, &registry).unwrap_err();
        assert_eq!(err.unassigned.len(), 1);
        assert_eq!(err.unassigned[0].to_string(), "datasets[1]");
        // The claim for the blanked identifier is now missing as well.
        assert_eq!(err.missing, vec![Lsid::from("Dataset:1")]);
    }

    #[test]
    fn one_identifier_on_two_records_is_fatal() {
        let (mut root, registry) = decode(two_datasets());
        root.datasets[1].id = Id::from("Dataset:0");

        let err = index_document(&root, &registry).unwrap_err();
        assert_eq!(err.collided, vec![Lsid::from("Dataset:0")]);
    }
}
