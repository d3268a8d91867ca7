//! The document facade.
//!
//! A [`Document`] owns one resolved metadata graph: the typed root, the
//! identifier index over it, the per-tag numbering high-water marks, and
//! every diagnostic the session produced. Construction decodes the event
//! tree and resolves references exactly once; afterwards the graph changes
//! through mutation operations that keep the index, the links, and the
//! counters in step, each atomic from the caller's point of view.

use omx_diagnostic::DiagnosticSink;
use omx_ids::{IdRegistry, Lsid, Tag};
use omx_model::records::{
    AnnotationValue, Dataset, Experimenter, ExperimenterGroup, Folder, Image, Instrument, Ome,
    Plate, Project, Roi, Screen, ShapeValue,
};
use omx_model::visit::{
    walk_annotation, walk_annotation_mut, walk_dataset, walk_dataset_mut, walk_experimenter,
    walk_experimenter_group, walk_experimenter_group_mut, walk_experimenter_mut, walk_folder,
    walk_folder_mut, walk_image, walk_image_mut, walk_instrument, walk_instrument_mut, walk_plate,
    walk_plate_mut, walk_project, walk_project_mut, walk_roi, walk_roi_mut, walk_screen,
    walk_screen_mut, walk_shape, walk_shape_mut,
};
use omx_model::{
    BuildContext, BuildError, EntityView, FromElement, Handle, Identified, Ref, ToElement,
    Viewable,
};
use omx_resolve::{
    link_document, referrer_table, resolve, Assigner, DanglingSite, DocumentIndex, ReferrerTable,
};
use omx_tree::{Element, Path, Step};

use crate::{ConstructError, FollowError, MutateError};

/// One resolved metadata document.
#[derive(Debug)]
pub struct Document {
    root: Ome,
    index: DocumentIndex,
    referrers: ReferrerTable,
    counters: [i64; Tag::COUNT],
    dangling: Vec<DanglingSite>,
    diagnostics: DiagnosticSink,
}

impl Document {
    /// Decode a full document tree and resolve every reference in it.
    ///
    /// Recoverable oddities (invalid-id casts, deprecated field names,
    /// unknown fields, dangling references) are retained as diagnostics on
    /// the returned document. An error here means no usable graph exists.
    pub fn construct(el: Element) -> Result<Self, ConstructError> {
        if el.name != Ome::ELEMENT {
            return Err(ConstructError::Build(BuildError::Structural {
                path: Path::root(),
                detail: format!(
                    "expected `{}` at the document root, found `{}`",
                    Ome::ELEMENT,
                    el.name
                ),
            }));
        }
        let mut registry = IdRegistry::new();
        let mut diagnostics = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut diagnostics);
        let mut root = Ome::from_element(el, &mut cx)?;
        let resolution = resolve(&mut root, &registry, &mut diagnostics)?;
        tracing::debug!(
            objects = resolution.index.len(),
            dangling = resolution.dangling.len(),
            diagnostics = diagnostics.len(),
            "document constructed"
        );
        Ok(Document {
            root,
            index: resolution.index,
            referrers: resolution.referrers,
            counters: registry.counters(),
            dangling: resolution.dangling,
            diagnostics,
        })
    }

    /// The typed graph.
    pub fn root(&self) -> &Ome {
        &self.root
    }

    /// Mutable access to field content.
    ///
    /// The index stays valid as long as edits keep every identity where it
    /// is; adding or removing identity-bearing records goes through the
    /// mutation operations instead.
    pub fn root_mut(&mut self) -> &mut Ome {
        &mut self.root
    }

    /// Serialize the graph back to its tree form.
    ///
    /// Reference fields write their target's identifier string, never a
    /// nested copy of the target.
    pub fn to_element(&self) -> Element {
        self.root.to_element()
    }

    /// Everything recoverable the sessions reported, in encounter order.
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// Reference sites whose target is absent, in document order.
    pub fn dangling(&self) -> &[DanglingSite] {
        &self.dangling
    }

    /// Number of identity-bearing objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Borrow the object carrying `id`.
    pub fn get(&self, id: &str) -> Option<EntityView<'_>> {
        let entry = self.index.get(id)?;
        EntityView::descend(&self.root, &entry.path)
    }

    /// Borrow the object a linked reference points at.
    pub fn follow<T: Viewable>(&self, reference: &Ref<T>) -> Result<&T, FollowError> {
        let Some(lsid) = reference.lsid() else {
            return Err(FollowError::Unresolved {
                target: reference.target().to_owned(),
            });
        };
        self.deref_id(lsid.as_str())
    }

    /// A typed handle to the object carrying `id`, if it is one of type `T`.
    pub fn handle<T: Viewable>(&self, id: &str) -> Option<Handle<T>> {
        let canonical = self.index.canonical(id)?;
        let entry = self.index.get(id)?;
        (entry.tag == T::TAG).then(|| Handle::new(canonical.clone()))
    }

    /// Borrow the object behind a handle.
    pub fn deref<T: Viewable>(&self, handle: &Handle<T>) -> Result<&T, FollowError> {
        self.deref_id(handle.id().as_str())
    }

    fn deref_id<T: Viewable>(&self, id: &str) -> Result<&T, FollowError> {
        let stale = || FollowError::Stale { id: id.to_owned() };
        let entry = self.index.get(id).ok_or_else(stale)?;
        EntityView::descend(&self.root, &entry.path)
            .and_then(|view| view.downcast())
            .ok_or_else(stale)
    }

    /// Paths of every linked site pointing at `id`, in document order.
    pub fn referrers(&self, id: &str) -> &[Path] {
        self.referrers.of(id)
    }

    // Mutation. Each operation either fully lands the record (identifier
    // assigned, subtree indexed, references linked) or leaves the document
    // untouched.

    /// Fresh registry for one mutation session: numbering resumes from the
    /// retained high-water marks, and every indexed identifier is claimed
    /// so additions cannot collide with existing objects.
    fn session_registry(&self) -> IdRegistry {
        let mut registry = IdRegistry::with_counters(self.counters);
        for (id, _) in self.index.iter() {
            registry.adopt(id.clone());
        }
        registry
    }

    /// Close out a committed insertion: bind the new subtree's references,
    /// heal previously dangling sites whose target just appeared, and fold
    /// the staged diagnostics in. Sites already reported stay quiet.
    fn commit(&mut self, registry: &IdRegistry, mut staged: DiagnosticSink) {
        let known = std::mem::take(&mut self.dangling);
        self.dangling = link_document(&mut self.root, &self.index, registry, &mut staged, &known);
        self.referrers = referrer_table(&self.root);
        self.counters = registry.counters();
        self.diagnostics.absorb(staged);
    }
}

fn assigned_id<T: Identified>(record: &T) -> Lsid {
    match record.lsid() {
        Some(id) => id.clone(),
        // Assignment visits the record's own identity first.
        None => unreachable!("record left assignment without an identifier"),
    }
}

macro_rules! insert_ops {
    ($(
        $(#[$meta:meta])*
        $fn_name:ident($field:ident: $ty:ty) = $walk_mut:ident / $walk:ident;
    )*) => { $(
        $(#[$meta])*
        pub fn $fn_name(&mut self, record: $ty) -> Result<Lsid, MutateError> {
            let mut record = record;
            let mut registry = self.session_registry();
            let mut staged = DiagnosticSink::new();
            let mut path = Path::root();
            path.push_field(stringify!($field));
            path.push_index(self.root.$field.len());
            let mut assigner = Assigner::new(&mut registry, &mut staged);
            $walk_mut(&mut assigner, &mut record, &mut path);
            assigner
                .finish()
                .map_err(|(source, path)| MutateError::DuplicateId { source, path })?;
            let id = assigned_id(&record);
            $walk(&mut self.index, &record, &mut path);
            self.root.$field.push(record);
            self.commit(&registry, staged);
            tracing::debug!(%id, "record inserted");
            Ok(id)
        }
    )* };
}

impl Document {
    insert_ops! {
        /// Add a project to the document, returning its identifier.
        add_project(projects: Project) = walk_project_mut / walk_project;
        /// Add a dataset to the document, returning its identifier.
        add_dataset(datasets: Dataset) = walk_dataset_mut / walk_dataset;
        /// Add a folder to the document, returning its identifier.
        add_folder(folders: Folder) = walk_folder_mut / walk_folder;
        /// Add an experimenter to the document, returning their identifier.
        add_experimenter(experimenters: Experimenter) =
            walk_experimenter_mut / walk_experimenter;
        /// Add an experimenter group to the document, returning its
        /// identifier.
        add_experimenter_group(experimenter_groups: ExperimenterGroup) =
            walk_experimenter_group_mut / walk_experimenter_group;
        /// Add an instrument (with its nested hardware) to the document,
        /// returning its identifier.
        add_instrument(instruments: Instrument) = walk_instrument_mut / walk_instrument;
        /// Add an image (with its pixels, channels, and planes) to the
        /// document, returning its identifier.
        add_image(images: Image) = walk_image_mut / walk_image;
        /// Add a plate to the document, returning its identifier.
        add_plate(plates: Plate) = walk_plate_mut / walk_plate;
        /// Add a screen to the document, returning its identifier.
        add_screen(screens: Screen) = walk_screen_mut / walk_screen;
        /// Add a region of interest to the document, returning its
        /// identifier.
        add_roi(rois: Roi) = walk_roi_mut / walk_roi;
    }

    /// Append a structured annotation to the root list, returning its
    /// identifier.
    pub fn add_annotation(
        &mut self,
        annotation: impl Into<AnnotationValue>,
    ) -> Result<Lsid, MutateError> {
        let mut record = annotation.into();
        let mut registry = self.session_registry();
        let mut staged = DiagnosticSink::new();
        let mut path = Path::root();
        path.push_field("structured_annotations");
        path.push_index(self.root.structured_annotations.len());
        let mut assigner = Assigner::new(&mut registry, &mut staged);
        walk_annotation_mut(&mut assigner, &mut record, &mut path);
        assigner
            .finish()
            .map_err(|(source, path)| MutateError::DuplicateId { source, path })?;
        let id = assigned_id(&record);
        walk_annotation(&mut self.index, &record, &mut path);
        self.root.structured_annotations.push(record);
        self.commit(&registry, staged);
        tracing::debug!(%id, "annotation inserted");
        Ok(id)
    }

    /// Append a shape to the region of interest carrying `roi_id`,
    /// returning the shape's identifier.
    pub fn append_shape(
        &mut self,
        roi_id: &str,
        shape: impl Into<ShapeValue>,
    ) -> Result<Lsid, MutateError> {
        let at = self.roi_position(roi_id)?;
        let mut record = shape.into();
        let mut registry = self.session_registry();
        let mut staged = DiagnosticSink::new();
        let mut path = Self::shape_path(at, self.root.rois[at].union.len());
        let mut assigner = Assigner::new(&mut registry, &mut staged);
        walk_shape_mut(&mut assigner, &mut record, &mut path);
        assigner
            .finish()
            .map_err(|(source, path)| MutateError::DuplicateId { source, path })?;
        let id = assigned_id(&record);
        walk_shape(&mut self.index, &record, &mut path);
        self.root.rois[at].union.push(record);
        self.commit(&registry, staged);
        tracing::debug!(%id, roi = roi_id, "shape appended");
        Ok(id)
    }

    /// Decode one shape event and append it to the region of interest
    /// carrying `roi_id`.
    ///
    /// The payload goes through the same variant selection as bulk
    /// construction: a concrete event name or a `kind` field picks the
    /// variant directly; an anonymous mapping is resolved by priority
    /// trials.
    pub fn append_shape_element(
        &mut self,
        roi_id: &str,
        el: Element,
    ) -> Result<Lsid, MutateError> {
        let at = self.roi_position(roi_id)?;
        let mut registry = self.session_registry();
        let mut staged = DiagnosticSink::new();
        let union_at = self.root.rois[at].union.len();
        let mut cx = BuildContext::new(&mut registry, &mut staged);
        cx.path = Self::shape_path(at, union_at);
        // A failed decode appends nothing, so the graph stays as it was.
        self.root.rois[at].union.append_element(el, &mut cx)?;
        let Some(record) = self.root.rois[at].union.get(union_at) else {
            unreachable!("a successful append places one variant");
        };
        let id = assigned_id(record);
        let mut path = Self::shape_path(at, union_at);
        walk_shape(&mut self.index, record, &mut path);
        self.commit(&registry, staged);
        tracing::debug!(%id, roi = roi_id, "shape appended");
        Ok(id)
    }

    fn roi_position(&self, roi_id: &str) -> Result<usize, MutateError> {
        let miss = || MutateError::UnknownTarget {
            id: roi_id.to_owned(),
        };
        let entry = self.index.get(roi_id).ok_or_else(miss)?;
        match entry.path.steps() {
            [Step::Field("rois"), Step::Index(i)] => usize::try_from(*i).map_err(|_| miss()),
            _ => Err(miss()),
        }
    }

    /// Path of shape slot `slot` on the ROI at `rois[at]`.
    fn shape_path(at: usize, slot: usize) -> Path {
        let mut path = Path::root();
        path.push_field("rois");
        path.push_index(at);
        path.push_field("union");
        path.push_index(slot);
        path
    }
}
