//! Traversal over every identity and reference site in a document.
//!
//! `Visit` is the read-only walk: implementors override the hooks they
//! need and call [`walk_document`] (or any of the narrower `walk_*`
//! functions) to drive it. The walkers thread a [`Path`] so a hook always
//! knows where in the tree it is standing; the path names match the tree
//! form exactly.
//!
//! `VisitMut` mirrors the walk with mutable hooks: the link pass rewrites
//! reference slots in place, and insertion assigns identifiers to records
//! built outside a decode.

use omx_ids::{Id, Tag};
use omx_tree::Path;

use crate::records::{
    AnnotationValue, Channel, Dataset, Detector, DetectorSettings, Dichroic, Experimenter,
    ExperimenterGroup, Filter, FilterSet, Folder, Image, Instrument, LightSourceSettings,
    LightSourceValue, Objective, ObjectiveSettings, Ome, Pixels, Plane, Plate, Project, Reagent,
    Roi, Screen, ShapeValue, Well, WellSample,
};
use crate::refs::{Ref, RefSlot};
use crate::Identified;

/// Read-only hooks, called once per identity and once per reference site.
pub trait Visit {
    fn visit_identity(&mut self, _tag: Tag, _id: &Id, _path: &Path) {}

    /// `tag` is the identity type the site expects its target to carry.
    fn visit_reference(&mut self, _tag: Tag, _slot: &RefSlot, _path: &Path) {}
}

/// Mutable hooks, for identifier assignment and reference linking.
pub trait VisitMut {
    fn visit_identity_mut(&mut self, _tag: Tag, _id: &mut Id, _path: &Path) {}

    fn visit_reference_mut(&mut self, _tag: Tag, _slot: &mut RefSlot, _path: &Path) {}
}

/// Walk a whole document from the root.
pub fn walk_document<V: Visit + ?Sized>(v: &mut V, root: &Ome) {
    let mut path = Path::root();
    walk_ome(v, root, &mut path);
}

/// Walk every reference slot of a whole document mutably.
pub fn walk_document_mut<V: VisitMut + ?Sized>(v: &mut V, root: &mut Ome) {
    let mut path = Path::root();
    walk_ome_mut(v, root, &mut path);
}

fn each<N, V: Visit + ?Sized>(
    v: &mut V,
    field: &'static str,
    items: &[N],
    path: &mut Path,
    walk: fn(&mut V, &N, &mut Path),
) {
    path.push_field(field);
    for (index, node) in items.iter().enumerate() {
        path.push_index(index);
        walk(v, node, path);
        path.pop();
    }
    path.pop();
}

fn nested<N, V: Visit + ?Sized>(
    v: &mut V,
    field: &'static str,
    node: Option<&N>,
    path: &mut Path,
    walk: fn(&mut V, &N, &mut Path),
) {
    if let Some(node) = node {
        path.push_field(field);
        walk(v, node, path);
        path.pop();
    }
}

fn opt_ref<T: Identified, V: Visit + ?Sized>(
    v: &mut V,
    field: &'static str,
    reference: &Option<Ref<T>>,
    path: &mut Path,
) {
    if let Some(reference) = reference {
        path.push_field(field);
        v.visit_reference(T::TAG, &reference.slot, path);
        path.pop();
    }
}

fn ref_list<T: Identified, V: Visit + ?Sized>(
    v: &mut V,
    field: &'static str,
    refs: &[Ref<T>],
    path: &mut Path,
) {
    path.push_field(field);
    for (index, reference) in refs.iter().enumerate() {
        path.push_index(index);
        v.visit_reference(T::TAG, &reference.slot, path);
        path.pop();
    }
    path.pop();
}

pub fn walk_ome<V: Visit + ?Sized>(v: &mut V, root: &Ome, path: &mut Path) {
    each(v, "projects", &root.projects, path, walk_project);
    each(v, "datasets", &root.datasets, path, walk_dataset);
    each(v, "folders", &root.folders, path, walk_folder);
    each(v, "experimenters", &root.experimenters, path, walk_experimenter);
    each(
        v,
        "experimenter_groups",
        &root.experimenter_groups,
        path,
        walk_experimenter_group,
    );
    each(v, "instruments", &root.instruments, path, walk_instrument);
    each(v, "images", &root.images, path, walk_image);
    each(
        v,
        "structured_annotations",
        root.structured_annotations.as_slice(),
        path,
        walk_annotation,
    );
    each(v, "plates", &root.plates, path, walk_plate);
    each(v, "screens", &root.screens, path, walk_screen);
    each(v, "rois", &root.rois, path, walk_roi);
}

pub fn walk_project<V: Visit + ?Sized>(v: &mut V, node: &Project, path: &mut Path) {
    v.visit_identity(Tag::Project, &node.id, path);
    opt_ref(v, "experimenter_ref", &node.experimenter_ref, path);
    opt_ref(v, "experimenter_group_ref", &node.experimenter_group_ref, path);
    ref_list(v, "dataset_refs", &node.dataset_refs, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_dataset<V: Visit + ?Sized>(v: &mut V, node: &Dataset, path: &mut Path) {
    v.visit_identity(Tag::Dataset, &node.id, path);
    opt_ref(v, "experimenter_ref", &node.experimenter_ref, path);
    opt_ref(v, "experimenter_group_ref", &node.experimenter_group_ref, path);
    ref_list(v, "image_refs", &node.image_refs, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_folder<V: Visit + ?Sized>(v: &mut V, node: &Folder, path: &mut Path) {
    v.visit_identity(Tag::Folder, &node.id, path);
    ref_list(v, "folder_refs", &node.folder_refs, path);
    ref_list(v, "image_refs", &node.image_refs, path);
    ref_list(v, "roi_refs", &node.roi_refs, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_experimenter<V: Visit + ?Sized>(v: &mut V, node: &Experimenter, path: &mut Path) {
    v.visit_identity(Tag::Experimenter, &node.id, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_experimenter_group<V: Visit + ?Sized>(
    v: &mut V,
    node: &ExperimenterGroup,
    path: &mut Path,
) {
    v.visit_identity(Tag::ExperimenterGroup, &node.id, path);
    ref_list(v, "experimenter_refs", &node.experimenter_refs, path);
    ref_list(v, "leaders", &node.leaders, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_instrument<V: Visit + ?Sized>(v: &mut V, node: &Instrument, path: &mut Path) {
    v.visit_identity(Tag::Instrument, &node.id, path);
    each(
        v,
        "light_sources",
        node.light_sources.as_slice(),
        path,
        walk_light_source,
    );
    each(v, "detectors", &node.detectors, path, walk_detector);
    each(v, "objectives", &node.objectives, path, walk_objective);
    each(v, "filter_sets", &node.filter_sets, path, walk_filter_set);
    each(v, "filters", &node.filters, path, walk_filter);
    each(v, "dichroics", &node.dichroics, path, walk_dichroic);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_light_source<V: Visit + ?Sized>(v: &mut V, node: &LightSourceValue, path: &mut Path) {
    v.visit_identity(Tag::LightSource, &node.attrs().id, path);
    if let LightSourceValue::Laser(laser) = node {
        opt_ref(v, "pump", &laser.pump, path);
    }
}

pub fn walk_detector<V: Visit + ?Sized>(v: &mut V, node: &Detector, path: &mut Path) {
    v.visit_identity(Tag::Detector, &node.id, path);
}

pub fn walk_objective<V: Visit + ?Sized>(v: &mut V, node: &Objective, path: &mut Path) {
    v.visit_identity(Tag::Objective, &node.id, path);
}

pub fn walk_filter<V: Visit + ?Sized>(v: &mut V, node: &Filter, path: &mut Path) {
    v.visit_identity(Tag::Filter, &node.id, path);
}

pub fn walk_filter_set<V: Visit + ?Sized>(v: &mut V, node: &FilterSet, path: &mut Path) {
    v.visit_identity(Tag::FilterSet, &node.id, path);
    ref_list(v, "excitation_filters", &node.excitation_filters, path);
    opt_ref(v, "dichroic_ref", &node.dichroic_ref, path);
    ref_list(v, "emission_filters", &node.emission_filters, path);
}

pub fn walk_dichroic<V: Visit + ?Sized>(v: &mut V, node: &Dichroic, path: &mut Path) {
    v.visit_identity(Tag::Dichroic, &node.id, path);
}

pub fn walk_image<V: Visit + ?Sized>(v: &mut V, node: &Image, path: &mut Path) {
    v.visit_identity(Tag::Image, &node.id, path);
    opt_ref(v, "experimenter_ref", &node.experimenter_ref, path);
    opt_ref(v, "experimenter_group_ref", &node.experimenter_group_ref, path);
    opt_ref(v, "instrument_ref", &node.instrument_ref, path);
    nested(
        v,
        "objective_settings",
        node.objective_settings.as_ref(),
        path,
        walk_objective_settings,
    );
    path.push_field("pixels");
    walk_pixels(v, &node.pixels, path);
    path.pop();
    ref_list(v, "roi_refs", &node.roi_refs, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_objective_settings<V: Visit + ?Sized>(
    v: &mut V,
    node: &ObjectiveSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference(Tag::Objective, &node.target.slot, path);
    path.pop();
}

pub fn walk_pixels<V: Visit + ?Sized>(v: &mut V, node: &Pixels, path: &mut Path) {
    v.visit_identity(Tag::Pixels, &node.id, path);
    each(v, "channels", &node.channels, path, walk_channel);
    each(v, "planes", &node.planes, path, walk_plane);
}

pub fn walk_channel<V: Visit + ?Sized>(v: &mut V, node: &Channel, path: &mut Path) {
    v.visit_identity(Tag::Channel, &node.id, path);
    nested(
        v,
        "light_source_settings",
        node.light_source_settings.as_ref(),
        path,
        walk_light_source_settings,
    );
    nested(
        v,
        "detector_settings",
        node.detector_settings.as_ref(),
        path,
        walk_detector_settings,
    );
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_light_source_settings<V: Visit + ?Sized>(
    v: &mut V,
    node: &LightSourceSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference(Tag::LightSource, &node.target.slot, path);
    path.pop();
}

pub fn walk_detector_settings<V: Visit + ?Sized>(
    v: &mut V,
    node: &DetectorSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference(Tag::Detector, &node.target.slot, path);
    path.pop();
}

pub fn walk_plane<V: Visit + ?Sized>(v: &mut V, node: &Plane, path: &mut Path) {
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_plate<V: Visit + ?Sized>(v: &mut V, node: &Plate, path: &mut Path) {
    v.visit_identity(Tag::Plate, &node.id, path);
    each(v, "wells", &node.wells, path, walk_well);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_well<V: Visit + ?Sized>(v: &mut V, node: &Well, path: &mut Path) {
    v.visit_identity(Tag::Well, &node.id, path);
    each(v, "well_samples", &node.well_samples, path, walk_well_sample);
    opt_ref(v, "reagent_ref", &node.reagent_ref, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_well_sample<V: Visit + ?Sized>(v: &mut V, node: &WellSample, path: &mut Path) {
    v.visit_identity(Tag::WellSample, &node.id, path);
    opt_ref(v, "image_ref", &node.image_ref, path);
}

pub fn walk_screen<V: Visit + ?Sized>(v: &mut V, node: &Screen, path: &mut Path) {
    v.visit_identity(Tag::Screen, &node.id, path);
    each(v, "reagents", &node.reagents, path, walk_reagent);
    ref_list(v, "plate_refs", &node.plate_refs, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_reagent<V: Visit + ?Sized>(v: &mut V, node: &Reagent, path: &mut Path) {
    v.visit_identity(Tag::Reagent, &node.id, path);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_roi<V: Visit + ?Sized>(v: &mut V, node: &Roi, path: &mut Path) {
    v.visit_identity(Tag::Roi, &node.id, path);
    each(v, "union", node.union.as_slice(), path, walk_shape);
    ref_list(v, "annotation_refs", &node.annotation_refs, path);
}

pub fn walk_shape<V: Visit + ?Sized>(v: &mut V, node: &ShapeValue, path: &mut Path) {
    v.visit_identity(Tag::Shape, &node.attrs().id, path);
}

pub fn walk_annotation<V: Visit + ?Sized>(v: &mut V, node: &AnnotationValue, path: &mut Path) {
    let attrs = node.attrs();
    v.visit_identity(Tag::Annotation, &attrs.id, path);
    opt_ref(v, "annotator", &attrs.annotator, path);
    if let AnnotationValue::ListAnnotation(list) = node {
        ref_list(v, "annotation_refs", &list.annotation_refs, path);
    }
}

fn each_mut<N, V: VisitMut + ?Sized>(
    v: &mut V,
    field: &'static str,
    items: &mut [N],
    path: &mut Path,
    walk: fn(&mut V, &mut N, &mut Path),
) {
    path.push_field(field);
    for (index, node) in items.iter_mut().enumerate() {
        path.push_index(index);
        walk(v, node, path);
        path.pop();
    }
    path.pop();
}

fn nested_mut<N, V: VisitMut + ?Sized>(
    v: &mut V,
    field: &'static str,
    node: Option<&mut N>,
    path: &mut Path,
    walk: fn(&mut V, &mut N, &mut Path),
) {
    if let Some(node) = node {
        path.push_field(field);
        walk(v, node, path);
        path.pop();
    }
}

fn opt_ref_mut<T: Identified, V: VisitMut + ?Sized>(
    v: &mut V,
    field: &'static str,
    reference: &mut Option<Ref<T>>,
    path: &mut Path,
) {
    if let Some(reference) = reference {
        path.push_field(field);
        v.visit_reference_mut(T::TAG, &mut reference.slot, path);
        path.pop();
    }
}

fn ref_list_mut<T: Identified, V: VisitMut + ?Sized>(
    v: &mut V,
    field: &'static str,
    refs: &mut [Ref<T>],
    path: &mut Path,
) {
    path.push_field(field);
    for (index, reference) in refs.iter_mut().enumerate() {
        path.push_index(index);
        v.visit_reference_mut(T::TAG, &mut reference.slot, path);
        path.pop();
    }
    path.pop();
}

pub fn walk_ome_mut<V: VisitMut + ?Sized>(v: &mut V, root: &mut Ome, path: &mut Path) {
    each_mut(v, "projects", &mut root.projects, path, walk_project_mut);
    each_mut(v, "datasets", &mut root.datasets, path, walk_dataset_mut);
    each_mut(v, "folders", &mut root.folders, path, walk_folder_mut);
    each_mut(
        v,
        "experimenters",
        &mut root.experimenters,
        path,
        walk_experimenter_mut,
    );
    each_mut(
        v,
        "experimenter_groups",
        &mut root.experimenter_groups,
        path,
        walk_experimenter_group_mut,
    );
    each_mut(
        v,
        "instruments",
        &mut root.instruments,
        path,
        walk_instrument_mut,
    );
    each_mut(v, "images", &mut root.images, path, walk_image_mut);
    each_mut(
        v,
        "structured_annotations",
        root.structured_annotations.as_mut_slice(),
        path,
        walk_annotation_mut,
    );
    each_mut(v, "plates", &mut root.plates, path, walk_plate_mut);
    each_mut(v, "screens", &mut root.screens, path, walk_screen_mut);
    each_mut(v, "rois", &mut root.rois, path, walk_roi_mut);
}

pub fn walk_project_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Project, path: &mut Path) {
    v.visit_identity_mut(Tag::Project, &mut node.id, path);
    opt_ref_mut(v, "experimenter_ref", &mut node.experimenter_ref, path);
    opt_ref_mut(
        v,
        "experimenter_group_ref",
        &mut node.experimenter_group_ref,
        path,
    );
    ref_list_mut(v, "dataset_refs", &mut node.dataset_refs, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_dataset_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Dataset, path: &mut Path) {
    v.visit_identity_mut(Tag::Dataset, &mut node.id, path);
    opt_ref_mut(v, "experimenter_ref", &mut node.experimenter_ref, path);
    opt_ref_mut(
        v,
        "experimenter_group_ref",
        &mut node.experimenter_group_ref,
        path,
    );
    ref_list_mut(v, "image_refs", &mut node.image_refs, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_folder_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Folder, path: &mut Path) {
    v.visit_identity_mut(Tag::Folder, &mut node.id, path);
    ref_list_mut(v, "folder_refs", &mut node.folder_refs, path);
    ref_list_mut(v, "image_refs", &mut node.image_refs, path);
    ref_list_mut(v, "roi_refs", &mut node.roi_refs, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_experimenter_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut Experimenter,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::Experimenter, &mut node.id, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_experimenter_group_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut ExperimenterGroup,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::ExperimenterGroup, &mut node.id, path);
    ref_list_mut(v, "experimenter_refs", &mut node.experimenter_refs, path);
    ref_list_mut(v, "leaders", &mut node.leaders, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_instrument_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut Instrument,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::Instrument, &mut node.id, path);
    each_mut(
        v,
        "light_sources",
        node.light_sources.as_mut_slice(),
        path,
        walk_light_source_mut,
    );
    each_mut(v, "detectors", &mut node.detectors, path, walk_detector_mut);
    each_mut(v, "objectives", &mut node.objectives, path, walk_objective_mut);
    each_mut(
        v,
        "filter_sets",
        &mut node.filter_sets,
        path,
        walk_filter_set_mut,
    );
    each_mut(v, "filters", &mut node.filters, path, walk_filter_mut);
    each_mut(v, "dichroics", &mut node.dichroics, path, walk_dichroic_mut);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_light_source_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut LightSourceValue,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::LightSource, &mut node.attrs_mut().id, path);
    if let LightSourceValue::Laser(laser) = node {
        opt_ref_mut(v, "pump", &mut laser.pump, path);
    }
}

pub fn walk_detector_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Detector, path: &mut Path) {
    v.visit_identity_mut(Tag::Detector, &mut node.id, path);
}

pub fn walk_objective_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Objective, path: &mut Path) {
    v.visit_identity_mut(Tag::Objective, &mut node.id, path);
}

pub fn walk_filter_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Filter, path: &mut Path) {
    v.visit_identity_mut(Tag::Filter, &mut node.id, path);
}

pub fn walk_dichroic_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Dichroic, path: &mut Path) {
    v.visit_identity_mut(Tag::Dichroic, &mut node.id, path);
}

pub fn walk_filter_set_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut FilterSet, path: &mut Path) {
    v.visit_identity_mut(Tag::FilterSet, &mut node.id, path);
    ref_list_mut(v, "excitation_filters", &mut node.excitation_filters, path);
    opt_ref_mut(v, "dichroic_ref", &mut node.dichroic_ref, path);
    ref_list_mut(v, "emission_filters", &mut node.emission_filters, path);
}

pub fn walk_image_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Image, path: &mut Path) {
    v.visit_identity_mut(Tag::Image, &mut node.id, path);
    opt_ref_mut(v, "experimenter_ref", &mut node.experimenter_ref, path);
    opt_ref_mut(
        v,
        "experimenter_group_ref",
        &mut node.experimenter_group_ref,
        path,
    );
    opt_ref_mut(v, "instrument_ref", &mut node.instrument_ref, path);
    nested_mut(
        v,
        "objective_settings",
        node.objective_settings.as_mut(),
        path,
        walk_objective_settings_mut,
    );
    path.push_field("pixels");
    walk_pixels_mut(v, &mut node.pixels, path);
    path.pop();
    ref_list_mut(v, "roi_refs", &mut node.roi_refs, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_objective_settings_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut ObjectiveSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference_mut(Tag::Objective, &mut node.target.slot, path);
    path.pop();
}

pub fn walk_pixels_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Pixels, path: &mut Path) {
    v.visit_identity_mut(Tag::Pixels, &mut node.id, path);
    each_mut(v, "channels", &mut node.channels, path, walk_channel_mut);
    each_mut(v, "planes", &mut node.planes, path, walk_plane_mut);
}

pub fn walk_channel_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Channel, path: &mut Path) {
    v.visit_identity_mut(Tag::Channel, &mut node.id, path);
    nested_mut(
        v,
        "light_source_settings",
        node.light_source_settings.as_mut(),
        path,
        walk_light_source_settings_mut,
    );
    nested_mut(
        v,
        "detector_settings",
        node.detector_settings.as_mut(),
        path,
        walk_detector_settings_mut,
    );
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_light_source_settings_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut LightSourceSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference_mut(Tag::LightSource, &mut node.target.slot, path);
    path.pop();
}

pub fn walk_detector_settings_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut DetectorSettings,
    path: &mut Path,
) {
    path.push_field("id");
    v.visit_reference_mut(Tag::Detector, &mut node.target.slot, path);
    path.pop();
}

pub fn walk_plane_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Plane, path: &mut Path) {
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_plate_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Plate, path: &mut Path) {
    v.visit_identity_mut(Tag::Plate, &mut node.id, path);
    each_mut(v, "wells", &mut node.wells, path, walk_well_mut);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_well_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Well, path: &mut Path) {
    v.visit_identity_mut(Tag::Well, &mut node.id, path);
    each_mut(
        v,
        "well_samples",
        &mut node.well_samples,
        path,
        walk_well_sample_mut,
    );
    opt_ref_mut(v, "reagent_ref", &mut node.reagent_ref, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_well_sample_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut WellSample,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::WellSample, &mut node.id, path);
    opt_ref_mut(v, "image_ref", &mut node.image_ref, path);
}

pub fn walk_screen_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Screen, path: &mut Path) {
    v.visit_identity_mut(Tag::Screen, &mut node.id, path);
    each_mut(v, "reagents", &mut node.reagents, path, walk_reagent_mut);
    ref_list_mut(v, "plate_refs", &mut node.plate_refs, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_reagent_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Reagent, path: &mut Path) {
    v.visit_identity_mut(Tag::Reagent, &mut node.id, path);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_roi_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut Roi, path: &mut Path) {
    v.visit_identity_mut(Tag::Roi, &mut node.id, path);
    each_mut(v, "union", node.union.as_mut_slice(), path, walk_shape_mut);
    ref_list_mut(v, "annotation_refs", &mut node.annotation_refs, path);
}

pub fn walk_shape_mut<V: VisitMut + ?Sized>(v: &mut V, node: &mut ShapeValue, path: &mut Path) {
    v.visit_identity_mut(Tag::Shape, &mut node.attrs_mut().id, path);
}

pub fn walk_annotation_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    node: &mut AnnotationValue,
    path: &mut Path,
) {
    v.visit_identity_mut(Tag::Annotation, &mut node.attrs_mut().id, path);
    opt_ref_mut(v, "annotator", &mut node.attrs_mut().annotator, path);
    if let AnnotationValue::ListAnnotation(list) = node {
        ref_list_mut(v, "annotation_refs", &mut list.annotation_refs, path);
    }
}
