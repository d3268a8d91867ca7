//! Borrowed views of identity-bearing records.
//!
//! The resolver indexes objects by identifier and remembers where each one
//! lives as a [`Path`]. [`EntityView::descend`] turns such a path back into
//! a typed borrow without searching: entity paths follow a fixed grammar,
//! so the walk is a single slice match plus a few indexed lookups.

use omx_ids::{Id, Tag};
use omx_tree::{Path, Step};

use crate::records::{
    AnnotationValue, Channel, Dataset, Detector, Dichroic, Experimenter, ExperimenterGroup,
    Filter, FilterSet, Folder, Image, Instrument, LightSourceValue, Objective, Ome, Pixels, Plate,
    Project, Reagent, Roi, Screen, ShapeValue, Well, WellSample,
};
use crate::Identified;

/// A borrow of one identity-bearing record, one variant per identity tag.
#[derive(Copy, Clone, Debug)]
pub enum EntityView<'a> {
    Project(&'a Project),
    Dataset(&'a Dataset),
    Folder(&'a Folder),
    Experimenter(&'a Experimenter),
    ExperimenterGroup(&'a ExperimenterGroup),
    Instrument(&'a Instrument),
    LightSource(&'a LightSourceValue),
    Detector(&'a Detector),
    Objective(&'a Objective),
    Filter(&'a Filter),
    Dichroic(&'a Dichroic),
    FilterSet(&'a FilterSet),
    Image(&'a Image),
    Pixels(&'a Pixels),
    Channel(&'a Channel),
    Plate(&'a Plate),
    Well(&'a Well),
    WellSample(&'a WellSample),
    Screen(&'a Screen),
    Reagent(&'a Reagent),
    Roi(&'a Roi),
    Shape(&'a ShapeValue),
    Annotation(&'a AnnotationValue),
}

fn at(index: u32) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

impl<'a> EntityView<'a> {
    /// Follow an entity path from the root.
    ///
    /// Returns `None` when the path does not name an identity position or
    /// its indices fall outside the current document.
    pub fn descend(root: &'a Ome, path: &Path) -> Option<Self> {
        use Step::{Field, Index};

        let view = match path.steps() {
            [Field("projects"), Index(i)] => EntityView::Project(root.projects.get(at(*i))?),
            [Field("datasets"), Index(i)] => EntityView::Dataset(root.datasets.get(at(*i))?),
            [Field("folders"), Index(i)] => EntityView::Folder(root.folders.get(at(*i))?),
            [Field("experimenters"), Index(i)] => {
                EntityView::Experimenter(root.experimenters.get(at(*i))?)
            }
            [Field("experimenter_groups"), Index(i)] => {
                EntityView::ExperimenterGroup(root.experimenter_groups.get(at(*i))?)
            }
            [Field("instruments"), Index(i), rest @ ..] => {
                let instrument = root.instruments.get(at(*i))?;
                match rest {
                    [] => EntityView::Instrument(instrument),
                    [Field("light_sources"), Index(j)] => {
                        EntityView::LightSource(instrument.light_sources.get(at(*j))?)
                    }
                    [Field("detectors"), Index(j)] => {
                        EntityView::Detector(instrument.detectors.get(at(*j))?)
                    }
                    [Field("objectives"), Index(j)] => {
                        EntityView::Objective(instrument.objectives.get(at(*j))?)
                    }
                    [Field("filter_sets"), Index(j)] => {
                        EntityView::FilterSet(instrument.filter_sets.get(at(*j))?)
                    }
                    [Field("filters"), Index(j)] => {
                        EntityView::Filter(instrument.filters.get(at(*j))?)
                    }
                    [Field("dichroics"), Index(j)] => {
                        EntityView::Dichroic(instrument.dichroics.get(at(*j))?)
                    }
                    _ => return None,
                }
            }
            [Field("images"), Index(i), rest @ ..] => {
                let image = root.images.get(at(*i))?;
                match rest {
                    [] => EntityView::Image(image),
                    [Field("pixels")] => EntityView::Pixels(&image.pixels),
                    [Field("pixels"), Field("channels"), Index(j)] => {
                        EntityView::Channel(image.pixels.channels.get(at(*j))?)
                    }
                    _ => return None,
                }
            }
            [Field("structured_annotations"), Index(i)] => {
                EntityView::Annotation(root.structured_annotations.get(at(*i))?)
            }
            [Field("plates"), Index(i), rest @ ..] => {
                let plate = root.plates.get(at(*i))?;
                match rest {
                    [] => EntityView::Plate(plate),
                    [Field("wells"), Index(j)] => EntityView::Well(plate.wells.get(at(*j))?),
                    [Field("wells"), Index(j), Field("well_samples"), Index(k)] => {
                        EntityView::WellSample(plate.wells.get(at(*j))?.well_samples.get(at(*k))?)
                    }
                    _ => return None,
                }
            }
            [Field("screens"), Index(i), rest @ ..] => {
                let screen = root.screens.get(at(*i))?;
                match rest {
                    [] => EntityView::Screen(screen),
                    [Field("reagents"), Index(j)] => {
                        EntityView::Reagent(screen.reagents.get(at(*j))?)
                    }
                    _ => return None,
                }
            }
            [Field("rois"), Index(i), rest @ ..] => {
                let roi = root.rois.get(at(*i))?;
                match rest {
                    [] => EntityView::Roi(roi),
                    [Field("union"), Index(j)] => EntityView::Shape(roi.union.get(at(*j))?),
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(view)
    }

    /// The identity tag of the viewed record.
    pub fn tag(self) -> Tag {
        match self {
            EntityView::Project(_) => Tag::Project,
            EntityView::Dataset(_) => Tag::Dataset,
            EntityView::Folder(_) => Tag::Folder,
            EntityView::Experimenter(_) => Tag::Experimenter,
            EntityView::ExperimenterGroup(_) => Tag::ExperimenterGroup,
            EntityView::Instrument(_) => Tag::Instrument,
            EntityView::LightSource(_) => Tag::LightSource,
            EntityView::Detector(_) => Tag::Detector,
            EntityView::Objective(_) => Tag::Objective,
            EntityView::Filter(_) => Tag::Filter,
            EntityView::Dichroic(_) => Tag::Dichroic,
            EntityView::FilterSet(_) => Tag::FilterSet,
            EntityView::Image(_) => Tag::Image,
            EntityView::Pixels(_) => Tag::Pixels,
            EntityView::Channel(_) => Tag::Channel,
            EntityView::Plate(_) => Tag::Plate,
            EntityView::Well(_) => Tag::Well,
            EntityView::WellSample(_) => Tag::WellSample,
            EntityView::Screen(_) => Tag::Screen,
            EntityView::Reagent(_) => Tag::Reagent,
            EntityView::Roi(_) => Tag::Roi,
            EntityView::Shape(_) => Tag::Shape,
            EntityView::Annotation(_) => Tag::Annotation,
        }
    }

    /// The identifier of the viewed record.
    pub fn id(self) -> &'a Id {
        match self {
            EntityView::Project(node) => &node.id,
            EntityView::Dataset(node) => &node.id,
            EntityView::Folder(node) => &node.id,
            EntityView::Experimenter(node) => &node.id,
            EntityView::ExperimenterGroup(node) => &node.id,
            EntityView::Instrument(node) => &node.id,
            EntityView::LightSource(node) => &node.attrs().id,
            EntityView::Detector(node) => &node.id,
            EntityView::Objective(node) => &node.id,
            EntityView::Filter(node) => &node.id,
            EntityView::Dichroic(node) => &node.id,
            EntityView::FilterSet(node) => &node.id,
            EntityView::Image(node) => &node.id,
            EntityView::Pixels(node) => &node.id,
            EntityView::Channel(node) => &node.id,
            EntityView::Plate(node) => &node.id,
            EntityView::Well(node) => &node.id,
            EntityView::WellSample(node) => &node.id,
            EntityView::Screen(node) => &node.id,
            EntityView::Reagent(node) => &node.id,
            EntityView::Roi(node) => &node.id,
            EntityView::Shape(node) => &node.attrs().id,
            EntityView::Annotation(node) => &node.attrs().id,
        }
    }

    /// Recover the concrete record type behind the view.
    pub fn downcast<T: Viewable>(self) -> Option<&'a T> {
        T::from_view(self)
    }
}

/// Record types recoverable from an [`EntityView`].
pub trait Viewable: Identified {
    fn from_view(view: EntityView<'_>) -> Option<&Self>;
}

macro_rules! viewable {
    ($($variant:ident => $ty:ty,)+) => {$(
        impl Viewable for $ty {
            fn from_view(view: EntityView<'_>) -> Option<&Self> {
                match view {
                    EntityView::$variant(node) => Some(node),
                    _ => None,
                }
            }
        }
    )+};
}

viewable! {
    Project => Project,
    Dataset => Dataset,
    Folder => Folder,
    Experimenter => Experimenter,
    ExperimenterGroup => ExperimenterGroup,
    Instrument => Instrument,
    LightSource => LightSourceValue,
    Detector => Detector,
    Objective => Objective,
    Filter => Filter,
    Dichroic => Dichroic,
    FilterSet => FilterSet,
    Image => Image,
    Pixels => Pixels,
    Channel => Channel,
    Plate => Plate,
    Well => Well,
    WellSample => WellSample,
    Screen => Screen,
    Reagent => Reagent,
    Roi => Roi,
    Shape => ShapeValue,
    Annotation => AnnotationValue,
}
