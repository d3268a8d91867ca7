//! The document root.

use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_records, put_string, put_union, ToElement};
use crate::records::annotation::AnnotationValue;
use crate::records::image::Image;
use crate::records::instrument::Instrument;
use crate::records::plate::Plate;
use crate::records::project::{Dataset, Experimenter, ExperimenterGroup, Folder, Project};
use crate::records::roi::Roi;
use crate::records::screen::Screen;
use crate::{BuildError, UnionSeq};

/// The root record. It carries no identifier of its own; every entity
/// below it does.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Ome {
    pub projects: Vec<Project>,
    pub datasets: Vec<Dataset>,
    pub folders: Vec<Folder>,
    pub experimenters: Vec<Experimenter>,
    pub experimenter_groups: Vec<ExperimenterGroup>,
    pub instruments: Vec<Instrument>,
    pub images: Vec<Image>,
    pub structured_annotations: UnionSeq<AnnotationValue>,
    pub plates: Vec<Plate>,
    pub screens: Vec<Screen>,
    pub rois: Vec<Roi>,
    pub uuid: Option<String>,
    pub creator: Option<String>,
}

impl FromElement for Ome {
    const ELEMENT: &'static str = "OME";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let root = Ome {
            projects: fields.take_records(cx, "projects")?,
            datasets: fields.take_records(cx, "datasets")?,
            folders: fields.take_records(cx, "folders")?,
            experimenters: fields.take_records(cx, "experimenters")?,
            experimenter_groups: fields.take_records(cx, "experimenter_groups")?,
            instruments: fields.take_records(cx, "instruments")?,
            images: fields.take_records(cx, "images")?,
            structured_annotations: fields.take_union(cx, "structured_annotations")?,
            plates: fields.take_records(cx, "plates")?,
            screens: fields.take_records(cx, "screens")?,
            rois: fields.take_records(cx, "rois")?,
            uuid: fields.take_string(cx, "uuid")?,
            creator: fields.take_string(cx, "creator")?,
        };
        fields.finish(cx);
        Ok(root)
    }
}

impl ToElement for Ome {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_records(&mut el, "projects", &self.projects);
        put_records(&mut el, "datasets", &self.datasets);
        put_records(&mut el, "folders", &self.folders);
        put_records(&mut el, "experimenters", &self.experimenters);
        put_records(&mut el, "experimenter_groups", &self.experimenter_groups);
        put_records(&mut el, "instruments", &self.instruments);
        put_records(&mut el, "images", &self.images);
        put_union(&mut el, "structured_annotations", &self.structured_annotations);
        put_records(&mut el, "plates", &self.plates);
        put_records(&mut el, "screens", &self.screens);
        put_records(&mut el, "rois", &self.rois);
        put_string(&mut el, "uuid", self.uuid.as_deref());
        put_string(&mut el, "creator", self.creator.as_deref());
        el
    }
}
