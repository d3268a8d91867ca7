//! Organizational records: projects, datasets, folders, and people.

use omx_ids::{Id, Tag};
use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_id, put_ref, put_refs, put_string, ToElement};
use crate::records::annotation::AnnotationValue;
use crate::records::image::Image;
use crate::records::roi::Roi;
use crate::{BuildError, Identified, Ref};

/// A grouping of datasets under one line of investigation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Project {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub experimenter_ref: Option<Ref<Experimenter>>,
    pub experimenter_group_ref: Option<Ref<ExperimenterGroup>>,
    pub dataset_refs: Vec<Ref<Dataset>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Project {
    const TAG: Tag = Tag::Project;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Project {
    const ELEMENT: &'static str = "Project";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let project = Project {
            id: fields.take_id(cx, Tag::Project)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            experimenter_ref: fields.take_ref(cx, "experimenter_ref")?,
            experimenter_group_ref: fields.take_ref(cx, "experimenter_group_ref")?,
            dataset_refs: fields.take_refs(cx, "dataset_refs")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(project)
    }
}

impl ToElement for Project {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_ref(&mut el, "experimenter_ref", self.experimenter_ref.as_ref());
        put_ref(
            &mut el,
            "experimenter_group_ref",
            self.experimenter_group_ref.as_ref(),
        );
        put_refs(&mut el, "dataset_refs", &self.dataset_refs);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// A set of images acquired or analysed together.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dataset {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub experimenter_ref: Option<Ref<Experimenter>>,
    pub experimenter_group_ref: Option<Ref<ExperimenterGroup>>,
    pub image_refs: Vec<Ref<Image>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Dataset {
    const TAG: Tag = Tag::Dataset;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Dataset {
    const ELEMENT: &'static str = "Dataset";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let dataset = Dataset {
            id: fields.take_id(cx, Tag::Dataset)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            experimenter_ref: fields.take_ref(cx, "experimenter_ref")?,
            experimenter_group_ref: fields.take_ref(cx, "experimenter_group_ref")?,
            image_refs: fields.take_refs(cx, "image_refs")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(dataset)
    }
}

impl ToElement for Dataset {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_ref(&mut el, "experimenter_ref", self.experimenter_ref.as_ref());
        put_ref(
            &mut el,
            "experimenter_group_ref",
            self.experimenter_group_ref.as_ref(),
        );
        put_refs(&mut el, "image_refs", &self.image_refs);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// An organizational folder; folders may nest through references.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Folder {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub folder_refs: Vec<Ref<Folder>>,
    pub image_refs: Vec<Ref<Image>>,
    pub roi_refs: Vec<Ref<Roi>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Folder {
    const TAG: Tag = Tag::Folder;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Folder {
    const ELEMENT: &'static str = "Folder";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let folder = Folder {
            id: fields.take_id(cx, Tag::Folder)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            folder_refs: fields.take_refs(cx, "folder_refs")?,
            image_refs: fields.take_refs(cx, "image_refs")?,
            roi_refs: fields.take_refs(cx, "roi_refs")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(folder)
    }
}

impl ToElement for Folder {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_refs(&mut el, "folder_refs", &self.folder_refs);
        put_refs(&mut el, "image_refs", &self.image_refs);
        put_refs(&mut el, "roi_refs", &self.roi_refs);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// A person who acquired or owns data.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Experimenter {
    pub id: Id,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub institution: Option<String>,
    pub user_name: Option<String>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Experimenter {
    const TAG: Tag = Tag::Experimenter;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Experimenter {
    const ELEMENT: &'static str = "Experimenter";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let experimenter = Experimenter {
            id: fields.take_id(cx, Tag::Experimenter)?,
            first_name: fields.take_string(cx, "first_name")?,
            last_name: fields.take_string(cx, "last_name")?,
            email: fields.take_string(cx, "email")?,
            institution: fields.take_string(cx, "institution")?,
            user_name: fields.take_string(cx, "user_name")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(experimenter)
    }
}

impl ToElement for Experimenter {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "first_name", self.first_name.as_deref());
        put_string(&mut el, "last_name", self.last_name.as_deref());
        put_string(&mut el, "email", self.email.as_deref());
        put_string(&mut el, "institution", self.institution.as_deref());
        put_string(&mut el, "user_name", self.user_name.as_deref());
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// A named group of experimenters with designated leaders.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ExperimenterGroup {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub experimenter_refs: Vec<Ref<Experimenter>>,
    pub leaders: Vec<Ref<Experimenter>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for ExperimenterGroup {
    const TAG: Tag = Tag::ExperimenterGroup;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for ExperimenterGroup {
    const ELEMENT: &'static str = "ExperimenterGroup";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let group = ExperimenterGroup {
            id: fields.take_id(cx, Tag::ExperimenterGroup)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            experimenter_refs: fields.take_refs(cx, "experimenter_refs")?,
            leaders: fields.take_refs(cx, "leaders")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(group)
    }
}

impl ToElement for ExperimenterGroup {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_refs(&mut el, "experimenter_refs", &self.experimenter_refs);
        put_refs(&mut el, "leaders", &self.leaders);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}
