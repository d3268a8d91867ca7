//! Screens and their reagents.

use omx_ids::{Id, Tag};
use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_id, put_records, put_refs, put_string, ToElement};
use crate::records::annotation::AnnotationValue;
use crate::records::plate::Plate;
use crate::{BuildError, Identified, Ref};

/// A chemical or physical parameter applied to wells.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Reagent {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub reagent_identifier: Option<String>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Reagent {
    const TAG: Tag = Tag::Reagent;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Reagent {
    const ELEMENT: &'static str = "Reagent";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let reagent = Reagent {
            id: fields.take_id(cx, Tag::Reagent)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            reagent_identifier: fields.take_string(cx, "reagent_identifier")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(reagent)
    }
}

impl ToElement for Reagent {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_string(&mut el, "reagent_identifier", self.reagent_identifier.as_deref());
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// A screening experiment across one or more plates.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Screen {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub protocol_identifier: Option<String>,
    pub protocol_description: Option<String>,
    pub reagent_set_identifier: Option<String>,
    pub reagents: Vec<Reagent>,
    pub plate_refs: Vec<Ref<Plate>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Screen {
    const TAG: Tag = Tag::Screen;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Screen {
    const ELEMENT: &'static str = "Screen";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let screen = Screen {
            id: fields.take_id(cx, Tag::Screen)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            protocol_identifier: fields.take_string(cx, "protocol_identifier")?,
            protocol_description: fields.take_string(cx, "protocol_description")?,
            reagent_set_identifier: fields.take_string(cx, "reagent_set_identifier")?,
            reagents: fields.take_records(cx, "reagents")?,
            plate_refs: fields.take_refs(cx, "plate_refs")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(screen)
    }
}

impl ToElement for Screen {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_string(&mut el, "protocol_identifier", self.protocol_identifier.as_deref());
        put_string(
            &mut el,
            "protocol_description",
            self.protocol_description.as_deref(),
        );
        put_string(
            &mut el,
            "reagent_set_identifier",
            self.reagent_set_identifier.as_deref(),
        );
        put_records(&mut el, "reagents", &self.reagents);
        put_refs(&mut el, "plate_refs", &self.plate_refs);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}
