//! Multi-well plates for screening acquisitions.

use chrono::{DateTime, Utc};
use omx_ids::{Id, Tag};
use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{
    put_color, put_datetime, put_f64, put_id, put_records, put_ref, put_refs, put_string, put_u32,
    ToElement,
};
use crate::records::annotation::AnnotationValue;
use crate::records::image::Image;
use crate::records::screen::Reagent;
use crate::{BuildError, Color, Identified, Ref};

/// One acquisition site within a well.
#[derive(Clone, Debug, PartialEq)]
pub struct WellSample {
    pub id: Id,
    pub index: u32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub timepoint: Option<DateTime<Utc>>,
    pub image_ref: Option<Ref<Image>>,
}

impl Identified for WellSample {
    const TAG: Tag = Tag::WellSample;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for WellSample {
    const ELEMENT: &'static str = "WellSample";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let sample = WellSample {
            id: fields.take_id(cx, Tag::WellSample)?,
            index: fields.req_u32(cx, "index")?,
            position_x: fields.take_f64(cx, "position_x")?,
            position_y: fields.take_f64(cx, "position_y")?,
            timepoint: fields.take_datetime(cx, "timepoint")?,
            image_ref: fields.take_ref(cx, "image_ref")?,
        };
        fields.finish(cx);
        Ok(sample)
    }
}

impl ToElement for WellSample {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        el.fields.insert("index", self.index);
        put_f64(&mut el, "position_x", self.position_x);
        put_f64(&mut el, "position_y", self.position_y);
        put_datetime(&mut el, "timepoint", self.timepoint.as_ref());
        put_ref(&mut el, "image_ref", self.image_ref.as_ref());
        el
    }
}

/// One well of a plate, addressed by row and column.
#[derive(Clone, Debug, PartialEq)]
pub struct Well {
    pub id: Id,
    pub row: u32,
    pub column: u32,
    pub color: Option<Color>,
    pub well_samples: Vec<WellSample>,
    pub reagent_ref: Option<Ref<Reagent>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Well {
    const TAG: Tag = Tag::Well;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Well {
    const ELEMENT: &'static str = "Well";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let well = Well {
            id: fields.take_id(cx, Tag::Well)?,
            row: fields.req_u32(cx, "row")?,
            column: fields.req_u32(cx, "column")?,
            color: fields.take_color(cx, "color")?,
            well_samples: fields.take_records(cx, "well_samples")?,
            reagent_ref: fields.take_ref(cx, "reagent_ref")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(well)
    }
}

impl ToElement for Well {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        el.fields.insert("row", self.row);
        el.fields.insert("column", self.column);
        put_color(&mut el, "color", self.color);
        put_records(&mut el, "well_samples", &self.well_samples);
        put_ref(&mut el, "reagent_ref", self.reagent_ref.as_ref());
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// A plate of wells.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Plate {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rows: Option<u32>,
    pub columns: Option<u32>,
    pub wells: Vec<Well>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Plate {
    const TAG: Tag = Tag::Plate;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Plate {
    const ELEMENT: &'static str = "Plate";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let plate = Plate {
            id: fields.take_id(cx, Tag::Plate)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            rows: fields.take_u32(cx, "rows")?,
            columns: fields.take_u32(cx, "columns")?,
            wells: fields.take_records(cx, "wells")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(plate)
    }
}

impl ToElement for Plate {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_u32(&mut el, "rows", self.rows);
        put_u32(&mut el, "columns", self.columns);
        put_records(&mut el, "wells", &self.wells);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::DiagnosticSink;
    use omx_ids::IdRegistry;
    use omx_tree::Value;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wells_and_samples_nest() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Plate")
            .with_field("rows", 8)
            .with_field("columns", 12)
            .with_field(
                "wells",
                Value::List(vec![Element::new("Well")
                    .with_field("row", 0)
                    .with_field("column", 3)
                    .with_field(
                        "well_samples",
                        Value::List(vec![Element::new("WellSample")
                            .with_field("index", 0)
                            .with_field("image_ref", "Image:0")
                            .into()]),
                    )
                    .into()]),
            );

        let plate = Plate::from_element(el, &mut cx).unwrap();
        assert!(sink.is_empty());
        assert_eq!(plate.wells[0].row, 0);
        assert_eq!(plate.wells[0].well_samples[0].index, 0);
        assert_eq!(
            plate.wells[0].well_samples[0]
                .image_ref
                .as_ref()
                .unwrap()
                .target(),
            "Image:0"
        );
        assert_eq!(plate.id.as_str(), Some("Plate:0"));
        assert_eq!(plate.wells[0].id.as_str(), Some("Well:0"));
    }

    #[test]
    fn well_row_and_column_are_required() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Well").with_field("row", 2);
        let err = Well::from_element(el, &mut cx).unwrap_err();
        assert!(err.to_string().contains("column"));
    }
}
