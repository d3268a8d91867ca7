//! Regions of interest and their shapes.

use omx_ids::{Id, Tag};
use omx_tree::Element;

use super::variant_family;
use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{
    put_bool, put_color, put_enum, put_f64, put_id, put_record, put_refs, put_string, put_u32,
    put_union, ToElement,
};
use crate::records::annotation::AnnotationValue;
use crate::records::common::{AffineTransform, BinData};
use crate::{BuildError, Color, Identified, Marker, Ref, UnionSeq};

/// Attributes shared by every shape variant.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ShapeAttrs {
    pub id: Id,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<f64>,
    pub text: Option<String>,
    pub the_z: Option<u32>,
    pub the_c: Option<u32>,
    pub the_t: Option<u32>,
    pub transform: Option<AffineTransform>,
    pub locked: Option<bool>,
}

impl ShapeAttrs {
    fn take(fields: &mut Fields, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        Ok(ShapeAttrs {
            id: fields.take_id(cx, Tag::Shape)?,
            fill_color: fields.take_color(cx, "fill_color")?,
            stroke_color: fields.take_color(cx, "stroke_color")?,
            stroke_width: fields.take_f64(cx, "stroke_width")?,
            text: fields.take_string(cx, "text")?,
            the_z: fields.take_u32(cx, "the_z")?,
            the_c: fields.take_u32(cx, "the_c")?,
            the_t: fields.take_u32(cx, "the_t")?,
            transform: fields.take_record(cx, "transform")?,
            locked: fields.take_bool(cx, "locked")?,
        })
    }

    fn put(&self, el: &mut Element) {
        put_id(el, &self.id);
        put_color(el, "fill_color", self.fill_color);
        put_color(el, "stroke_color", self.stroke_color);
        put_f64(el, "stroke_width", self.stroke_width);
        put_string(el, "text", self.text.as_deref());
        put_u32(el, "the_z", self.the_z);
        put_u32(el, "the_c", self.the_c);
        put_u32(el, "the_t", self.the_t);
        put_record(el, "transform", self.transform.as_ref());
        put_bool(el, "locked", self.locked);
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    pub attrs: ShapeAttrs,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FromElement for Rectangle {
    const ELEMENT: &'static str = "Rectangle";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let rectangle = Rectangle {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x: fields.req_f64(cx, "x")?,
            y: fields.req_f64(cx, "y")?,
            width: fields.req_f64(cx, "width")?,
            height: fields.req_f64(cx, "height")?,
        };
        fields.finish(cx);
        Ok(rectangle)
    }
}

impl ToElement for Rectangle {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x", self.x);
        el.fields.insert("y", self.y);
        el.fields.insert("width", self.width);
        el.fields.insert("height", self.height);
        el
    }
}

/// A rectangular region with an attached bitmask.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    pub attrs: ShapeAttrs,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub bin_data: Option<BinData>,
}

impl FromElement for Mask {
    const ELEMENT: &'static str = "Mask";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let mask = Mask {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x: fields.req_f64(cx, "x")?,
            y: fields.req_f64(cx, "y")?,
            width: fields.req_f64(cx, "width")?,
            height: fields.req_f64(cx, "height")?,
            bin_data: fields.take_record(cx, "bin_data")?,
        };
        fields.finish(cx);
        Ok(mask)
    }
}

impl ToElement for Mask {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x", self.x);
        el.fields.insert("y", self.y);
        el.fields.insert("width", self.width);
        el.fields.insert("height", self.height);
        put_record(&mut el, "bin_data", self.bin_data.as_ref());
        el
    }
}

/// A single point.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub attrs: ShapeAttrs,
    pub x: f64,
    pub y: f64,
}

impl FromElement for Point {
    const ELEMENT: &'static str = "Point";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let point = Point {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x: fields.req_f64(cx, "x")?,
            y: fields.req_f64(cx, "y")?,
        };
        fields.finish(cx);
        Ok(point)
    }
}

impl ToElement for Point {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x", self.x);
        el.fields.insert("y", self.y);
        el
    }
}

/// An axis-aligned ellipse given by center and radii.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub attrs: ShapeAttrs,
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl FromElement for Ellipse {
    const ELEMENT: &'static str = "Ellipse";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let ellipse = Ellipse {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x: fields.req_f64(cx, "x")?,
            y: fields.req_f64(cx, "y")?,
            radius_x: fields.req_f64(cx, "radius_x")?,
            radius_y: fields.req_f64(cx, "radius_y")?,
        };
        fields.finish(cx);
        Ok(ellipse)
    }
}

impl ToElement for Ellipse {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x", self.x);
        el.fields.insert("y", self.y);
        el.fields.insert("radius_x", self.radius_x);
        el.fields.insert("radius_y", self.radius_y);
        el
    }
}

/// A line segment, optionally with end markers.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub attrs: ShapeAttrs,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub marker_start: Option<Marker>,
    pub marker_end: Option<Marker>,
}

impl FromElement for Line {
    const ELEMENT: &'static str = "Line";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let line = Line {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x1: fields.req_f64(cx, "x1")?,
            y1: fields.req_f64(cx, "y1")?,
            x2: fields.req_f64(cx, "x2")?,
            y2: fields.req_f64(cx, "y2")?,
            marker_start: fields.take_enum(cx, "marker_start")?,
            marker_end: fields.take_enum(cx, "marker_end")?,
        };
        fields.finish(cx);
        Ok(line)
    }
}

impl ToElement for Line {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x1", self.x1);
        el.fields.insert("y1", self.y1);
        el.fields.insert("x2", self.x2);
        el.fields.insert("y2", self.y2);
        put_enum(&mut el, "marker_start", self.marker_start);
        put_enum(&mut el, "marker_end", self.marker_end);
        el
    }
}

/// An open run of connected segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub attrs: ShapeAttrs,
    pub points: String,
    pub marker_start: Option<Marker>,
    pub marker_end: Option<Marker>,
}

impl FromElement for Polyline {
    const ELEMENT: &'static str = "Polyline";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let polyline = Polyline {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            points: fields.req_string(cx, "points")?,
            marker_start: fields.take_enum(cx, "marker_start")?,
            marker_end: fields.take_enum(cx, "marker_end")?,
        };
        fields.finish(cx);
        Ok(polyline)
    }
}

impl ToElement for Polyline {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("points", self.points.as_str());
        put_enum(&mut el, "marker_start", self.marker_start);
        put_enum(&mut el, "marker_end", self.marker_end);
        el
    }
}

/// A closed run of connected segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub attrs: ShapeAttrs,
    pub points: String,
}

impl FromElement for Polygon {
    const ELEMENT: &'static str = "Polygon";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let polygon = Polygon {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            points: fields.req_string(cx, "points")?,
        };
        fields.finish(cx);
        Ok(polygon)
    }
}

impl ToElement for Polygon {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("points", self.points.as_str());
        el
    }
}

/// A text anchor; the text itself lives in the shared `text` attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub attrs: ShapeAttrs,
    pub x: f64,
    pub y: f64,
}

impl FromElement for Label {
    const ELEMENT: &'static str = "Label";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let label = Label {
            attrs: ShapeAttrs::take(&mut fields, cx)?,
            x: fields.req_f64(cx, "x")?,
            y: fields.req_f64(cx, "y")?,
        };
        fields.finish(cx);
        Ok(label)
    }
}

impl ToElement for Label {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("x", self.x);
        el.fields.insert("y", self.y);
        el
    }
}

variant_family! {
    /// One shape of a region of interest.
    ///
    /// Row order is the trial order for untyped mappings. `Point` precedes
    /// `Label` deliberately: both require only `x` and `y`, so a bare
    /// point-like mapping decodes as a point unless a `kind` hint says
    /// otherwise.
    ShapeValue(ShapeAttrs), Tag::Shape, "shape" {
        Rectangle => "Rectangle" / "rectangle",
        Mask => "Mask" / "mask",
        Point => "Point" / "point",
        Ellipse => "Ellipse" / "ellipse",
        Line => "Line" / "line",
        Polyline => "Polyline" / "polyline",
        Polygon => "Polygon" / "polygon",
        Label => "Label" / "label",
    }
}

/// A region of interest: an ordered union of shapes.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Roi {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub union: UnionSeq<ShapeValue>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Roi {
    const TAG: Tag = Tag::Roi;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Roi {
    const ELEMENT: &'static str = "ROI";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let roi = Roi {
            id: fields.take_id(cx, Tag::Roi)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            union: fields.take_union(cx, "union")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(roi)
    }
}

impl ToElement for Roi {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_union(&mut el, "union", &self.union);
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
    use crate::{BuildError, VariantFamily};

    fn decode_roi(el: Element) -> (Roi, DiagnosticSink) {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let roi = Roi::from_element(el, &mut cx).unwrap();
        (roi, sink)
    }

    fn decode_roi_err(el: Element) -> BuildError {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        Roi::from_element(el, &mut cx).unwrap_err()
    }

    fn roi_with_union(items: Vec<Value>) -> Element {
        Element::new("ROI").with_field("union", Value::List(items))
    }

    #[test]
    fn shapes_keep_insertion_order_across_variants() {
        let el = roi_with_union(vec![
            Element::new("Rectangle")
                .with_field("x", 0.0)
                .with_field("y", 0.0)
                .with_field("width", 10.0)
                .with_field("height", 5.0)
                .into(),
            Element::new("Point").with_field("x", 1.0).with_field("y", 2.0).into(),
            Element::new("Rectangle")
                .with_field("x", 3.0)
                .with_field("y", 3.0)
                .with_field("width", 1.0)
                .with_field("height", 1.0)
                .into(),
        ]);
        let (roi, sink) = decode_roi(el);

        assert!(sink.is_empty());
        let kinds: Vec<_> = roi.union.iter().map(VariantFamily::kind).collect();
        assert_eq!(kinds, ["rectangle", "point", "rectangle"]);
    }

    #[test]
    fn shape_identifiers_share_one_counter() {
        let el = roi_with_union(vec![
            Element::new("Rectangle")
                .with_field("x", 0.0)
                .with_field("y", 0.0)
                .with_field("width", 1.0)
                .with_field("height", 1.0)
                .into(),
            Element::new("Point").with_field("x", 0.0).with_field("y", 0.0).into(),
            Element::new("Ellipse")
                .with_field("x", 0.0)
                .with_field("y", 0.0)
                .with_field("radius_x", 2.0)
                .with_field("radius_y", 2.0)
                .into(),
        ]);
        let (roi, _) = decode_roi(el);

        let ids: Vec<_> = roi
            .union
            .iter()
            .map(|shape| shape.attrs().id.as_str().unwrap_or("").to_owned())
            .collect();
        assert_eq!(ids, ["Shape:0", "Shape:1", "Shape:2"]);
    }

    #[test]
    fn untyped_point_like_mapping_becomes_a_point() {
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("x", 0.0)
            .with_field("y", 0.0)
            .into()]);
        let (roi, _) = decode_roi(el);
        assert!(matches!(roi.union.get(0), Some(ShapeValue::Point(_))));
    }

    #[test]
    fn kind_hint_overrides_trial_order() {
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("kind", "label")
            .with_field("x", 0.0)
            .with_field("y", 0.0)
            .into()]);
        let (roi, _) = decode_roi(el);
        assert!(matches!(roi.union.get(0), Some(ShapeValue::Label(_))));
    }

    #[test]
    fn kind_hint_is_case_insensitive() {
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("kind", "Label")
            .with_field("x", 0.0)
            .with_field("y", 0.0)
            .into()]);
        let (roi, _) = decode_roi(el);
        assert!(matches!(roi.union.get(0), Some(ShapeValue::Label(_))));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("kind", "blob")
            .with_field("x", 0.0)
            .into()]);
        let err = decode_roi_err(el);
        assert!(matches!(err, BuildError::UnknownVariant { ref kind, .. } if kind == "blob"));
    }

    #[test]
    fn unknown_variant_name_is_rejected() {
        let el = roi_with_union(vec![Element::new("Sphere").with_field("x", 0.0).into()]);
        let err = decode_roi_err(el);
        assert!(matches!(err, BuildError::InvalidVariant { ref found, .. } if found == "Sphere"));
    }

    #[test]
    fn mapping_matching_no_variant_is_rejected() {
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("stroke_width", 2.0)
            .into()]);
        let err = decode_roi_err(el);
        assert!(matches!(err, BuildError::NoMatchingVariant { .. }));
    }

    #[test]
    fn failed_trials_leave_no_identifier_or_diagnostic_trace() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        // Travels through failed rectangle and mask trials before point
        // accepts it; the invalid id must be cast exactly once.
        let el = roi_with_union(vec![Element::new("Shape")
            .with_field("id", "bogus")
            .with_field("x", 0.0)
            .with_field("y", 0.0)
            .into()]);

        let roi = Roi::from_element(el, &mut cx).unwrap();
        assert!(matches!(roi.union.get(0), Some(ShapeValue::Point(_))));
        assert_eq!(roi.union.get(0).unwrap().attrs().id.as_str(), Some("Shape:0"));
        let casts: Vec<_> = sink
            .iter()
            .filter(|d| d.message.contains("Casting invalid ShapeID"))
            .collect();
        assert_eq!(casts.len(), 1);
    }

    #[test]
    fn removal_keeps_the_remaining_order() {
        let el = roi_with_union(vec![
            Element::new("Point").with_field("x", 0.0).with_field("y", 0.0).into(),
            Element::new("Label").with_field("x", 1.0).with_field("y", 1.0).into(),
            Element::new("Point").with_field("x", 2.0).with_field("y", 2.0).into(),
        ]);
        let (mut roi, _) = decode_roi(el);

        let removed = roi.union.remove(1);
        assert!(matches!(removed, Some(ShapeValue::Label(_))));
        assert_eq!(roi.union.len(), 2);
        assert!(roi.union.remove(5).is_none());
        let kinds: Vec<_> = roi.union.iter().map(VariantFamily::kind).collect();
        assert_eq!(kinds, ["point", "point"]);
    }

    #[test]
    fn collections_compare_by_ordered_contents() {
        let make = || {
            decode_roi(roi_with_union(vec![
                Element::new("Point").with_field("x", 0.0).with_field("y", 0.0).into(),
                Element::new("Label").with_field("x", 1.0).with_field("y", 1.0).into(),
            ]))
            .0
        };
        let a = make();
        let b = make();
        assert_eq!(a.union, b.union);

        let reversed = decode_roi(roi_with_union(vec![
            Element::new("Label").with_field("x", 1.0).with_field("y", 1.0).into(),
            Element::new("Point").with_field("x", 0.0).with_field("y", 0.0).into(),
        ]))
        .0;
        assert_ne!(a.union, reversed.union);
    }
}
