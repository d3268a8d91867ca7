//! Structured annotations.

use chrono::{DateTime, Utc};
use omx_ids::{Id, Tag};
use omx_tree::Element;

use super::variant_family;
use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_id, put_refs, put_string, ToElement};
use crate::records::common::{BinaryFile, Map};
use crate::records::project::Experimenter;
use crate::{BuildError, Ref};

/// Attributes shared by every annotation variant.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AnnotationAttrs {
    pub id: Id,
    pub namespace: Option<String>,
    pub description: Option<String>,
    pub annotator: Option<Ref<Experimenter>>,
}

impl AnnotationAttrs {
    fn take(fields: &mut Fields, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        Ok(AnnotationAttrs {
            id: fields.take_id(cx, Tag::Annotation)?,
            namespace: fields.take_string(cx, "namespace")?,
            description: fields.take_string(cx, "description")?,
            annotator: fields.take_ref(cx, "annotator")?,
        })
    }

    fn put(&self, el: &mut Element) {
        put_id(el, &self.id);
        put_string(el, "namespace", self.namespace.as_deref());
        put_string(el, "description", self.description.as_deref());
        crate::encode::put_ref(el, "annotator", self.annotator.as_ref());
    }
}

/// An annotation holding a verbatim XML fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: String,
}

impl FromElement for XmlAnnotation {
    const ELEMENT: &'static str = "XMLAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = XmlAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_string(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for XmlAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.as_str());
        el
    }
}

/// An annotation attaching a file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileAnnotation {
    pub attrs: AnnotationAttrs,
    pub binary_file: BinaryFile,
}

impl FromElement for FileAnnotation {
    const ELEMENT: &'static str = "FileAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = FileAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            binary_file: fields.req_record(cx, "binary_file")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for FileAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("binary_file", self.binary_file.to_element());
        el
    }
}

/// An annotation grouping other annotations by reference.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ListAnnotation {
    pub attrs: AnnotationAttrs,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl FromElement for ListAnnotation {
    const ELEMENT: &'static str = "ListAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = ListAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for ListAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// An integer-valued annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct LongAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: i64,
}

impl FromElement for LongAnnotation {
    const ELEMENT: &'static str = "LongAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = LongAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_i64(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for LongAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value);
        el
    }
}

/// A float-valued annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: f64,
}

impl FromElement for DoubleAnnotation {
    const ELEMENT: &'static str = "DoubleAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = DoubleAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_f64(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for DoubleAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value);
        el
    }
}

/// A free-text annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: String,
}

impl FromElement for CommentAnnotation {
    const ELEMENT: &'static str = "CommentAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = CommentAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_string(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for CommentAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.as_str());
        el
    }
}

/// A true/false annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: bool,
}

impl FromElement for BooleanAnnotation {
    const ELEMENT: &'static str = "BooleanAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = BooleanAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_bool(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for BooleanAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value);
        el
    }
}

/// A time-point annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: DateTime<Utc>,
}

impl FromElement for TimestampAnnotation {
    const ELEMENT: &'static str = "TimestampAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = TimestampAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_datetime(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for TimestampAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.to_rfc3339());
        el
    }
}

/// A tag applied to an object.
#[derive(Clone, Debug, PartialEq)]
pub struct TagAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: String,
}

impl FromElement for TagAnnotation {
    const ELEMENT: &'static str = "TagAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = TagAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_string(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for TagAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.as_str());
        el
    }
}

/// A reference to a term in an external ontology.
#[derive(Clone, Debug, PartialEq)]
pub struct TermAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: String,
}

impl FromElement for TermAnnotation {
    const ELEMENT: &'static str = "TermAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = TermAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_string(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for TermAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.as_str());
        el
    }
}

/// A key/value-map annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct MapAnnotation {
    pub attrs: AnnotationAttrs,
    pub value: Map,
}

impl FromElement for MapAnnotation {
    const ELEMENT: &'static str = "MapAnnotation";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let annotation = MapAnnotation {
            attrs: AnnotationAttrs::take(&mut fields, cx)?,
            value: fields.req_record(cx, "value")?,
        };
        fields.finish(cx);
        Ok(annotation)
    }
}

impl ToElement for MapAnnotation {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el.fields.insert("value", self.value.to_element());
        el
    }
}

variant_family! {
    /// One structured annotation.
    ///
    /// Row order is the trial order for untyped mappings, and it shadows:
    /// a mapping whose `value` is text always decodes as an XML annotation,
    /// and a list annotation accepts any remaining mapping since none of
    /// its fields are required. The later variants are reachable from
    /// mappings only through a `kind` hint.
    AnnotationValue(AnnotationAttrs), Tag::Annotation, "annotation" {
        XmlAnnotation => "XMLAnnotation" / "xml",
        FileAnnotation => "FileAnnotation" / "file",
        ListAnnotation => "ListAnnotation" / "list",
        LongAnnotation => "LongAnnotation" / "long",
        DoubleAnnotation => "DoubleAnnotation" / "double",
        CommentAnnotation => "CommentAnnotation" / "comment",
        BooleanAnnotation => "BooleanAnnotation" / "boolean",
        TimestampAnnotation => "TimestampAnnotation" / "timestamp",
        TagAnnotation => "TagAnnotation" / "tag",
        TermAnnotation => "TermAnnotation" / "term",
        MapAnnotation => "MapAnnotation" / "map",
    }
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::DiagnosticSink;
    use omx_ids::IdRegistry;
    use omx_tree::Value;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::UnionSeq;

    fn append_one(el: Element) -> (UnionSeq<AnnotationValue>, DiagnosticSink) {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let mut seq = UnionSeq::new();
        seq.append_element(el, &mut cx).unwrap();
        (seq, sink)
    }

    #[test]
    fn text_value_mapping_trials_to_xml_annotation() {
        let el = Element::new("Annotation").with_field("value", "<custom/>");
        let (seq, _) = append_one(el);
        assert!(matches!(seq.get(0), Some(AnnotationValue::XmlAnnotation(_))));
    }

    #[test]
    fn binary_file_mapping_trials_to_file_annotation() {
        let el = Element::new("Annotation").with_field(
            "binary_file",
            Element::new("BinaryFile").with_field("file_name", "plot.csv"),
        );
        let (seq, _) = append_one(el);
        assert!(matches!(seq.get(0), Some(AnnotationValue::FileAnnotation(_))));
    }

    #[test]
    fn integer_value_mapping_falls_through_to_list_annotation() {
        // The list variant has no required fields, so it soaks up any
        // mapping the first two trials reject. The integer-valued variant
        // is only reachable through its name or a kind hint.
        let el = Element::new("Annotation").with_field("value", 5);
        let (seq, sink) = append_one(el);
        assert!(matches!(seq.get(0), Some(AnnotationValue::ListAnnotation(_))));
        assert_eq!(sink.len(), 1);
        assert!(sink.iter().next().unwrap().message.contains("`value`"));
    }

    #[test]
    fn kind_hint_reaches_the_shadowed_variant() {
        let el = Element::new("Annotation")
            .with_field("kind", "long")
            .with_field("value", 5);
        let (seq, sink) = append_one(el);
        match seq.get(0) {
            Some(AnnotationValue::LongAnnotation(a)) => assert_eq!(a.value, 5),
            other => panic!("expected a long annotation, got {other:?}"),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn named_variants_decode_directly() {
        let el = Element::new("TimestampAnnotation")
            .with_field("value", "2021-01-01T00:00:00Z")
            .with_field("namespace", "acme.org/time");
        let (seq, sink) = append_one(el);
        assert!(sink.is_empty());
        match seq.get(0) {
            Some(AnnotationValue::TimestampAnnotation(a)) => {
                assert_eq!(a.attrs.namespace.as_deref(), Some("acme.org/time"));
                assert_eq!(a.value.to_rfc3339(), "2021-01-01T00:00:00+00:00");
            }
            other => panic!("expected a timestamp annotation, got {other:?}"),
        }
    }

    #[test]
    fn map_annotation_round_trips() {
        let el = Element::new("MapAnnotation").with_field(
            "value",
            Element::new("Map").with_field(
                "ms",
                Value::List(vec![
                    Element::new("M").with_field("k", "stain").with_field("value", "DAPI").into(),
                    Element::new("M").with_field("k", "dilution").with_field("value", "1:500").into(),
                ]),
            ),
        );

        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let mut seq: UnionSeq<AnnotationValue> = UnionSeq::new();
        seq.append_element(el, &mut cx).unwrap();

        let Some(AnnotationValue::MapAnnotation(annotation)) = seq.get(0) else {
            panic!("expected a map annotation");
        };
        assert_eq!(annotation.value.ms.len(), 2);
        let encoded = crate::VariantFamily::to_element(seq.get(0).unwrap());
        assert_eq!(encoded.name, "MapAnnotation");
        assert!(encoded.has_field("value"));
    }
}
