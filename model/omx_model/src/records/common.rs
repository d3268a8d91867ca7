//! Shared leaf records with no identity of their own.

use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_bool, put_record, put_records, put_string, put_u64, ToElement};
use crate::BuildError;

/// One key/value entry of a [`Map`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MapPair {
    pub k: Option<String>,
    pub value: Option<String>,
}

impl FromElement for MapPair {
    const ELEMENT: &'static str = "M";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let pair = MapPair {
            k: fields.take_string(cx, "k")?,
            value: fields.take_string(cx, "value")?,
        };
        fields.finish(cx);
        Ok(pair)
    }
}

impl ToElement for MapPair {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_string(&mut el, "k", self.k.as_deref());
        put_string(&mut el, "value", self.value.as_deref());
        el
    }
}

/// An ordered list of key/value pairs. Keys are not required to be unique.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Map {
    pub ms: Vec<MapPair>,
}

impl FromElement for Map {
    const ELEMENT: &'static str = "Map";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let map = Map {
            ms: fields.take_records(cx, "ms")?,
        };
        fields.finish(cx);
        Ok(map)
    }
}

impl ToElement for Map {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_records(&mut el, "ms", &self.ms);
        el
    }
}

/// A 2D affine transform applied to a shape, row-major.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransform {
    pub a00: f64,
    pub a10: f64,
    pub a01: f64,
    pub a11: f64,
    pub a02: f64,
    pub a12: f64,
}

impl FromElement for AffineTransform {
    const ELEMENT: &'static str = "AffineTransform";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let transform = AffineTransform {
            a00: fields.req_f64(cx, "a00")?,
            a10: fields.req_f64(cx, "a10")?,
            a01: fields.req_f64(cx, "a01")?,
            a11: fields.req_f64(cx, "a11")?,
            a02: fields.req_f64(cx, "a02")?,
            a12: fields.req_f64(cx, "a12")?,
        };
        fields.finish(cx);
        Ok(transform)
    }
}

impl ToElement for AffineTransform {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        el.fields.insert("a00", self.a00);
        el.fields.insert("a10", self.a10);
        el.fields.insert("a01", self.a01);
        el.fields.insert("a11", self.a11);
        el.fields.insert("a02", self.a02);
        el.fields.insert("a12", self.a12);
        el
    }
}

/// Descriptor of an inline binary block. The payload itself travels with
/// the excluded reader/writer collaborator, not through the model.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BinData {
    pub big_endian: Option<bool>,
    pub length: Option<u64>,
}

impl FromElement for BinData {
    const ELEMENT: &'static str = "BinData";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let bin = BinData {
            big_endian: fields.take_bool(cx, "big_endian")?,
            length: fields.take_u64(cx, "length")?,
        };
        fields.finish(cx);
        Ok(bin)
    }
}

impl ToElement for BinData {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_bool(&mut el, "big_endian", self.big_endian);
        put_u64(&mut el, "length", self.length);
        el
    }
}

/// A file attached to an annotation, either inline or by location.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BinaryFile {
    pub file_name: Option<String>,
    pub size: Option<u64>,
    pub external: Option<External>,
}

impl FromElement for BinaryFile {
    const ELEMENT: &'static str = "BinaryFile";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let file = BinaryFile {
            file_name: fields.take_string(cx, "file_name")?,
            size: fields.take_u64(cx, "size")?,
            external: fields.take_record(cx, "external")?,
        };
        fields.finish(cx);
        Ok(file)
    }
}

impl ToElement for BinaryFile {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_string(&mut el, "file_name", self.file_name.as_deref());
        put_u64(&mut el, "size", self.size);
        put_record(&mut el, "external", self.external.as_ref());
        el
    }
}

/// Location and checksum of an out-of-document binary.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct External {
    pub href: Option<String>,
    pub sha1: Option<String>,
}

impl FromElement for External {
    const ELEMENT: &'static str = "External";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let external = External {
            href: fields.take_string(cx, "href")?,
            sha1: fields.take_string(cx, "sha1")?,
        };
        fields.finish(cx);
        Ok(external)
    }
}

impl ToElement for External {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_string(&mut el, "href", self.href.as_deref());
        put_string(&mut el, "sha1", self.sha1.as_deref());
        el
    }
}
