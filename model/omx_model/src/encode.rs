//! Element encoding.
//!
//! Encoding is a pure read of current field values. Absent optionals and
//! empty sequences are elided, auto identifiers are omitted for assignment
//! on the next decode, and reference fields write the target identifier
//! string, never a nested copy of the target object.

use chrono::{DateTime, Utc};
use omx_ids::Id;
use omx_tree::Element;

use crate::primitives::SchemaToken;
use crate::{Color, Identified, Ref, UnionSeq, VariantFamily};

/// A record type encodable as one element event.
pub trait ToElement {
    fn to_element(&self) -> Element;
}

pub(crate) fn put_id(el: &mut Element, id: &Id) {
    if let Id::Assigned(lsid) = id {
        el.fields.insert("id", lsid.as_str());
    }
}

pub(crate) fn put_string(el: &mut Element, name: &str, value: Option<&str>) {
    if let Some(v) = value {
        el.fields.insert(name, v);
    }
}

pub(crate) fn put_bool(el: &mut Element, name: &str, value: Option<bool>) {
    if let Some(v) = value {
        el.fields.insert(name, v);
    }
}

pub(crate) fn put_u32(el: &mut Element, name: &str, value: Option<u32>) {
    if let Some(v) = value {
        el.fields.insert(name, v);
    }
}

pub(crate) fn put_u64(el: &mut Element, name: &str, value: Option<u64>) {
    if let Some(v) = value {
        // Tree integers are i64; values past i64::MAX saturate.
        let wide = i64::try_from(v).unwrap_or(i64::MAX);
        el.fields.insert(name, wide);
    }
}

pub(crate) fn put_f64(el: &mut Element, name: &str, value: Option<f64>) {
    if let Some(v) = value {
        el.fields.insert(name, v);
    }
}

pub(crate) fn put_datetime(el: &mut Element, name: &str, value: Option<&DateTime<Utc>>) {
    if let Some(v) = value {
        el.fields.insert(name, v.to_rfc3339());
    }
}

pub(crate) fn put_enum<T: SchemaToken>(el: &mut Element, name: &str, value: Option<T>) {
    if let Some(v) = value {
        el.fields.insert(name, v.as_token());
    }
}

pub(crate) fn put_color(el: &mut Element, name: &str, value: Option<Color>) {
    if let Some(v) = value {
        el.fields.insert(name, v.0);
    }
}

pub(crate) fn put_ref<T: Identified>(el: &mut Element, name: &str, value: Option<&Ref<T>>) {
    if let Some(r) = value {
        el.fields.insert(name, r.target());
    }
}

pub(crate) fn put_refs<T: Identified>(el: &mut Element, name: &str, refs: &[Ref<T>]) {
    for r in refs {
        el.fields.push_repeated(name, r.target());
    }
}

pub(crate) fn put_record<T: ToElement>(el: &mut Element, name: &str, value: Option<&T>) {
    if let Some(v) = value {
        el.fields.insert(name, v.to_element());
    }
}

pub(crate) fn put_records<T: ToElement>(el: &mut Element, name: &str, items: &[T]) {
    for item in items {
        el.fields.push_repeated(name, item.to_element());
    }
}

pub(crate) fn put_union<F: VariantFamily>(el: &mut Element, name: &str, seq: &UnionSeq<F>) {
    for item in seq {
        el.fields.push_repeated(name, item.to_element());
    }
}

#[cfg(test)]
mod tests {
    use omx_tree::Value;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn u64_values_saturate_at_the_tree_integer_ceiling() {
        let mut el = Element::new("BinData");
        put_u64(&mut el, "length", Some(u64::MAX));
        assert_eq!(el.field("length"), Some(&Value::Int(i64::MAX)));

        put_u64(&mut el, "absent", None);
        assert!(!el.has_field("absent"));
    }
}
