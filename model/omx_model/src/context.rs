//! Decode context and field reading.
//!
//! Construction events decode through a [`BuildContext`] that carries the
//! session's identifier registry, the diagnostic sink, and the document
//! path of the record being decoded. A [`Fields`] reader wraps one event's
//! mapping and hands out typed field values, consulting the legacy-name
//! table on a miss and reporting whatever is left over when the record is
//! done.

use chrono::{DateTime, Utc};
use omx_diagnostic::{
    casting_invalid_id, deprecated_field, unknown_field, Diagnostic, DiagnosticSink,
};
use omx_ids::{CheckedRef, Id, IdRegistry, ProvidedId, Tag};
use omx_tree::{Element, Path, Value};

use crate::primitives::SchemaToken;
use crate::{compat, BuildError, Color, Identified, Ref, RefSlot, UnionSeq, VariantFamily};

/// How strictly a decode treats recoverable oddities.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DecodeMode {
    /// Normal decoding: recoverable conditions go to the sink.
    Strict,
    /// Variant trial: diagnostics are suppressed and identifier assignment
    /// is skipped, so a failed attempt leaves no trace in the session.
    Trial,
}

/// State threaded through one decode.
pub struct BuildContext<'a> {
    pub registry: &'a mut IdRegistry,
    pub sink: &'a mut DiagnosticSink,
    /// Path of the record currently decoding.
    pub path: Path,
    mode: DecodeMode,
}

impl<'a> BuildContext<'a> {
    pub fn new(registry: &'a mut IdRegistry, sink: &'a mut DiagnosticSink) -> Self {
        BuildContext {
            registry,
            sink,
            path: Path::root(),
            mode: DecodeMode::Strict,
        }
    }

    pub fn is_trial(&self) -> bool {
        self.mode == DecodeMode::Trial
    }

    /// Run `f` in trial mode, restoring the previous mode afterwards.
    pub fn trial<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = std::mem::replace(&mut self.mode, DecodeMode::Trial);
        let out = f(self);
        self.mode = prev;
        out
    }

    /// Report a recoverable diagnostic, unless a trial is running.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        if !self.is_trial() {
            self.sink.report(diagnostic);
        }
    }

    /// Run `f` with `name` pushed onto the path.
    pub fn in_field<R>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_field(name);
        let out = f(self);
        self.path.pop();
        out
    }

    /// Run `f` with index `i` pushed onto the path.
    pub fn in_index<R>(&mut self, i: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_index(i);
        let out = f(self);
        self.path.pop();
        out
    }

    /// Assign or validate an identity identifier through the registry.
    ///
    /// In trial mode nothing is assigned; the chosen variant is decoded
    /// again outside the trial, and only that run touches the registry.
    pub fn assign_id(&mut self, tag: Tag, provided: ProvidedId<'_>) -> Result<Id, BuildError> {
        if self.is_trial() {
            return Ok(Id::Auto);
        }
        match self.registry.assign(tag, provided) {
            Ok(assigned) => {
                if let Some(original) = &assigned.cast_from {
                    let diag = casting_invalid_id(
                        tag,
                        original,
                        Some(assigned.id.as_str()),
                        self.path.clone(),
                    );
                    self.sink.report(diag);
                }
                Ok(Id::Assigned(assigned.id))
            }
            Err(source) => Err(BuildError::DuplicateId {
                source,
                path: self.path.clone(),
            }),
        }
    }

    /// Check a reference-position identifier and build the slot for it.
    pub fn reference<T: Identified>(&mut self, raw: String) -> Ref<T> {
        match self.registry.check_ref(T::TAG, &raw) {
            CheckedRef::Valid => Ref::to(raw),
            CheckedRef::CastNumeric(target) => {
                let diag =
                    casting_invalid_id(T::TAG, &raw, Some(target.as_str()), self.path.clone());
                self.warn(diag);
                Ref::to(target.as_str())
            }
            CheckedRef::CastDeferred => {
                let diag = casting_invalid_id(T::TAG, &raw, None, self.path.clone());
                self.warn(diag);
                Ref::from_slot(RefSlot::deferred(raw))
            }
        }
    }
}

/// A record type constructible from one element event.
pub trait FromElement: Sized {
    /// Type name this record decodes from, e.g. `"Image"`.
    const ELEMENT: &'static str;

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError>;
}

/// Typed reader over one element's field mapping.
///
/// Fields are taken (removed) as they decode; [`Fields::finish`] reports
/// whatever remains as unknown.
pub struct Fields {
    record: &'static str,
    fields: omx_tree::FieldMap,
}

impl Fields {
    pub fn new(el: Element, record: &'static str) -> Self {
        Fields {
            record,
            fields: el.fields,
        }
    }

    /// Take a field by its current name, falling back to enumerated legacy
    /// aliases with a deprecation warning.
    pub fn take(&mut self, cx: &mut BuildContext<'_>, name: &'static str) -> Option<Value> {
        if let Some(value) = self.fields.take(name) {
            return Some(value);
        }
        for alias in compat::aliases_of(name) {
            if let Some(value) = self.fields.take(alias) {
                let diag = deprecated_field(self.record, alias, name).at(cx.path.clone());
                cx.warn(diag);
                return Some(value);
            }
        }
        None
    }

    /// Report remaining fields as unknown and drop them.
    pub fn finish(mut self, cx: &mut BuildContext<'_>) {
        for (name, _) in self.fields.drain() {
            let diag = unknown_field(self.record, &name, cx.path.clone());
            cx.warn(diag);
        }
    }

    fn structural(&self, cx: &BuildContext<'_>, detail: String) -> BuildError {
        BuildError::Structural {
            path: cx.path.clone(),
            detail,
        }
    }

    fn mismatch(
        &self,
        cx: &BuildContext<'_>,
        name: &str,
        expected: &str,
        found: &Value,
    ) -> BuildError {
        self.structural(
            cx,
            format!(
                "field `{name}` of {}: expected {expected}, found {}",
                self.record,
                found.kind_name()
            ),
        )
    }

    fn missing(&self, cx: &BuildContext<'_>, name: &str) -> BuildError {
        self.structural(cx, format!("{} requires field `{name}`", self.record))
    }

    // Identity

    /// Decode the record's own identifier, assigning one when absent.
    pub fn take_id(&mut self, cx: &mut BuildContext<'_>, tag: Tag) -> Result<Id, BuildError> {
        match self.take(cx, "id") {
            None => cx.assign_id(tag, ProvidedId::Auto),
            Some(Value::Str(text)) => cx.assign_id(tag, ProvidedId::Text(&text)),
            Some(Value::Int(n)) => cx.assign_id(tag, ProvidedId::Number(n)),
            Some(other) => Err(self.mismatch(cx, "id", "an identifier", &other)),
        }
    }

    /// Decode a required reference-position identifier (the `id` of a
    /// settings record, which targets another object).
    pub fn req_target<T: Identified>(
        &mut self,
        cx: &mut BuildContext<'_>,
    ) -> Result<Ref<T>, BuildError> {
        match self.take(cx, "id") {
            None => Err(self.missing(cx, "id")),
            Some(Value::Str(raw)) => Ok(cx.reference(raw)),
            Some(other) => Err(self.mismatch(cx, "id", "an identifier", &other)),
        }
    }

    // Scalars

    pub fn take_string(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<String>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(other) => Err(self.mismatch(cx, name, "text", &other)),
        }
    }

    pub fn req_string(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<String, BuildError> {
        self.take_string(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_bool(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<bool>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(self.mismatch(cx, name, "a boolean", &other)),
        }
    }

    pub fn req_bool(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<bool, BuildError> {
        self.take_bool(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_i64(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<i64>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Int(n)) => Ok(Some(n)),
            Some(other) => Err(self.mismatch(cx, name, "an integer", &other)),
        }
    }

    pub fn req_i64(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<i64, BuildError> {
        self.take_i64(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_u32(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<u32>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Int(n)) => match u32::try_from(n) {
                Ok(v) => Ok(Some(v)),
                Err(_) => Err(self.structural(
                    cx,
                    format!(
                        "field `{name}` of {}: {n} is out of range for a count",
                        self.record
                    ),
                )),
            },
            Some(other) => Err(self.mismatch(cx, name, "a non-negative integer", &other)),
        }
    }

    pub fn req_u32(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<u32, BuildError> {
        self.take_u32(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_u64(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<u64>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Int(n)) => match u64::try_from(n) {
                Ok(v) => Ok(Some(v)),
                Err(_) => Err(self.structural(
                    cx,
                    format!(
                        "field `{name}` of {}: {n} is out of range for a size",
                        self.record
                    ),
                )),
            },
            Some(other) => Err(self.mismatch(cx, name, "a non-negative integer", &other)),
        }
    }

    pub fn take_f64(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<f64>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(value) => match value.as_float() {
                Some(x) => Ok(Some(x)),
                None => Err(self.mismatch(cx, name, "a number", &value)),
            },
        }
    }

    pub fn req_f64(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<f64, BuildError> {
        self.take_f64(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_datetime(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<DateTime<Utc>>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Str(text)) => match DateTime::parse_from_rfc3339(&text) {
                Ok(stamp) => Ok(Some(stamp.with_timezone(&Utc))),
                Err(e) => Err(self.structural(
                    cx,
                    format!(
                        "field `{name}` of {}: `{text}` is not a timestamp ({e})",
                        self.record
                    ),
                )),
            },
            Some(other) => Err(self.mismatch(cx, name, "a timestamp", &other)),
        }
    }

    pub fn req_datetime(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<DateTime<Utc>, BuildError> {
        self.take_datetime(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_enum<T: SchemaToken>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<T>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Str(token)) => match T::from_token(&token) {
                Some(v) => Ok(Some(v)),
                None => Err(self.structural(
                    cx,
                    format!(
                        "field `{name}` of {}: `{token}` is not a {} token",
                        self.record,
                        T::NAME
                    ),
                )),
            },
            Some(other) => Err(self.mismatch(cx, name, "a token", &other)),
        }
    }

    pub fn req_enum<T: SchemaToken>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<T, BuildError> {
        self.take_enum(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    pub fn take_color(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<Color>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Int(n)) => match i32::try_from(n) {
                Ok(v) => Ok(Some(Color(v))),
                Err(_) => Err(self.structural(
                    cx,
                    format!(
                        "field `{name}` of {}: {n} is out of range for a packed color",
                        self.record
                    ),
                )),
            },
            Some(other) => Err(self.mismatch(cx, name, "a packed color", &other)),
        }
    }

    // Nested records

    pub fn take_record<T: FromElement>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<T>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(Value::Element(el)) => {
                cx.in_field(name, |cx| T::from_element(el, cx)).map(Some)
            }
            Some(other) => Err(self.mismatch(cx, name, "a nested record", &other)),
        }
    }

    pub fn req_record<T: FromElement>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<T, BuildError> {
        self.take_record(cx, name)?
            .ok_or_else(|| self.missing(cx, name))
    }

    /// Decode a repeated nested record field. A single element decodes as a
    /// list of one.
    pub fn take_records<T: FromElement>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Vec<T>, BuildError> {
        match self.take(cx, name) {
            None => Ok(Vec::new()),
            Some(Value::Element(el)) => {
                let one = cx.in_field(name, |cx| {
                    cx.in_index(0, |cx| T::from_element(el, cx))
                })?;
                Ok(vec![one])
            }
            Some(Value::List(items)) => cx.in_field(name, |cx| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Element(el) => cx.in_index(i, |cx| T::from_element(el, cx)),
                        other => Err(BuildError::Structural {
                            path: cx.path.clone(),
                            detail: format!(
                                "list entry {i} of `{name}`: expected a nested record, found {}",
                                other.kind_name()
                            ),
                        }),
                    })
                    .collect()
            }),
            Some(other) => Err(self.mismatch(cx, name, "a list of records", &other)),
        }
    }

    /// Decode a polymorphic collection field.
    pub fn take_union<F: VariantFamily>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<UnionSeq<F>, BuildError> {
        let mut seq = UnionSeq::new();
        match self.take(cx, name) {
            None => Ok(seq),
            Some(Value::Element(el)) => {
                cx.in_field(name, |cx| {
                    cx.in_index(0, |cx| seq.append_element(el, cx))
                })?;
                Ok(seq)
            }
            Some(Value::List(items)) => {
                cx.in_field(name, |cx| {
                    for (i, item) in items.into_iter().enumerate() {
                        match item {
                            Value::Element(el) => {
                                cx.in_index(i, |cx| seq.append_element(el, cx))?;
                            }
                            other => {
                                return Err(BuildError::InvalidVariant {
                                    path: cx.path.clone(),
                                    family: F::FAMILY,
                                    found: other.kind_name().to_owned(),
                                });
                            }
                        }
                    }
                    Ok(())
                })?;
                Ok(seq)
            }
            Some(other) => Err(self.mismatch(cx, name, "a list of variant records", &other)),
        }
    }

    // References

    /// Decode an optional reference field. Accepts a bare identifier string
    /// or a reference element carrying an `id` field.
    pub fn take_ref<T: Identified>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Option<Ref<T>>, BuildError> {
        match self.take(cx, name) {
            None => Ok(None),
            Some(value) => cx
                .in_field(name, |cx| self.decode_ref(cx, name, value))
                .map(Some),
        }
    }

    /// Decode a repeated reference field.
    pub fn take_refs<T: Identified>(
        &mut self,
        cx: &mut BuildContext<'_>,
        name: &'static str,
    ) -> Result<Vec<Ref<T>>, BuildError> {
        match self.take(cx, name) {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => cx.in_field(name, |cx| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| cx.in_index(i, |cx| self.decode_ref(cx, name, item)))
                    .collect()
            }),
            Some(single) => {
                let one = cx.in_field(name, |cx| {
                    cx.in_index(0, |cx| self.decode_ref(cx, name, single))
                })?;
                Ok(vec![one])
            }
        }
    }

    fn decode_ref<T: Identified>(
        &self,
        cx: &mut BuildContext<'_>,
        name: &str,
        value: Value,
    ) -> Result<Ref<T>, BuildError> {
        match value {
            Value::Str(raw) => Ok(cx.reference(raw)),
            Value::Element(mut el) => match el.take_field("id") {
                Some(Value::Str(raw)) => Ok(cx.reference(raw)),
                Some(other) => Err(self.mismatch(cx, name, "an identifier", &other)),
                None => Err(self.structural(
                    cx,
                    format!("reference `{name}` of {} carries no id", self.record),
                )),
            },
            other => Err(self.mismatch(cx, name, "a reference", &other)),
        }
    }
}
