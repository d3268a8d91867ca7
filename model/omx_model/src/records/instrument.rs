//! Instruments and their hardware components.

use omx_ids::{Id, Tag};
use omx_tree::Element;

use super::variant_family;
use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{
    put_bool, put_enum, put_f64, put_id, put_record, put_records, put_ref, put_refs, put_string,
    put_union, ToElement,
};
use crate::records::annotation::AnnotationValue;
use crate::records::common::Map;
use crate::{BuildError, DetectorType, Identified, Ref, UnionSeq, UnitsLength};

/// Attributes shared by every light source variant.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LightSourceAttrs {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub lot_number: Option<String>,
    pub power: Option<f64>,
}

impl LightSourceAttrs {
    fn take(fields: &mut Fields, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        Ok(LightSourceAttrs {
            id: fields.take_id(cx, Tag::LightSource)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            serial_number: fields.take_string(cx, "serial_number")?,
            lot_number: fields.take_string(cx, "lot_number")?,
            power: fields.take_f64(cx, "power")?,
        })
    }

    fn put(&self, el: &mut Element) {
        put_id(el, &self.id);
        put_string(el, "manufacturer", self.manufacturer.as_deref());
        put_string(el, "model", self.model.as_deref());
        put_string(el, "serial_number", self.serial_number.as_deref());
        put_string(el, "lot_number", self.lot_number.as_deref());
        put_f64(el, "power", self.power);
    }
}

/// A broadband arc lamp.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Arc {
    pub attrs: LightSourceAttrs,
}

impl FromElement for Arc {
    const ELEMENT: &'static str = "Arc";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let arc = Arc {
            attrs: LightSourceAttrs::take(&mut fields, cx)?,
        };
        fields.finish(cx);
        Ok(arc)
    }
}

impl ToElement for Arc {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el
    }
}

/// An incandescent filament lamp.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Filament {
    pub attrs: LightSourceAttrs,
}

impl FromElement for Filament {
    const ELEMENT: &'static str = "Filament";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let filament = Filament {
            attrs: LightSourceAttrs::take(&mut fields, cx)?,
        };
        fields.finish(cx);
        Ok(filament)
    }
}

impl ToElement for Filament {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el
    }
}

/// A light source described only by a property map.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GenericExcitationSource {
    pub attrs: LightSourceAttrs,
    pub map: Option<Map>,
}

impl FromElement for GenericExcitationSource {
    const ELEMENT: &'static str = "GenericExcitationSource";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let source = GenericExcitationSource {
            attrs: LightSourceAttrs::take(&mut fields, cx)?,
            map: fields.take_record(cx, "map")?,
        };
        fields.finish(cx);
        Ok(source)
    }
}

impl ToElement for GenericExcitationSource {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        put_record(&mut el, "map", self.map.as_ref());
        el
    }
}

/// A laser, optionally pumped by another light source.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Laser {
    pub attrs: LightSourceAttrs,
    pub wavelength: Option<f64>,
    pub tuneable: Option<bool>,
    pub pump: Option<Ref<LightSourceValue>>,
}

impl FromElement for Laser {
    const ELEMENT: &'static str = "Laser";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let laser = Laser {
            attrs: LightSourceAttrs::take(&mut fields, cx)?,
            wavelength: fields.take_f64(cx, "wavelength")?,
            tuneable: fields.take_bool(cx, "tuneable")?,
            pump: fields.take_ref(cx, "pump")?,
        };
        fields.finish(cx);
        Ok(laser)
    }
}

impl ToElement for Laser {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        put_f64(&mut el, "wavelength", self.wavelength);
        put_bool(&mut el, "tuneable", self.tuneable);
        put_ref(&mut el, "pump", self.pump.as_ref());
        el
    }
}

/// A light emitting diode.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LightEmittingDiode {
    pub attrs: LightSourceAttrs,
}

impl FromElement for LightEmittingDiode {
    const ELEMENT: &'static str = "LightEmittingDiode";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let diode = LightEmittingDiode {
            attrs: LightSourceAttrs::take(&mut fields, cx)?,
        };
        fields.finish(cx);
        Ok(diode)
    }
}

impl ToElement for LightEmittingDiode {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        self.attrs.put(&mut el);
        el
    }
}

variant_family! {
    /// One light source of an instrument.
    LightSourceValue(LightSourceAttrs), Tag::LightSource, "light source" {
        Arc => "Arc" / "arc",
        Filament => "Filament" / "filament",
        GenericExcitationSource => "GenericExcitationSource" / "generic_excitation_source",
        Laser => "Laser" / "laser",
        LightEmittingDiode => "LightEmittingDiode" / "light_emitting_diode",
    }
}

/// The microscope body an instrument is built around.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Microscope {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub lot_number: Option<String>,
}

impl FromElement for Microscope {
    const ELEMENT: &'static str = "Microscope";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let microscope = Microscope {
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            serial_number: fields.take_string(cx, "serial_number")?,
            lot_number: fields.take_string(cx, "lot_number")?,
        };
        fields.finish(cx);
        Ok(microscope)
    }
}

impl ToElement for Microscope {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        put_string(&mut el, "serial_number", self.serial_number.as_deref());
        put_string(&mut el, "lot_number", self.lot_number.as_deref());
        el
    }
}

/// A photon detector.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Detector {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub gain: Option<f64>,
    pub offset: Option<f64>,
    pub kind: Option<DetectorType>,
}

impl Identified for Detector {
    const TAG: Tag = Tag::Detector;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Detector {
    const ELEMENT: &'static str = "Detector";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let detector = Detector {
            id: fields.take_id(cx, Tag::Detector)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            serial_number: fields.take_string(cx, "serial_number")?,
            gain: fields.take_f64(cx, "gain")?,
            offset: fields.take_f64(cx, "offset")?,
            kind: fields.take_enum(cx, "kind")?,
        };
        fields.finish(cx);
        Ok(detector)
    }
}

impl ToElement for Detector {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        put_string(&mut el, "serial_number", self.serial_number.as_deref());
        put_f64(&mut el, "gain", self.gain);
        put_f64(&mut el, "offset", self.offset);
        put_enum(&mut el, "kind", self.kind);
        el
    }
}

/// An objective lens.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Objective {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub nominal_magnification: Option<f64>,
    pub lens_na: Option<f64>,
    pub working_distance: Option<f64>,
}

impl Identified for Objective {
    const TAG: Tag = Tag::Objective;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Objective {
    const ELEMENT: &'static str = "Objective";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let objective = Objective {
            id: fields.take_id(cx, Tag::Objective)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            nominal_magnification: fields.take_f64(cx, "nominal_magnification")?,
            lens_na: fields.take_f64(cx, "lens_na")?,
            working_distance: fields.take_f64(cx, "working_distance")?,
        };
        fields.finish(cx);
        Ok(objective)
    }
}

impl ToElement for Objective {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        put_f64(&mut el, "nominal_magnification", self.nominal_magnification);
        put_f64(&mut el, "lens_na", self.lens_na);
        put_f64(&mut el, "working_distance", self.working_distance);
        el
    }
}

/// The transmittance window of a filter.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransmittanceRange {
    pub cut_in: Option<f64>,
    pub cut_in_unit: Option<UnitsLength>,
    pub cut_out: Option<f64>,
    pub cut_out_unit: Option<UnitsLength>,
    pub cut_in_tolerance: Option<f64>,
    pub cut_out_tolerance: Option<f64>,
    pub transmittance: Option<f64>,
}

impl FromElement for TransmittanceRange {
    const ELEMENT: &'static str = "TransmittanceRange";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let range = TransmittanceRange {
            cut_in: fields.take_f64(cx, "cut_in")?,
            cut_in_unit: fields.take_enum(cx, "cut_in_unit")?,
            cut_out: fields.take_f64(cx, "cut_out")?,
            cut_out_unit: fields.take_enum(cx, "cut_out_unit")?,
            cut_in_tolerance: fields.take_f64(cx, "cut_in_tolerance")?,
            cut_out_tolerance: fields.take_f64(cx, "cut_out_tolerance")?,
            transmittance: fields.take_f64(cx, "transmittance")?,
        };
        fields.finish(cx);
        Ok(range)
    }
}

impl ToElement for TransmittanceRange {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_f64(&mut el, "cut_in", self.cut_in);
        put_enum(&mut el, "cut_in_unit", self.cut_in_unit);
        put_f64(&mut el, "cut_out", self.cut_out);
        put_enum(&mut el, "cut_out_unit", self.cut_out_unit);
        put_f64(&mut el, "cut_in_tolerance", self.cut_in_tolerance);
        put_f64(&mut el, "cut_out_tolerance", self.cut_out_tolerance);
        put_f64(&mut el, "transmittance", self.transmittance);
        el
    }
}

/// An emission or excitation filter.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Filter {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub filter_wheel: Option<String>,
    pub transmittance_range: Option<TransmittanceRange>,
}

impl Identified for Filter {
    const TAG: Tag = Tag::Filter;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Filter {
    const ELEMENT: &'static str = "Filter";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let filter = Filter {
            id: fields.take_id(cx, Tag::Filter)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            filter_wheel: fields.take_string(cx, "filter_wheel")?,
            transmittance_range: fields.take_record(cx, "transmittance_range")?,
        };
        fields.finish(cx);
        Ok(filter)
    }
}

impl ToElement for Filter {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        put_string(&mut el, "filter_wheel", self.filter_wheel.as_deref());
        put_record(
            &mut el,
            "transmittance_range",
            self.transmittance_range.as_ref(),
        );
        el
    }
}

/// A dichroic beam splitter.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dichroic {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

impl Identified for Dichroic {
    const TAG: Tag = Tag::Dichroic;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Dichroic {
    const ELEMENT: &'static str = "Dichroic";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let dichroic = Dichroic {
            id: fields.take_id(cx, Tag::Dichroic)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
        };
        fields.finish(cx);
        Ok(dichroic)
    }
}

impl ToElement for Dichroic {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        el
    }
}

/// A matched combination of excitation filters, dichroic, and emission
/// filters.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FilterSet {
    pub id: Id,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub excitation_filters: Vec<Ref<Filter>>,
    pub dichroic_ref: Option<Ref<Dichroic>>,
    pub emission_filters: Vec<Ref<Filter>>,
}

impl Identified for FilterSet {
    const TAG: Tag = Tag::FilterSet;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for FilterSet {
    const ELEMENT: &'static str = "FilterSet";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let set = FilterSet {
            id: fields.take_id(cx, Tag::FilterSet)?,
            manufacturer: fields.take_string(cx, "manufacturer")?,
            model: fields.take_string(cx, "model")?,
            excitation_filters: fields.take_refs(cx, "excitation_filters")?,
            dichroic_ref: fields.take_ref(cx, "dichroic_ref")?,
            emission_filters: fields.take_refs(cx, "emission_filters")?,
        };
        fields.finish(cx);
        Ok(set)
    }
}

impl ToElement for FilterSet {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "manufacturer", self.manufacturer.as_deref());
        put_string(&mut el, "model", self.model.as_deref());
        put_refs(&mut el, "excitation_filters", &self.excitation_filters);
        put_ref(&mut el, "dichroic_ref", self.dichroic_ref.as_ref());
        put_refs(&mut el, "emission_filters", &self.emission_filters);
        el
    }
}

/// A configured microscope with its light path components.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Instrument {
    pub id: Id,
    pub microscope: Option<Microscope>,
    pub light_sources: UnionSeq<LightSourceValue>,
    pub detectors: Vec<Detector>,
    pub objectives: Vec<Objective>,
    pub filter_sets: Vec<FilterSet>,
    pub filters: Vec<Filter>,
    pub dichroics: Vec<Dichroic>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Instrument {
    /// The lasers among the light sources, in document order.
    pub fn lasers(&self) -> impl Iterator<Item = &Laser> {
        self.light_sources.iter().filter_map(|source| match source {
            LightSourceValue::Laser(laser) => Some(laser),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.light_sources.iter().filter_map(|source| match source {
            LightSourceValue::Arc(arc) => Some(arc),
            _ => None,
        })
    }

    pub fn filaments(&self) -> impl Iterator<Item = &Filament> {
        self.light_sources.iter().filter_map(|source| match source {
            LightSourceValue::Filament(filament) => Some(filament),
            _ => None,
        })
    }

    pub fn light_emitting_diodes(&self) -> impl Iterator<Item = &LightEmittingDiode> {
        self.light_sources.iter().filter_map(|source| match source {
            LightSourceValue::LightEmittingDiode(diode) => Some(diode),
            _ => None,
        })
    }

    pub fn generic_excitation_sources(&self) -> impl Iterator<Item = &GenericExcitationSource> {
        self.light_sources.iter().filter_map(|source| match source {
            LightSourceValue::GenericExcitationSource(source) => Some(source),
            _ => None,
        })
    }
}

impl Identified for Instrument {
    const TAG: Tag = Tag::Instrument;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Instrument {
    const ELEMENT: &'static str = "Instrument";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let instrument = Instrument {
            id: fields.take_id(cx, Tag::Instrument)?,
            microscope: fields.take_record(cx, "microscope")?,
            light_sources: fields.take_union(cx, "light_sources")?,
            detectors: fields.take_records(cx, "detectors")?,
            objectives: fields.take_records(cx, "objectives")?,
            filter_sets: fields.take_records(cx, "filter_sets")?,
            filters: fields.take_records(cx, "filters")?,
            dichroics: fields.take_records(cx, "dichroics")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(instrument)
    }
}

impl ToElement for Instrument {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_record(&mut el, "microscope", self.microscope.as_ref());
        put_union(&mut el, "light_sources", &self.light_sources);
        put_records(&mut el, "detectors", &self.detectors);
        put_records(&mut el, "objectives", &self.objectives);
        put_records(&mut el, "filter_sets", &self.filter_sets);
        put_records(&mut el, "filters", &self.filters);
        put_records(&mut el, "dichroics", &self.dichroics);
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
    use crate::VariantFamily;

    fn decode_instrument(el: Element) -> (Instrument, DiagnosticSink) {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let instrument = Instrument::from_element(el, &mut cx).unwrap();
        (instrument, sink)
    }

    #[test]
    fn light_sources_keep_document_order_across_kinds() {
        let el = Element::new("Instrument").with_field(
            "light_sources",
            Value::List(vec![
                Element::new("Laser").with_field("wavelength", 488.0).into(),
                Element::new("Arc").into(),
                Element::new("Laser").with_field("wavelength", 561.0).into(),
            ]),
        );
        let (instrument, sink) = decode_instrument(el);

        assert!(sink.is_empty());
        assert_eq!(instrument.light_sources.len(), 3);
        let kinds: Vec<_> = instrument.light_sources.iter().map(VariantFamily::kind).collect();
        assert_eq!(kinds, ["laser", "arc", "laser"]);
        let wavelengths: Vec<_> = instrument.lasers().filter_map(|l| l.wavelength).collect();
        assert_eq!(wavelengths, [488.0, 561.0]);
    }

    #[test]
    fn light_source_ids_share_one_counter() {
        let el = Element::new("Instrument").with_field(
            "light_sources",
            Value::List(vec![
                Element::new("Laser").into(),
                Element::new("LightEmittingDiode").into(),
            ]),
        );
        let (instrument, _) = decode_instrument(el);

        let ids: Vec<_> = instrument
            .light_sources
            .iter()
            .map(|s| s.attrs().id.as_str().unwrap_or("").to_owned())
            .collect();
        assert_eq!(ids, ["LightSource:0", "LightSource:1"]);
    }

    #[test]
    fn kind_hint_selects_the_variant() {
        let el = Element::new("Instrument").with_field(
            "light_sources",
            Value::List(vec![Element::new("LightSource")
                .with_field("kind", "laser")
                .with_field("wavelength", 640.0)
                .into()]),
        );
        let (instrument, _) = decode_instrument(el);
        assert_eq!(instrument.lasers().count(), 1);
    }

    #[test]
    fn detector_kind_token_decodes() {
        let el = Element::new("Instrument").with_field(
            "detectors",
            Value::List(vec![Element::new("Detector")
                .with_field("kind", "EMCCD")
                .with_field("gain", 2.5)
                .into()]),
        );
        let (instrument, sink) = decode_instrument(el);
        assert!(sink.is_empty());
        assert_eq!(instrument.detectors[0].kind, Some(DetectorType::EmCcd));
        assert_eq!(instrument.detectors[0].gain, Some(2.5));
    }

    #[test]
    fn filter_set_round_trips_through_the_tree_form() {
        let el = Element::new("FilterSet")
            .with_field("id", "FilterSet:0")
            .with_field("model", "Quad band")
            .with_field(
                "excitation_filters",
                Value::List(vec!["Filter:0".into(), "Filter:1".into()]),
            )
            .with_field("dichroic_ref", "Dichroic:0");

        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let set = FilterSet::from_element(el.clone(), &mut cx).unwrap();
        assert_eq!(set.to_element(), el);
    }
}
