//! Settings records: references that carry acquisition-time overrides.
//!
//! A settings record points at a hardware component and adds the values it
//! was used with. Its `id` field is a reference to the target, not an
//! identity of its own, so it decodes in reference position.

use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{put_f64, put_string, ToElement};
use crate::records::instrument::{Detector, LightSourceValue, Objective};
use crate::{BuildError, Ref};

/// How an objective was used for one image.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveSettings {
    pub target: Ref<Objective>,
    pub correction_collar: Option<f64>,
    pub medium: Option<String>,
    pub refractive_index: Option<f64>,
}

impl FromElement for ObjectiveSettings {
    const ELEMENT: &'static str = "ObjectiveSettings";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let settings = ObjectiveSettings {
            target: fields.req_target(cx)?,
            correction_collar: fields.take_f64(cx, "correction_collar")?,
            medium: fields.take_string(cx, "medium")?,
            refractive_index: fields.take_f64(cx, "refractive_index")?,
        };
        fields.finish(cx);
        Ok(settings)
    }
}

impl ToElement for ObjectiveSettings {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        el.fields.insert("id", self.target.target());
        put_f64(&mut el, "correction_collar", self.correction_collar);
        put_string(&mut el, "medium", self.medium.as_deref());
        put_f64(&mut el, "refractive_index", self.refractive_index);
        el
    }
}

/// How a detector was configured for one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    pub target: Ref<Detector>,
    pub gain: Option<f64>,
    pub offset: Option<f64>,
}

impl FromElement for DetectorSettings {
    const ELEMENT: &'static str = "DetectorSettings";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let settings = DetectorSettings {
            target: fields.req_target(cx)?,
            gain: fields.take_f64(cx, "gain")?,
            offset: fields.take_f64(cx, "offset")?,
        };
        fields.finish(cx);
        Ok(settings)
    }
}

impl ToElement for DetectorSettings {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        el.fields.insert("id", self.target.target());
        put_f64(&mut el, "gain", self.gain);
        put_f64(&mut el, "offset", self.offset);
        el
    }
}

/// How a light source was driven for one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct LightSourceSettings {
    pub target: Ref<LightSourceValue>,
    pub attenuation: Option<f64>,
    pub wavelength: Option<f64>,
}

impl FromElement for LightSourceSettings {
    const ELEMENT: &'static str = "LightSourceSettings";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let settings = LightSourceSettings {
            target: fields.req_target(cx)?,
            attenuation: fields.take_f64(cx, "attenuation")?,
            wavelength: fields.take_f64(cx, "wavelength")?,
        };
        fields.finish(cx);
        Ok(settings)
    }
}

impl ToElement for LightSourceSettings {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        el.fields.insert("id", self.target.target());
        put_f64(&mut el, "attenuation", self.attenuation);
        put_f64(&mut el, "wavelength", self.wavelength);
        el
    }
}
