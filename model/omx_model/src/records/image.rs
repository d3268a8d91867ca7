//! Images and their pixel structure.

use chrono::{DateTime, Utc};
use omx_ids::{Id, Tag};
use omx_tree::Element;

use crate::context::{BuildContext, Fields, FromElement};
use crate::encode::{
    put_bool, put_color, put_datetime, put_enum, put_f64, put_id, put_record, put_records, put_ref,
    put_refs, put_string, put_u32, ToElement,
};
use crate::records::annotation::AnnotationValue;
use crate::records::common::BinData;
use crate::records::instrument::Instrument;
use crate::records::project::{Experimenter, ExperimenterGroup};
use crate::records::roi::Roi;
use crate::records::settings::{DetectorSettings, LightSourceSettings, ObjectiveSettings};
use crate::{
    BuildError, Color, DimensionOrder, Identified, PixelType, Ref, UnitsLength, UnitsTime,
};

/// One acquired channel of a pixel block.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Channel {
    pub id: Id,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub emission_wavelength: Option<f64>,
    pub excitation_wavelength: Option<f64>,
    pub samples_per_pixel: Option<u32>,
    pub fluor: Option<String>,
    pub light_source_settings: Option<LightSourceSettings>,
    pub detector_settings: Option<DetectorSettings>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Identified for Channel {
    const TAG: Tag = Tag::Channel;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Channel {
    const ELEMENT: &'static str = "Channel";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let channel = Channel {
            id: fields.take_id(cx, Tag::Channel)?,
            name: fields.take_string(cx, "name")?,
            color: fields.take_color(cx, "color")?,
            emission_wavelength: fields.take_f64(cx, "emission_wavelength")?,
            excitation_wavelength: fields.take_f64(cx, "excitation_wavelength")?,
            samples_per_pixel: fields.take_u32(cx, "samples_per_pixel")?,
            fluor: fields.take_string(cx, "fluor")?,
            light_source_settings: fields.take_record(cx, "light_source_settings")?,
            detector_settings: fields.take_record(cx, "detector_settings")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(channel)
    }
}

impl ToElement for Channel {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_color(&mut el, "color", self.color);
        put_f64(&mut el, "emission_wavelength", self.emission_wavelength);
        put_f64(&mut el, "excitation_wavelength", self.excitation_wavelength);
        put_u32(&mut el, "samples_per_pixel", self.samples_per_pixel);
        put_string(&mut el, "fluor", self.fluor.as_deref());
        put_record(
            &mut el,
            "light_source_settings",
            self.light_source_settings.as_ref(),
        );
        put_record(&mut el, "detector_settings", self.detector_settings.as_ref());
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// One recorded 2D plane within a pixel block.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Plane {
    pub the_z: u32,
    pub the_c: u32,
    pub the_t: u32,
    pub delta_t: Option<f64>,
    pub exposure_time: Option<f64>,
    pub exposure_time_unit: Option<UnitsTime>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl FromElement for Plane {
    const ELEMENT: &'static str = "Plane";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let plane = Plane {
            the_z: fields.req_u32(cx, "the_z")?,
            the_c: fields.req_u32(cx, "the_c")?,
            the_t: fields.req_u32(cx, "the_t")?,
            delta_t: fields.take_f64(cx, "delta_t")?,
            exposure_time: fields.take_f64(cx, "exposure_time")?,
            exposure_time_unit: fields.take_enum(cx, "exposure_time_unit")?,
            position_x: fields.take_f64(cx, "position_x")?,
            position_y: fields.take_f64(cx, "position_y")?,
            position_z: fields.take_f64(cx, "position_z")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(plane)
    }
}

impl ToElement for Plane {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        el.fields.insert("the_z", self.the_z);
        el.fields.insert("the_c", self.the_c);
        el.fields.insert("the_t", self.the_t);
        put_f64(&mut el, "delta_t", self.delta_t);
        put_f64(&mut el, "exposure_time", self.exposure_time);
        put_enum(&mut el, "exposure_time_unit", self.exposure_time_unit);
        put_f64(&mut el, "position_x", self.position_x);
        put_f64(&mut el, "position_y", self.position_y);
        put_f64(&mut el, "position_z", self.position_z);
        put_refs(&mut el, "annotation_refs", &self.annotation_refs);
        el
    }
}

/// The pixel structure of an image: dimensions, encoding, and per-channel
/// and per-plane detail.
#[derive(Clone, Debug, PartialEq)]
pub struct Pixels {
    pub id: Id,
    pub dimension_order: DimensionOrder,
    pub kind: PixelType,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    pub size_c: u32,
    pub size_t: u32,
    pub physical_size_x: Option<f64>,
    pub physical_size_x_unit: Option<UnitsLength>,
    pub physical_size_y: Option<f64>,
    pub physical_size_y_unit: Option<UnitsLength>,
    pub physical_size_z: Option<f64>,
    pub physical_size_z_unit: Option<UnitsLength>,
    pub time_increment: Option<f64>,
    pub big_endian: Option<bool>,
    pub interleaved: Option<bool>,
    pub significant_bits: Option<u32>,
    pub channels: Vec<Channel>,
    pub planes: Vec<Plane>,
    pub bin_data_blocks: Vec<BinData>,
}

impl Pixels {
    /// A pixel block with the required dimensions and no optional detail.
    /// Sizes are `[x, y, z, c, t]`.
    pub fn new(dimension_order: DimensionOrder, kind: PixelType, sizes: [u32; 5]) -> Self {
        let [size_x, size_y, size_z, size_c, size_t] = sizes;
        Pixels {
            id: Id::Auto,
            dimension_order,
            kind,
            size_x,
            size_y,
            size_z,
            size_c,
            size_t,
            physical_size_x: None,
            physical_size_x_unit: None,
            physical_size_y: None,
            physical_size_y_unit: None,
            physical_size_z: None,
            physical_size_z_unit: None,
            time_increment: None,
            big_endian: None,
            interleaved: None,
            significant_bits: None,
            channels: Vec::new(),
            planes: Vec::new(),
            bin_data_blocks: Vec::new(),
        }
    }
}

impl Identified for Pixels {
    const TAG: Tag = Tag::Pixels;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Pixels {
    const ELEMENT: &'static str = "Pixels";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let pixels = Pixels {
            id: fields.take_id(cx, Tag::Pixels)?,
            dimension_order: fields.req_enum(cx, "dimension_order")?,
            kind: fields.req_enum(cx, "kind")?,
            size_x: fields.req_u32(cx, "size_x")?,
            size_y: fields.req_u32(cx, "size_y")?,
            size_z: fields.req_u32(cx, "size_z")?,
            size_c: fields.req_u32(cx, "size_c")?,
            size_t: fields.req_u32(cx, "size_t")?,
            physical_size_x: fields.take_f64(cx, "physical_size_x")?,
            physical_size_x_unit: fields.take_enum(cx, "physical_size_x_unit")?,
            physical_size_y: fields.take_f64(cx, "physical_size_y")?,
            physical_size_y_unit: fields.take_enum(cx, "physical_size_y_unit")?,
            physical_size_z: fields.take_f64(cx, "physical_size_z")?,
            physical_size_z_unit: fields.take_enum(cx, "physical_size_z_unit")?,
            time_increment: fields.take_f64(cx, "time_increment")?,
            big_endian: fields.take_bool(cx, "big_endian")?,
            interleaved: fields.take_bool(cx, "interleaved")?,
            significant_bits: fields.take_u32(cx, "significant_bits")?,
            channels: fields.take_records(cx, "channels")?,
            planes: fields.take_records(cx, "planes")?,
            bin_data_blocks: fields.take_records(cx, "bin_data_blocks")?,
        };
        fields.finish(cx);
        Ok(pixels)
    }
}

impl ToElement for Pixels {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        el.fields.insert("dimension_order", self.dimension_order.to_string());
        el.fields.insert("kind", self.kind.to_string());
        el.fields.insert("size_x", self.size_x);
        el.fields.insert("size_y", self.size_y);
        el.fields.insert("size_z", self.size_z);
        el.fields.insert("size_c", self.size_c);
        el.fields.insert("size_t", self.size_t);
        put_f64(&mut el, "physical_size_x", self.physical_size_x);
        put_enum(&mut el, "physical_size_x_unit", self.physical_size_x_unit);
        put_f64(&mut el, "physical_size_y", self.physical_size_y);
        put_enum(&mut el, "physical_size_y_unit", self.physical_size_y_unit);
        put_f64(&mut el, "physical_size_z", self.physical_size_z);
        put_enum(&mut el, "physical_size_z_unit", self.physical_size_z_unit);
        put_f64(&mut el, "time_increment", self.time_increment);
        put_bool(&mut el, "big_endian", self.big_endian);
        put_bool(&mut el, "interleaved", self.interleaved);
        put_u32(&mut el, "significant_bits", self.significant_bits);
        put_records(&mut el, "channels", &self.channels);
        put_records(&mut el, "planes", &self.planes);
        put_records(&mut el, "bin_data_blocks", &self.bin_data_blocks);
        el
    }
}

/// One image with its acquisition context.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub acquisition_date: Option<DateTime<Utc>>,
    pub experimenter_ref: Option<Ref<Experimenter>>,
    pub experimenter_group_ref: Option<Ref<ExperimenterGroup>>,
    pub instrument_ref: Option<Ref<Instrument>>,
    pub objective_settings: Option<ObjectiveSettings>,
    pub pixels: Pixels,
    pub roi_refs: Vec<Ref<Roi>>,
    pub annotation_refs: Vec<Ref<AnnotationValue>>,
}

impl Image {
    /// An image over `pixels` with no metadata attached yet.
    pub fn new(pixels: Pixels) -> Self {
        Image {
            id: Id::Auto,
            name: None,
            description: None,
            acquisition_date: None,
            experimenter_ref: None,
            experimenter_group_ref: None,
            instrument_ref: None,
            objective_settings: None,
            pixels,
            roi_refs: Vec::new(),
            annotation_refs: Vec::new(),
        }
    }
}

impl Identified for Image {
    const TAG: Tag = Tag::Image;

    fn id(&self) -> &Id {
        &self.id
    }

    fn id_mut(&mut self) -> &mut Id {
        &mut self.id
    }
}

impl FromElement for Image {
    const ELEMENT: &'static str = "Image";

    fn from_element(el: Element, cx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        let mut fields = Fields::new(el, Self::ELEMENT);
        let image = Image {
            id: fields.take_id(cx, Tag::Image)?,
            name: fields.take_string(cx, "name")?,
            description: fields.take_string(cx, "description")?,
            acquisition_date: fields.take_datetime(cx, "acquisition_date")?,
            experimenter_ref: fields.take_ref(cx, "experimenter_ref")?,
            experimenter_group_ref: fields.take_ref(cx, "experimenter_group_ref")?,
            instrument_ref: fields.take_ref(cx, "instrument_ref")?,
            objective_settings: fields.take_record(cx, "objective_settings")?,
            pixels: fields.req_record(cx, "pixels")?,
            roi_refs: fields.take_refs(cx, "roi_refs")?,
            annotation_refs: fields.take_refs(cx, "annotation_refs")?,
        };
        fields.finish(cx);
        Ok(image)
    }
}

impl ToElement for Image {
    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::ELEMENT);
        put_id(&mut el, &self.id);
        put_string(&mut el, "name", self.name.as_deref());
        put_string(&mut el, "description", self.description.as_deref());
        put_datetime(&mut el, "acquisition_date", self.acquisition_date.as_ref());
        put_ref(&mut el, "experimenter_ref", self.experimenter_ref.as_ref());
        put_ref(
            &mut el,
            "experimenter_group_ref",
            self.experimenter_group_ref.as_ref(),
        );
        put_ref(&mut el, "instrument_ref", self.instrument_ref.as_ref());
        put_record(&mut el, "objective_settings", self.objective_settings.as_ref());
        el.fields.insert("pixels", self.pixels.to_element());
        put_refs(&mut el, "roi_refs", &self.roi_refs);
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

    fn pixels_element() -> Element {
        Element::new("Pixels")
            .with_field("dimension_order", "XYCZT")
            .with_field("kind", "uint16")
            .with_field("size_x", 64)
            .with_field("size_y", 64)
            .with_field("size_z", 1)
            .with_field("size_c", 2)
            .with_field("size_t", 1)
    }

    #[test]
    fn image_requires_pixels() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Image").with_field("name", "no pixels");
        let err = Image::from_element(el, &mut cx).unwrap_err();
        assert!(err.to_string().contains("requires field `pixels`"));
    }

    #[test]
    fn nested_channels_take_their_own_identifiers() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Image").with_field(
            "pixels",
            pixels_element().with_field(
                "channels",
                Value::List(vec![
                    Element::new("Channel").with_field("name", "DAPI").into(),
                    Element::new("Channel").with_field("name", "GFP").into(),
                ]),
            ),
        );

        let image = Image::from_element(el, &mut cx).unwrap();
        assert!(sink.is_empty());
        assert_eq!(image.pixels.channels.len(), 2);
        assert_eq!(image.id.as_str(), Some("Image:0"));
        assert_eq!(image.pixels.id.as_str(), Some("Pixels:0"));
        assert_eq!(image.pixels.channels[0].id.as_str(), Some("Channel:0"));
        assert_eq!(image.pixels.channels[1].id.as_str(), Some("Channel:1"));
    }

    #[test]
    fn acquisition_date_parses_as_utc() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Image")
            .with_field("acquisition_date", "2023-04-05T10:00:00+02:00")
            .with_field("pixels", pixels_element());

        let image = Image::from_element(el, &mut cx).unwrap();
        let stamp = image.acquisition_date.unwrap();
        assert_eq!(stamp.to_rfc3339(), "2023-04-05T08:00:00+00:00");
    }

    #[test]
    fn plane_indices_are_required() {
        let mut registry = IdRegistry::new();
        let mut sink = DiagnosticSink::new();
        let mut cx = BuildContext::new(&mut registry, &mut sink);
        let el = Element::new("Plane").with_field("the_z", 0).with_field("the_t", 0);
        let err = Plane::from_element(el, &mut cx).unwrap_err();
        assert!(err.to_string().contains("the_c"));
    }
}
