//! The record catalog.
//!
//! One module per schema area. Every identity-bearing record implements
//! [`crate::Identified`], decodes through [`crate::FromElement`], and
//! encodes through [`crate::ToElement`]. The three polymorphic families
//! (shapes, structured annotations, light sources) are defined through
//! [`variant_family!`], which generates the enum, its dispatch, and the
//! [`crate::VariantFamily`] implementation from one table.

mod annotation;
mod common;
mod image;
mod instrument;
mod ome;
mod plate;
mod project;
mod roi;
mod screen;
mod settings;

pub use annotation::{
    AnnotationAttrs, AnnotationValue, BooleanAnnotation, CommentAnnotation, DoubleAnnotation,
    FileAnnotation, ListAnnotation, LongAnnotation, MapAnnotation, TagAnnotation, TermAnnotation,
    TimestampAnnotation, XmlAnnotation,
};
pub use common::{AffineTransform, BinData, BinaryFile, External, Map, MapPair};
pub use image::{Channel, Image, Pixels, Plane};
pub use instrument::{
    Arc, Detector, Dichroic, Filament, Filter, FilterSet, GenericExcitationSource, Instrument,
    Laser, LightEmittingDiode, LightSourceAttrs, LightSourceValue, Microscope, Objective,
    TransmittanceRange,
};
pub use ome::Ome;
pub use plate::{Plate, Well, WellSample};
pub use project::{Dataset, Experimenter, ExperimenterGroup, Folder, Project};
pub use roi::{
    Ellipse, Label, Line, Mask, Point, Polygon, Polyline, Rectangle, Roi, ShapeAttrs, ShapeValue,
};
pub use screen::{Reagent, Screen};
pub use settings::{DetectorSettings, LightSourceSettings, ObjectiveSettings};

/// Defines one polymorphic family: the enum over its variant records plus
/// identity and dispatch implementations.
///
/// Each row maps a variant to its event name and its kind keyword; row
/// order is the trial priority order.
macro_rules! variant_family {
    (
        $(#[$meta:meta])*
        $family:ident($attrs:ty), $tag:expr, $name:literal {
            $($variant:ident => $element:literal / $kind:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub enum $family {
            $($variant($variant),)+
        }

        impl $family {
            /// The wrapped record's shared attributes.
            pub fn attrs(&self) -> &$attrs {
                match self {
                    $($family::$variant(v) => &v.attrs,)+
                }
            }

            pub fn attrs_mut(&mut self) -> &mut $attrs {
                match self {
                    $($family::$variant(v) => &mut v.attrs,)+
                }
            }
        }

        impl crate::Identified for $family {
            const TAG: omx_ids::Tag = $tag;

            fn id(&self) -> &omx_ids::Id {
                &self.attrs().id
            }

            fn id_mut(&mut self) -> &mut omx_ids::Id {
                &mut self.attrs_mut().id
            }
        }

        impl crate::VariantFamily for $family {
            const FAMILY: &'static str = $name;
            const KINDS: &'static [&'static str] = &[$($kind,)+];

            fn kind(&self) -> &'static str {
                match self {
                    $($family::$variant(_) => $kind,)+
                }
            }

            fn element_name(&self) -> &'static str {
                match self {
                    $($family::$variant(_) => $element,)+
                }
            }

            fn from_named(
                el: omx_tree::Element,
                cx: &mut crate::BuildContext<'_>,
            ) -> Result<Option<Self>, crate::BuildError> {
                let name = el.name.clone();
                match name.as_str() {
                    $($element => <$variant as crate::FromElement>::from_element(el, cx)
                        .map($family::$variant)
                        .map(Some),)+
                    _ => Ok(None),
                }
            }

            fn from_kind(
                kind: &str,
                el: omx_tree::Element,
                cx: &mut crate::BuildContext<'_>,
            ) -> Result<Option<Self>, crate::BuildError> {
                match kind {
                    $($kind => <$variant as crate::FromElement>::from_element(el, cx)
                        .map($family::$variant)
                        .map(Some),)+
                    _ => Ok(None),
                }
            }

            fn to_element(&self) -> omx_tree::Element {
                match self {
                    $($family::$variant(v) => crate::ToElement::to_element(v),)+
                }
            }
        }

        $(
            impl From<$variant> for $family {
                fn from(v: $variant) -> Self {
                    $family::$variant(v)
                }
            }
        )+
    };
}

pub(crate) use variant_family;
