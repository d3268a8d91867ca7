//! Identity type-tags.

use std::fmt;

/// Type-tag component of an identifier.
///
/// Record types that share a tag share one numbering namespace: every shape
/// variant numbers under `Shape`, every annotation variant under
/// `Annotation`, every light source under `LightSource`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Tag {
    Project,
    Dataset,
    Folder,
    Experimenter,
    ExperimenterGroup,
    Instrument,
    LightSource,
    Detector,
    Objective,
    Filter,
    Dichroic,
    FilterSet,
    Image,
    Pixels,
    Channel,
    Plate,
    Well,
    WellSample,
    Screen,
    Reagent,
    Roi,
    Shape,
    Annotation,
}

impl Tag {
    /// Number of tags, sized for counter arrays.
    pub const COUNT: usize = 23;

    /// All tags in declaration order.
    pub const ALL: [Tag; Tag::COUNT] = [
        Tag::Project,
        Tag::Dataset,
        Tag::Folder,
        Tag::Experimenter,
        Tag::ExperimenterGroup,
        Tag::Instrument,
        Tag::LightSource,
        Tag::Detector,
        Tag::Objective,
        Tag::Filter,
        Tag::Dichroic,
        Tag::FilterSet,
        Tag::Image,
        Tag::Pixels,
        Tag::Channel,
        Tag::Plate,
        Tag::Well,
        Tag::WellSample,
        Tag::Screen,
        Tag::Reagent,
        Tag::Roi,
        Tag::Shape,
        Tag::Annotation,
    ];

    /// The tag string as it appears inside identifiers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Project => "Project",
            Tag::Dataset => "Dataset",
            Tag::Folder => "Folder",
            Tag::Experimenter => "Experimenter",
            Tag::ExperimenterGroup => "ExperimenterGroup",
            Tag::Instrument => "Instrument",
            Tag::LightSource => "LightSource",
            Tag::Detector => "Detector",
            Tag::Objective => "Objective",
            Tag::Filter => "Filter",
            Tag::Dichroic => "Dichroic",
            Tag::FilterSet => "FilterSet",
            Tag::Image => "Image",
            Tag::Pixels => "Pixels",
            Tag::Channel => "Channel",
            Tag::Plate => "Plate",
            Tag::Well => "Well",
            Tag::WellSample => "WellSample",
            Tag::Screen => "Screen",
            Tag::Reagent => "Reagent",
            // Serialized in upper case, unlike the variant name.
            Tag::Roi => "ROI",
            Tag::Shape => "Shape",
            Tag::Annotation => "Annotation",
        }
    }

    /// Dense index for counter arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_index() {
        for (i, tag) in Tag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
        assert_eq!(Tag::ALL.len(), Tag::COUNT);
    }

    #[test]
    fn roi_renders_upper_case() {
        assert_eq!(Tag::Roi.as_str(), "ROI");
        assert_eq!(Tag::Roi.to_string(), "ROI");
    }
}
