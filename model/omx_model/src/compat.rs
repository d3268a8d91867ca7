//! Legacy field-name compatibility.
//!
//! Earlier schema revisions used singular names for fields that are plural
//! today. Every legacy name is enumerated here and consulted by exactly one
//! entry point, [`Fields::take`](crate::Fields::take): when a record's
//! current field name is absent from a mapping but a legacy alias is
//! present, the alias is read instead and a `DeprecatedFieldAccess` warning
//! is reported. Nothing falls back implicitly.

/// Legacy name to current name, both in mapping-key form.
pub const DEPRECATED_NAMES: &[(&str, &str)] = &[
    ("annotation_ref", "annotation_refs"),
    ("image_ref", "image_refs"),
    ("experimenter_ref", "experimenter_refs"),
    ("leader", "leaders"),
    ("roi_ref", "roi_refs"),
    ("light_source_settings", "light_source_settings_combinations"),
    ("folder_ref", "folder_refs"),
    ("bin_data", "bin_data_blocks"),
    ("emission_filter_ref", "emission_filters"),
    ("excitation_filter_ref", "excitation_filters"),
    ("microbeam_manipulation_ref", "microbeam_manipulation_refs"),
    ("m", "ms"),
    ("well_sample_ref", "well_sample_refs"),
    ("dataset_ref", "dataset_refs"),
    ("plate_ref", "plate_refs"),
];

/// The current name for a legacy field name, if the name is legacy at all.
pub fn canonical_name(legacy: &str) -> Option<&'static str> {
    DEPRECATED_NAMES
        .iter()
        .find(|(old, _)| *old == legacy)
        .map(|(_, new)| *new)
}

/// Legacy aliases that map to `current`.
pub fn aliases_of(current: &str) -> impl Iterator<Item = &'static str> + '_ {
    DEPRECATED_NAMES
        .iter()
        .filter(move |(_, new)| *new == current)
        .map(|(old, _)| *old)
}
