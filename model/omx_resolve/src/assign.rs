//! Identifier assignment for records built outside a decode.
//!
//! A record constructed in code enters the document with `Id::Auto` or a
//! literal identifier, and its reference slots hold raw target strings.
//! Before the record lands, the identifier pipeline that runs during decode
//! runs over the subtree in place: identifiers are assigned or validated
//! against the registry, invalid spellings are repaired with a warning, and
//! raw reference targets are checked and rewritten or deferred.

use omx_diagnostic::{casting_invalid_id, DiagnosticSink};
use omx_ids::{CheckedRef, DuplicateId, Id, IdRegistry, ProvidedId, Tag};
use omx_model::visit::VisitMut;
use omx_model::{RefSlot, RefState};
use omx_tree::Path;

/// Mutable walk hook that assigns identifiers the way a decode would.
///
/// The first duplicate identifier stops further assignment; the walk cannot
/// bail early, so later sites are skipped one by one and [`Assigner::finish`]
/// surfaces the failure.
pub struct Assigner<'a> {
    registry: &'a mut IdRegistry,
    sink: &'a mut DiagnosticSink,
    failed: Option<(DuplicateId, Path)>,
}

impl<'a> Assigner<'a> {
    pub fn new(registry: &'a mut IdRegistry, sink: &'a mut DiagnosticSink) -> Self {
        Assigner {
            registry,
            sink,
            failed: None,
        }
    }

    pub fn finish(self) -> Result<(), (DuplicateId, Path)> {
        match self.failed {
            None => Ok(()),
            Some(failure) => Err(failure),
        }
    }
}

impl VisitMut for Assigner<'_> {
    fn visit_identity_mut(&mut self, tag: Tag, id: &mut Id, path: &Path) {
        if self.failed.is_some() {
            return;
        }
        let provided = match id.as_str() {
            None => ProvidedId::Auto,
            Some(text) => ProvidedId::Text(text),
        };
        match self.registry.assign(tag, provided) {
            Ok(assigned) => {
                if let Some(original) = &assigned.cast_from {
                    let diag =
                        casting_invalid_id(tag, original, Some(assigned.id.as_str()), path.clone());
                    self.sink.report(diag);
                }
                *id = Id::Assigned(assigned.id);
            }
            Err(source) => self.failed = Some((source, path.clone())),
        }
    }

    fn visit_reference_mut(&mut self, tag: Tag, slot: &mut RefSlot, path: &Path) {
        if self.failed.is_some() {
            return;
        }
        let RefState::Raw(target) = &slot.state else {
            return;
        };
        match self.registry.check_ref(tag, target) {
            CheckedRef::Valid => {}
            CheckedRef::CastNumeric(repaired) => {
                let diag = casting_invalid_id(tag, target, Some(repaired.as_str()), path.clone());
                self.sink.report(diag);
                slot.state = RefState::Raw(repaired.to_string());
            }
            CheckedRef::CastDeferred => {
                let original = target.clone();
                let diag = casting_invalid_id(tag, &original, None, path.clone());
                self.sink.report(diag);
                slot.state = RefState::Deferred(original);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use omx_diagnostic::DiagCode;
    use omx_model::records::{Channel, Image, Pixels};
    use omx_model::visit::walk_image_mut;
    use omx_model::{DimensionOrder, PixelType};
    use omx_tree::Step;
    use pretty_assertions::assert_eq;

    use super::*;

    fn bare_image() -> Image {
        let mut pixels = Pixels::new(DimensionOrder::Xyczt, PixelType::Uint8, [2, 2, 1, 1, 1]);
        pixels.channels.push(Channel::default());
        Image::new(pixels)
    }

    fn run(registry: &mut IdRegistry, image: &mut Image) -> (DiagnosticSink, Result<(), (DuplicateId, Path)>) {
        let mut sink = DiagnosticSink::new();
        let mut path = Path::from_steps([Step::Field("images"), Step::Index(0)]);
        let mut assigner = Assigner::new(registry, &mut sink);
        walk_image_mut(&mut assigner, image, &mut path);
        let outcome = assigner.finish();
        (sink, outcome)
    }

    #[test]
    fn auto_identities_take_the_next_numbers() {
        let mut registry = IdRegistry::new();
        let mut image = bare_image();

        let (sink, outcome) = run(&mut registry, &mut image);

        outcome.unwrap();
        assert!(sink.is_empty());
        assert_eq!(image.id.as_str(), Some("Image:0"));
        assert_eq!(image.pixels.id.as_str(), Some("Pixels:0"));
        assert_eq!(image.pixels.channels[0].id.as_str(), Some("Channel:0"));
    }

    #[test]
    fn invalid_literal_identity_is_repaired_with_a_warning() {
        let mut registry = IdRegistry::new();
        let mut image = bare_image();
        // "chan7" has no purely numeric trailing token, so the repair
        // cannot reuse a number and falls back to auto-assignment.
        image.pixels.channels[0].id = Id::from("chan7");

        let (sink, outcome) = run(&mut registry, &mut image);

        outcome.unwrap();
        assert_eq!(image.pixels.channels[0].id.as_str(), Some("Channel:0"));
        let diags: Vec<_> = sink.iter().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagCode::W0101);
        assert_eq!(diags[0].message, "Casting invalid ChannelID");
        assert_eq!(
            diags[0].path.as_ref().map(ToString::to_string),
            Some("images[0].pixels.channels[0]".to_owned())
        );
    }

    #[test]
    fn raw_reference_targets_are_checked_in_place() {
        let mut registry = IdRegistry::new();
        let mut image = bare_image();
        image.roi_refs.push(omx_model::Ref::to("roi four"));

        let (sink, outcome) = run(&mut registry, &mut image);

        outcome.unwrap();
        assert_eq!(sink.len(), 1);
        let slot = &image.roi_refs[0].slot;
        assert!(matches!(slot.state, RefState::Deferred(_)));
        assert_eq!(slot.target(), "roi four");
    }

    #[test]
    fn duplicate_identifier_surfaces_through_finish() {
        let mut registry = IdRegistry::new();
        registry.adopt(omx_ids::Lsid::from("Image:4"));
        let mut image = bare_image();
        image.id = Id::from("Image:4");

        let (_, outcome) = run(&mut registry, &mut image);

        let (source, path) = outcome.unwrap_err();
        assert_eq!(source.tag, Tag::Image);
        assert_eq!(source.id.as_str(), "Image:4");
        assert_eq!(path.to_string(), "images[0]");
    }
}
