//! Mutation scenarios over a live document.
//!
//! Each operation must either land completely, with the new identities
//! indexed and every reference re-examined, or leave the document exactly
//! as it was. These tests check both halves, plus the numbering and
//! healing behavior that carries across operations.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use omx::records::{
    AnnotationAttrs, Channel, CommentAnnotation, Dataset, Image, Label, Pixels, Point, Roi,
    ShapeAttrs, ShapeValue,
};
use omx::{
    DiagCode, DimensionOrder, Document, Element, EntityView, FollowError, MutateError, PixelType,
    Ref, Tag,
};
use pretty_assertions::assert_eq;

fn pixels_el() -> Element {
    Element::new("Pixels")
        .with_field("dimension_order", "XYZCT")
        .with_field("kind", "uint8")
        .with_field("size_x", 4)
        .with_field("size_y", 4)
        .with_field("size_z", 1)
        .with_field("size_c", 1)
        .with_field("size_t", 1)
        .with_field("channels", Element::new("Channel"))
}

/// One object of each major kind, all auto-numbered: `Project:0`,
/// `Dataset:0`, `Image:0` (with `Pixels:0` and `Channel:0`), and `ROI:0`
/// holding `Shape:0`.
fn seed() -> Document {
    let el = Element::new("OME")
        .with_field("projects", Element::new("Project").with_field("name", "screening"))
        .with_field("datasets", Element::new("Dataset").with_field("name", "baseline"))
        .with_field("images", Element::new("Image").with_field("pixels", pixels_el()))
        .with_field(
            "rois",
            Element::new("ROI").with_field(
                "union",
                Element::new("Point").with_field("x", 0.0).with_field("y", 0.0),
            ),
        );
    Document::construct(el).unwrap()
}

fn bare_image() -> Image {
    let mut pixels = Pixels::new(DimensionOrder::Xyczt, PixelType::Uint8, [4, 4, 1, 1, 1]);
    pixels.channels.push(Channel::default());
    Image::new(pixels)
}

fn point(x: f64, y: f64) -> Point {
    Point {
        attrs: ShapeAttrs::default(),
        x,
        y,
    }
}

#[test]
fn insertion_numbers_continue_from_construction() {
    let mut doc = seed();

    let first = doc.add_image(bare_image()).unwrap();
    assert_eq!(first, "Image:1");
    let second = doc.add_image(bare_image()).unwrap();
    assert_eq!(second, "Image:2");

    assert!(doc.contains("Image:2"));
    assert_eq!(doc.get("Image:2").map(|view| view.tag()), Some(Tag::Image));
    // Nested identities number alongside the ones from construction.
    assert_eq!(doc.root().images[1].pixels.id.as_str(), Some("Pixels:1"));
    assert_eq!(
        doc.root().images[1].pixels.channels[0].id.as_str(),
        Some("Channel:1")
    );
}

#[test]
fn explicit_number_raises_the_floor_for_later_insertions() {
    let mut doc = seed();

    doc.add_dataset(Dataset {
        id: "Dataset:41".into(),
        ..Dataset::default()
    })
    .unwrap();
    let next = doc.add_dataset(Dataset::default()).unwrap();
    assert_eq!(next, "Dataset:42");
}

#[test]
fn rejected_insertion_leaves_the_document_unchanged() {
    let mut doc = seed();
    let before = doc.to_element();

    let err = doc
        .add_dataset(Dataset {
            id: "Dataset:0".into(),
            ..Dataset::default()
        })
        .unwrap_err();

    assert_eq!(err.code(), DiagCode::E0301);
    assert!(err.to_string().starts_with("mutation rejected"));
    match err {
        MutateError::DuplicateId { path, .. } => assert_eq!(path.to_string(), "datasets[1]"),
        other => panic!("expected a duplicate identifier, got {other:?}"),
    }

    assert_eq!(doc.to_element(), before);
    assert_eq!(doc.len(), 7);
    assert!(doc.diagnostics().is_empty());
}

#[test]
fn insertion_heals_matching_dangling_references() {
    let el = Element::new("OME").with_field(
        "projects",
        Element::new("Project").with_field("dataset_refs", "Dataset:5"),
    );
    let mut doc = Document::construct(el).unwrap();
    assert_eq!(doc.dangling().len(), 1);
    assert_eq!(doc.diagnostics().len(), 1);

    let id = doc
        .add_dataset(Dataset {
            id: "Dataset:5".into(),
            name: Some("arrived late".into()),
            ..Dataset::default()
        })
        .unwrap();
    assert_eq!(id, "Dataset:5");

    assert!(doc.dangling().is_empty());
    // The heal is silent: the site was already reported when it dangled.
    assert_eq!(doc.diagnostics().len(), 1);
    let reference = &doc.root().projects[0].dataset_refs[0];
    assert!(reference.is_linked());
    assert_eq!(doc.follow(reference).unwrap().name.as_deref(), Some("arrived late"));
}

#[test]
fn references_in_added_records_link_immediately() {
    let mut doc = seed();

    let id = doc
        .add_dataset(Dataset {
            image_refs: vec![Ref::to("Image:0")],
            ..Dataset::default()
        })
        .unwrap();
    assert_eq!(id, "Dataset:1");

    let dataset = &doc.root().datasets[1];
    assert!(dataset.image_refs[0].is_linked());
    let sites: Vec<_> = doc.referrers("Image:0").iter().map(ToString::to_string).collect();
    assert_eq!(sites, ["datasets[1].image_refs[0]"]);
}

#[test]
fn invalid_identifier_in_added_record_is_repaired() {
    let mut doc = seed();

    let id = doc
        .add_roi(Roi {
            id: "region of note".into(),
            ..Roi::default()
        })
        .unwrap();
    assert_eq!(id, "ROI:1");

    let warning = doc.diagnostics().iter().last().unwrap();
    assert_eq!(warning.code, DiagCode::W0101);
    assert_eq!(warning.message, "Casting invalid ROIID");
    assert_eq!(
        warning.path.as_ref().map(ToString::to_string),
        Some("rois[1]".to_owned())
    );
}

#[test]
fn appended_shapes_join_the_union_and_the_index() {
    let mut doc = seed();

    let id = doc.append_shape("ROI:0", point(3.0, 4.0)).unwrap();
    assert_eq!(id, "Shape:1");
    assert_eq!(doc.root().rois[0].union.len(), 2);
    assert_eq!(doc.get("Shape:1").map(|view| view.tag()), Some(Tag::Shape));
}

#[test]
fn explicit_shape_number_raises_the_union_floor() {
    let mut doc = seed();

    let explicit = doc
        .append_shape(
            "ROI:0",
            Point {
                attrs: ShapeAttrs {
                    id: "Shape:9".into(),
                    ..ShapeAttrs::default()
                },
                x: 0.0,
                y: 0.0,
            },
        )
        .unwrap();
    assert_eq!(explicit, "Shape:9");

    let auto = doc.append_shape("ROI:0", point(0.0, 0.0)).unwrap();
    assert_eq!(auto, "Shape:10");
}

#[test]
fn shape_events_decode_like_construction() {
    let mut doc = seed();

    let el = Element::new("Shape")
        .with_field("kind", "label")
        .with_field("x", 2.0)
        .with_field("y", 8.0)
        .with_field("text", "lesion");
    let id = doc.append_shape_element("ROI:0", el).unwrap();
    assert_eq!(id, "Shape:1");

    match doc.root().rois[0].union.get(1) {
        Some(ShapeValue::Label(label)) => {
            assert_eq!(label.attrs.text.as_deref(), Some("lesion"));
        }
        other => panic!("expected a label, got {other:?}"),
    }
}

#[test]
fn shape_event_with_unknown_kind_is_refused_atomically() {
    let mut doc = seed();
    let before = doc.to_element();

    let el = Element::new("Shape").with_field("kind", "blob").with_field("x", 0.0);
    let err = doc.append_shape_element("ROI:0", el).unwrap_err();

    assert_eq!(err.code(), DiagCode::E0301);
    assert!(matches!(err, MutateError::Build { .. }));
    assert_eq!(doc.root().rois[0].union.len(), 1);
    assert_eq!(doc.to_element(), before);
}

#[test]
fn shape_operations_check_the_target_roi() {
    let mut doc = seed();

    match doc.append_shape("ROI:9", point(0.0, 0.0)) {
        Err(MutateError::UnknownTarget { id }) => assert_eq!(id, "ROI:9"),
        other => panic!("expected an unknown target, got {other:?}"),
    }
    // A known identifier of the wrong kind is no better.
    assert!(matches!(
        doc.append_shape("Image:0", point(0.0, 0.0)),
        Err(MutateError::UnknownTarget { .. })
    ));
}

#[test]
fn annotations_append_to_the_root_list() {
    let mut doc = seed();

    let id = doc
        .add_annotation(CommentAnnotation {
            attrs: AnnotationAttrs::default(),
            value: "checked focus by hand".into(),
        })
        .unwrap();
    assert_eq!(id, "Annotation:0");
    assert_eq!(doc.root().structured_annotations.len(), 1);
    assert_eq!(
        doc.get("Annotation:0").map(|view| view.tag()),
        Some(Tag::Annotation)
    );

    let second = doc
        .add_annotation(CommentAnnotation {
            attrs: AnnotationAttrs::default(),
            value: "re-exported".into(),
        })
        .unwrap();
    assert_eq!(second, "Annotation:1");
}

#[test]
fn content_edits_keep_the_index_live() {
    let mut doc = seed();

    doc.root_mut().images[0].name = Some("renamed in place".into());
    match doc.get("Image:0") {
        Some(EntityView::Image(image)) => {
            assert_eq!(image.name.as_deref(), Some("renamed in place"));
        }
        other => panic!("expected an image view, got {other:?}"),
    }
}

#[test]
fn structural_surgery_outside_the_operations_goes_stale() {
    let mut doc = seed();
    let handle = doc.handle::<Image>("Image:0").unwrap();

    doc.root_mut().images.clear();

    assert!(doc.get("Image:0").is_none());
    match doc.deref(&handle) {
        Err(FollowError::Stale { id }) => assert_eq!(id, "Image:0"),
        other => panic!("expected a stale handle, got {other:?}"),
    }
}

#[test]
fn union_removal_by_identifier_preserves_order() {
    let mut doc = seed();
    doc.append_shape("ROI:0", point(1.0, 1.0)).unwrap();
    doc.append_shape(
        "ROI:0",
        Label {
            attrs: ShapeAttrs::default(),
            x: 2.0,
            y: 2.0,
        },
    )
    .unwrap();

    let union = &mut doc.root_mut().rois[0].union;
    let removed = union.remove_by_id("Shape:1").unwrap();
    assert_eq!(removed.attrs().id.as_str(), Some("Shape:1"));
    assert!(union.remove_by_id("Shape:9").is_none());

    let ids: Vec<_> = union.iter().map(|s| s.attrs().id.as_str().unwrap()).collect();
    assert_eq!(ids, ["Shape:0", "Shape:2"]);
}
