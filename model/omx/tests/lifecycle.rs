//! End-to-end construction scenarios.
//!
//! These tests drive the public [`Document`] surface the way a reading
//! application would: build an event tree, construct, then look objects up
//! by identifier, follow references, and serialize the graph back out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use omx::records::{Image, Roi};
use omx::{DiagCode, Document, Element, EntityView, FollowError, Tag, Value};
use pretty_assertions::assert_eq;

fn pixels_el() -> Element {
    Element::new("Pixels")
        .with_field("dimension_order", "XYZCT")
        .with_field("kind", "uint16")
        .with_field("size_x", 64)
        .with_field("size_y", 64)
        .with_field("size_z", 1)
        .with_field("size_c", 2)
        .with_field("size_t", 1)
        .with_field(
            "channels",
            Value::List(vec![
                Element::new("Channel").with_field("name", "DAPI").into(),
                Element::new("Channel").with_field("name", "GFP").into(),
            ]),
        )
}

/// A small but complete study: one project over two datasets, one image
/// with two channels, and one region of interest with two shapes. Every
/// reference points forward or backward across the containers.
fn study_el() -> Element {
    Element::new("OME")
        .with_field(
            "projects",
            Element::new("Project")
                .with_field("name", "retina mapping")
                .with_field(
                    "dataset_refs",
                    Value::List(vec!["Dataset:0".into(), "Dataset:1".into()]),
                ),
        )
        .with_field(
            "datasets",
            Value::List(vec![
                Element::new("Dataset")
                    .with_field("name", "week 1")
                    .with_field("image_refs", "Image:0")
                    .into(),
                Element::new("Dataset").with_field("name", "week 2").into(),
            ]),
        )
        .with_field(
            "images",
            Element::new("Image")
                .with_field("name", "slide 4")
                .with_field("pixels", pixels_el())
                .with_field("roi_refs", "ROI:0"),
        )
        .with_field(
            "rois",
            Element::new("ROI").with_field(
                "union",
                Value::List(vec![
                    Element::new("Label").with_field("x", 4.0).with_field("y", 5.0).into(),
                    Element::new("Point").with_field("x", 1.0).with_field("y", 2.0).into(),
                ]),
            ),
        )
}

#[test]
fn construct_links_forward_references() {
    let doc = Document::construct(study_el()).unwrap();

    assert!(doc.diagnostics().is_empty());
    assert!(doc.dangling().is_empty());
    let project = &doc.root().projects[0];
    assert!(project.dataset_refs.iter().all(|r| r.is_linked()));

    let dataset = doc.follow(&project.dataset_refs[0]).unwrap();
    assert_eq!(dataset.name.as_deref(), Some("week 1"));
    let image = doc.follow(&dataset.image_refs[0]).unwrap();
    assert_eq!(image.name.as_deref(), Some("slide 4"));
}

#[test]
fn object_count_covers_every_identity() {
    let doc = Document::construct(study_el()).unwrap();
    // 1 project, 2 datasets, image + pixels + 2 channels, roi + 2 shapes.
    assert_eq!(doc.len(), 10);
    assert!(!doc.is_empty());
    assert!(doc.contains("Channel:1"));
    assert!(doc.contains("Shape:0"));

    let empty = Document::construct(Element::new("OME")).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.len(), 0);
}

#[test]
fn non_document_root_is_rejected() {
    let err = Document::construct(Element::new("Image")).unwrap_err();
    assert_eq!(err.code(), DiagCode::E0102);
    assert!(err.to_string().contains("expected `OME`"));
}

#[test]
fn duplicate_identifier_aborts_construction() {
    let el = Element::new("OME").with_field(
        "datasets",
        Value::List(vec![
            Element::new("Dataset").with_field("id", "Dataset:3").into(),
            Element::new("Dataset").with_field("id", "Dataset:3").into(),
        ]),
    );
    let err = Document::construct(el).unwrap_err();
    assert_eq!(err.code(), DiagCode::E0101);
    assert!(err.to_string().contains("Dataset:3"));
}

#[test]
fn dangling_reference_is_recoverable() {
    let el = Element::new("OME").with_field(
        "projects",
        Element::new("Project").with_field("dataset_refs", "Dataset:9"),
    );
    let doc = Document::construct(el).unwrap();

    assert_eq!(doc.dangling().len(), 1);
    let site = &doc.dangling()[0];
    assert_eq!(site.expected, Tag::Dataset);
    assert_eq!(site.target, "Dataset:9");
    assert_eq!(site.path.to_string(), "projects[0].dataset_refs[0]");

    let warning = doc.diagnostics().iter().next().unwrap();
    assert_eq!(warning.code, DiagCode::W0201);
    assert!(!warning.is_error());

    let reference = &doc.root().projects[0].dataset_refs[0];
    assert!(!reference.is_linked());
    match doc.follow(reference) {
        Err(FollowError::Unresolved { target }) => assert_eq!(target, "Dataset:9"),
        other => panic!("expected an unresolved follow, got {other:?}"),
    }
}

#[test]
fn invalid_identity_is_repaired_and_reachable() {
    let el = Element::new("OME")
        .with_field(
            "images",
            Element::new("Image")
                .with_field("pixels", pixels_el())
                .with_field("roi_refs", "NotAPattern"),
        )
        .with_field("rois", Element::new("ROI").with_field("id", "NotAPattern"));
    let doc = Document::construct(el).unwrap();

    assert!(doc.contains("ROI:0"));
    assert!(!doc.contains("NotAPattern"));

    // The reference was written with the same invalid spelling, so it
    // links to the repaired identity through the session's cast record.
    let reference = &doc.root().images[0].roi_refs[0];
    assert!(reference.is_linked());
    let roi = doc.follow(reference).unwrap();
    assert_eq!(roi.id.as_str(), Some("ROI:0"));

    let messages: Vec<_> = doc.diagnostics().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["Casting invalid ROIID", "Casting invalid ROIID"]);
}

#[test]
fn repaired_identity_reachable_after_the_memo_is_written() {
    // The annotation decodes before the region of interest, so here the
    // repair happens first and the reference is checked afterwards.
    let el = Element::new("OME")
        .with_field(
            "structured_annotations",
            Element::new("CommentAnnotation")
                .with_field("id", "note one")
                .with_field("value", "focus drift on edge tiles"),
        )
        .with_field(
            "rois",
            Element::new("ROI").with_field("annotation_refs", "note one"),
        );
    let doc = Document::construct(el).unwrap();

    let reference = &doc.root().rois[0].annotation_refs[0];
    assert!(reference.is_linked());
    assert_eq!(reference.lsid().unwrap(), "Annotation:0");
}

#[test]
fn namespaced_identifier_passes_and_ratchets_numbering() {
    let el = Element::new("OME").with_field(
        "images",
        Value::List(vec![
            Element::new("Image")
                .with_field("id", "urn:lsid:example.org:Image:7")
                .with_field("pixels", pixels_el())
                .into(),
            Element::new("Image").with_field("pixels", pixels_el()).into(),
        ]),
    );
    let doc = Document::construct(el).unwrap();

    assert!(doc.diagnostics().is_empty());
    assert!(doc.contains("urn:lsid:example.org:Image:7"));
    assert_eq!(doc.root().images[1].id.as_str(), Some("Image:8"));
}

#[test]
fn deprecated_field_name_reads_through_with_warning() {
    let el = Element::new("OME")
        .with_field(
            "projects",
            Element::new("Project").with_field("dataset_ref", "Dataset:0"),
        )
        .with_field("datasets", Element::new("Dataset"));
    let doc = Document::construct(el).unwrap();

    let warning = doc.diagnostics().iter().next().unwrap();
    assert_eq!(warning.code, DiagCode::W0102);
    assert!(warning.message.contains("dataset_ref"));
    assert!(doc.root().projects[0].dataset_refs[0].is_linked());

    // Serialization always writes the current name.
    let out = doc.to_element();
    let project = out.field("projects").unwrap().as_element().unwrap();
    assert!(project.has_field("dataset_refs"));
    assert!(!project.has_field("dataset_ref"));
}

#[test]
fn unknown_field_warns_and_is_dropped() {
    let el = Element::new("OME").with_field(
        "images",
        Element::new("Image")
            .with_field("pixels", pixels_el())
            .with_field("colour_space", "sRGB"),
    );
    let doc = Document::construct(el).unwrap();

    let warning = doc.diagnostics().iter().next().unwrap();
    assert_eq!(warning.code, DiagCode::W0103);
    assert!(warning.message.contains("`colour_space`"));
    assert_eq!(
        warning.path.as_ref().map(ToString::to_string),
        Some("images[0]".to_owned())
    );

    let out = doc.to_element();
    let image = out.field("images").unwrap().as_element().unwrap();
    assert!(!image.has_field("colour_space"));
}

#[test]
fn serialized_form_reconstructs_without_new_diagnostics() {
    let el = Element::new("OME")
        .with_field(
            "images",
            Element::new("Image")
                .with_field("pixels", pixels_el())
                .with_field("magnification_stage", 3)
                .with_field("roi_refs", "region one"),
        )
        .with_field("rois", Element::new("ROI").with_field("id", "region one"));
    let first = Document::construct(el).unwrap();

    let count = |code: DiagCode| first.diagnostics().iter().filter(|d| d.code == code).count();
    assert_eq!(count(DiagCode::W0101), 2);
    assert_eq!(count(DiagCode::W0103), 1);
    assert!(first.root().images[0].roi_refs[0].is_linked());

    // Serialization writes repaired identifiers and drops unknown fields,
    // so a second pass over the output is clean and changes nothing.
    let second = Document::construct(first.to_element()).unwrap();
    assert!(second.diagnostics().is_empty());
    assert_eq!(second.to_element(), first.to_element());
}

#[test]
fn json_payload_constructs_and_round_trips() {
    let payload = r#"{
        "name": "OME",
        "fields": {
            "projects": {
                "name": "Project",
                "fields": { "name": "screening", "dataset_refs": ["Dataset:0"] }
            },
            "datasets": { "name": "Dataset", "fields": { "name": "baseline" } }
        }
    }"#;
    let el: Element = serde_json::from_str(payload).unwrap();
    let doc = Document::construct(el).unwrap();

    assert!(doc.diagnostics().is_empty());
    let dataset = doc.follow(&doc.root().projects[0].dataset_refs[0]).unwrap();
    assert_eq!(dataset.name.as_deref(), Some("baseline"));

    let json = serde_json::to_string(&doc.to_element()).unwrap();
    let back: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc.to_element());
}

#[test]
fn typed_handles_check_the_tag() {
    let doc = Document::construct(study_el()).unwrap();

    let handle = doc.handle::<Image>("Image:0").unwrap();
    assert_eq!(handle.tag(), Tag::Image);
    let image = doc.deref(&handle).unwrap();
    assert_eq!(image.name.as_deref(), Some("slide 4"));

    assert!(doc.handle::<Roi>("Image:0").is_none());
    assert!(doc.handle::<Image>("Image:5").is_none());
}

#[test]
fn entity_views_cover_nested_identities() {
    let doc = Document::construct(study_el()).unwrap();

    match doc.get("Channel:0") {
        Some(EntityView::Channel(channel)) => assert_eq!(channel.name.as_deref(), Some("DAPI")),
        other => panic!("expected a channel view, got {other:?}"),
    }
    assert_eq!(doc.get("Shape:1").map(|view| view.tag()), Some(Tag::Shape));
    assert_eq!(doc.get("Pixels:0").map(|view| view.tag()), Some(Tag::Pixels));
    assert!(doc.get("Well:0").is_none());
}

#[test]
fn referrer_lookup_lists_linked_sites() {
    let doc = Document::construct(study_el()).unwrap();

    let sites: Vec<_> = doc.referrers("Dataset:0").iter().map(ToString::to_string).collect();
    assert_eq!(sites, ["projects[0].dataset_refs[0]"]);

    let sites: Vec<_> = doc.referrers("Image:0").iter().map(ToString::to_string).collect();
    assert_eq!(sites, ["datasets[0].image_refs[0]"]);

    assert!(doc.referrers("Dataset:9").is_empty());
}
