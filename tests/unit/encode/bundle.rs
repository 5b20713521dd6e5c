use super::*;
use crate::foundation::core::Canvas;
use crate::synth::SynthParams;
use chrono::TimeZone as _;
use std::io::Read as _;

fn metadata() -> AnimationMetadata {
    AnimationMetadata::build(
        "fox",
        Canvas::new(32, 32).unwrap(),
        &[],
        &SynthParams {
            points_per_frame: 2,
            pause_ms: 100,
            hold_ms: 500,
            frame_interval_ms: 100,
        },
        6,
        chrono::Utc.with_ymd_and_hms(2026, 5, 5, 5, 5, 5).unwrap(),
    )
}

#[test]
fn bundle_contains_exactly_gif_and_metadata() {
    let gif = b"GIF89a-not-really".to_vec();
    let bytes = package_bundle(Some(gif.as_slice()), &metadata(), "fox").unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    assert_eq!(names, vec!["fox.gif", "fox_metadata.json"]);

    let mut stored = Vec::new();
    archive
        .by_name("fox.gif")
        .unwrap()
        .read_to_end(&mut stored)
        .unwrap();
    assert_eq!(stored, gif);

    let mut json = String::new();
    archive
        .by_name("fox_metadata.json")
        .unwrap()
        .read_to_string(&mut json)
        .unwrap();
    assert!(json.contains("\n  \"character\": \"fox\""));
    let back: AnimationMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(back, metadata());
}

#[test]
fn missing_export_is_a_precondition_failure() {
    let err = package_bundle(None, &metadata(), "fox").unwrap_err();
    assert!(matches!(err, SketchError::Precondition(_)));
    assert_eq!(err.user_message(), "Please generate a GIF first");
}

#[test]
fn base_name_must_be_a_plain_stem() {
    let gif = [0u8; 4];
    assert!(package_bundle(Some(gif.as_slice()), &metadata(), "").is_err());
    assert!(package_bundle(Some(gif.as_slice()), &metadata(), "../evil").is_err());
    assert!(package_bundle(Some(gif.as_slice()), &metadata(), "a\\b").is_err());
}

#[test]
fn entry_names_follow_the_base_name() {
    assert_eq!(
        entry_names("walk_cycle"),
        (
            "walk_cycle.gif".to_owned(),
            "walk_cycle_metadata.json".to_owned()
        )
    );
}
