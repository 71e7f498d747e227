//! Handlers run against a temporary library; none of these reach the network.

use crate::cli::commands::{run_download, run_playlist};
use dypl_core::config::DyplConfig;
use dypl_core::library::LibraryLayout;
use std::fs;

#[test]
fn playlist_on_empty_library() {
    let dir = tempfile::tempdir().unwrap();
    run_playlist(&LibraryLayout::new(dir.path())).unwrap();
    assert!(!dir.path().join("playlist.json").exists());
}

#[test]
fn playlist_lists_existing_entries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("playlist.json"),
        r#"[{"type":"video","src":"MP4/A-My Clip.mp4","title":"My Clip","artist":"A","albumArt":"albumArt/A-My Clip.jpg","lyrics":""}]"#,
    )
    .unwrap();
    run_playlist(&LibraryLayout::new(dir.path())).unwrap();
}

#[test]
fn playlist_tolerates_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("playlist.json"), "{ not json").unwrap();
    run_playlist(&LibraryLayout::new(dir.path())).unwrap();
    // Listing never rewrites the file.
    assert_eq!(
        fs::read_to_string(dir.path().join("playlist.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn download_rejects_missing_details_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_download(
        &DyplConfig::default(),
        LibraryLayout::new(dir.path()),
        &dir.path().join("absent.json"),
        None,
        None,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("failed to read"));
    assert!(!dir.path().join("MP4").exists());
}

#[test]
fn download_rejects_malformed_details_file() {
    let dir = tempfile::tempdir().unwrap();
    let details = dir.path().join("item.json");
    fs::write(&details, r#"{"author": "A"}"#).unwrap();
    let err = run_download(
        &DyplConfig::default(),
        LibraryLayout::new(dir.path()),
        &details,
        Some("B".into()),
        None,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("is not a saved parse result"));
    assert!(!dir.path().join("MP4").exists());
    assert!(!dir.path().join("playlist.json").exists());
}
