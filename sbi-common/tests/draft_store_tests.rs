//! Filesystem draft store tests

mod helpers;

use chrono::{Local, TimeZone};
use helpers::{disqualified, SessionBuilder};
use sbi_common::drafts::{DraftStore, FsDraftStore};
use sbi_common::Error;

fn at(hour: u32, minute: u32, second: u32) -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 5, 1, hour, minute, second)
        .single()
        .unwrap()
}

fn sample_session() -> sbi_common::InterviewSession {
    SessionBuilder::new()
        .candidate("Jordan Lee", "2024-05-01", "North Long Beach", "infant")
        .current_index(2)
        .score("t1", 4)
        .input("t2", disqualified(2, "Said \"they'll be fine alone\""))
        .build()
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path().join("drafts"));
    let session = sample_session();

    let path = store.save_at(&session, &at(9, 30, 0)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "draft-20240501-093000-Jordan Lee.json"
    );

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded, session);
}

#[test]
fn test_resave_after_load_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path());

    let first = store.save_at(&sample_session(), &at(9, 30, 0)).unwrap();
    let loaded = store.load(&first).unwrap();
    let second = store.save_at(&loaded, &at(9, 45, 0)).unwrap();

    assert_ne!(first, second);
    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_same_second_saves_get_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path());
    let session = sample_session();

    let a = store.save_at(&session, &at(10, 0, 0)).unwrap();
    let b = store.save_at(&session, &at(10, 0, 0)).unwrap();
    let c = store.save_at(&session, &at(10, 0, 0)).unwrap();

    assert!(a.ends_with("draft-20240501-100000-Jordan Lee.json"));
    assert!(b.ends_with("draft-20240501-100000-Jordan Lee-2.json"));
    assert!(c.ends_with("draft-20240501-100000-Jordan Lee-3.json"));
}

#[test]
fn test_unsafe_names_are_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path());

    let named = SessionBuilder::new()
        .candidate("A/B: C", "2024-05-01", "Palmdale", "infant")
        .build();
    let path = store.save_at(&named, &at(8, 0, 0)).unwrap();
    assert!(path.ends_with("draft-20240501-080000-A_B_ C.json"));

    let unnamed = SessionBuilder::new().build();
    let path = store.save_at(&unnamed, &at(8, 0, 0)).unwrap();
    assert!(path.ends_with("draft-20240501-080000-Unknown.json"));
}

#[test]
fn test_list_returns_sorted_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path());
    let session = sample_session();

    let later = store.save_at(&session, &at(11, 0, 0)).unwrap();
    let earlier = store.save_at(&session, &at(9, 0, 0)).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a draft").unwrap();

    assert_eq!(store.list().unwrap(), vec![earlier, later]);
}

#[test]
fn test_list_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsDraftStore::new(dir.path().join("never-created"));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_malformed_draft_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft-broken.json");
    std::fs::write(&path, "{\"candidate\": ").unwrap();

    let store = FsDraftStore::new(dir.path());
    match store.load(&path) {
        Err(Error::Persistence { path: p, reason }) => {
            assert_eq!(p, path);
            assert!(reason.starts_with("invalid draft"));
        }
        other => panic!("expected persistence error, got {:?}", other),
    }
}

#[test]
fn test_partial_draft_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft-partial.json");
    std::fs::write(&path, r#"{"candidate": {"name": "Sam"}}"#).unwrap();

    let session = FsDraftStore::new(dir.path()).load(&path).unwrap();
    assert_eq!(session.candidate.name, "Sam");
    assert_eq!(session.current_index, 0);
    assert!(session.trait_inputs.is_empty());
}
