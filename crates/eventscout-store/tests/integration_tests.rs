//! Integration tests for the master store file format
//!
//! These use master files laid out exactly as earlier tooling wrote them
//! (two-space indent, no ASCII escaping) to check that loading and rewriting
//! keeps existing content intact.

use eventscout_domain::{AnalysisRecord, EventEntry, NoEventRecord, NOT_AVAILABLE};
use eventscout_store::{MasterStore, StoreError};
use std::fs;
use tempfile::TempDir;

const EXISTING_MASTER: &str = r#"{
  "pdf_analyses": [
    {
      "processed_at": "2025-11-20T10:00:00.123456",
      "pdf_file": "AUTOSAR_SWS_CryptoDriver.pdf",
      "num_events": 1,
      "events": [
        {
          "Specification section": "SWS_CryptoDriver",
          "System event": "Schlüsselexport abgelehnt",
          "Suggested log": "keyId, jobId",
          "Rationale": "Detects key extraction attempts"
        }
      ]
    },
    {
      "processed_at": "2025-11-20T10:05:00.654321",
      "pdf_file": "AUTOSAR_SWS_Dem.pdf",
      "num_events": 1,
      "events": [
        {
          "status": "no_events",
          "explanation": "Existing events already cover this module."
        }
      ]
    }
  ]
}"#;

fn seeded_store(dir: &TempDir) -> MasterStore {
    let path = dir.path().join("autosar_security_events.json");
    fs::write(&path, EXISTING_MASTER).unwrap();
    MasterStore::new(path)
}

#[test]
fn test_loads_existing_master_file() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].document_name, "AUTOSAR_SWS_CryptoDriver.pdf");
    assert_eq!(records[0].event_count, 1);
    match &records[0].events[0] {
        EventEntry::Event(event) => {
            assert_eq!(event.system_event(), "Schlüsselexport abgelehnt");
            assert_eq!(event.specification_section(), Some("SWS_CryptoDriver"));
        }
        other => panic!("Expected event, got {:?}", other),
    }
    assert!(records[1].is_no_events());
}

#[test]
fn test_rewrite_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let records = store.load().unwrap();
    store.write_all(records).unwrap();

    assert_eq!(fs::read_to_string(store.path()).unwrap(), EXISTING_MASTER);
}

#[test]
fn test_append_keeps_existing_records() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let total = store
        .append(AnalysisRecord::new(
            "AUTOSAR_SWS_SecOC.pdf",
            vec![NoEventRecord::new("covered").into()],
        ))
        .unwrap();
    assert_eq!(total, 3);

    let contents = fs::read_to_string(store.path()).unwrap();
    assert!(contents.starts_with(&EXISTING_MASTER[..EXISTING_MASTER.len() - 6]));
    assert!(contents.contains("\"pdf_file\": \"AUTOSAR_SWS_SecOC.pdf\""));
}

#[test]
fn test_idempotent_contains_after_append() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    assert!(store.contains("AUTOSAR_SWS_Dem.pdf").unwrap());
    assert!(store.contains("Dem.pdf").unwrap());
    assert!(!store.contains("AUTOSAR_SWS_SecOC.pdf").unwrap());
}

#[test]
fn test_partial_event_fields_read_as_sentinel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("master.json");
    fs::write(
        &path,
        r#"{"pdf_analyses": [{"processed_at": "t", "pdf_file": "x.pdf", "num_events": 1,
            "events": [{"System event": "Only the name"}]}]}"#,
    )
    .unwrap();

    let records = MasterStore::new(&path).load().unwrap();
    match &records[0].events[0] {
        EventEntry::Event(event) => {
            assert_eq!(event.system_event(), "Only the name");
            assert_eq!(event.rationale(), NOT_AVAILABLE);
        }
        other => panic!("Expected event, got {:?}", other),
    }
}

#[test]
fn test_append_leaves_earlier_records_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("master.json");
    let earlier = r#"{"processed_at":"2025-11-02T09:00:00","pdf_file":"a.pdf","num_events":1,"events":[{"Suggested log":"keyId","System event":"Key export","Severity":7}]}"#;
    fs::write(
        &path,
        format!(r#"{{"pdf_analyses":[{earlier}],"generator":"older tooling"}}"#),
    )
    .unwrap();
    let store = MasterStore::new(&path);

    store
        .append(AnalysisRecord::new("b.pdf", vec![NoEventRecord::new("none").into()]))
        .unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(serde_json::to_string(&document["pdf_analyses"][0]).unwrap(), earlier);
    assert_eq!(document["pdf_analyses"][1]["pdf_file"], "b.pdf");
    assert_eq!(document["generator"], "older tooling");
}

#[test]
fn test_missing_collection_key_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("master.json");
    fs::write(&path, r#"{"analyses": []}"#).unwrap();

    let result = MasterStore::new(&path).load();
    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}
