//! Tests for state loading, initialization, and merging

use super::*;
use crate::catalog::{Catalog, Stream};
use crate::config::SourceConfig;
use crate::cursor;
use crate::error::Error;

fn source() -> SourceConfig {
    SourceConfig {
        host: "aws.connect.psdb.cloud".to_string(),
        username: "tap".to_string(),
        password: "secret".to_string(),
        database: "commerce".to_string(),
    }
}

fn catalog_with(names: &[&str]) -> Catalog {
    Catalog {
        kind: "CATALOG".to_string(),
        streams: names
            .iter()
            .map(|name| Stream {
                name: (*name).to_string(),
                ..Stream::default()
            })
            .collect(),
    }
}

fn serialized(position: &str) -> SerializedCursor {
    cursor::encode(&crate::upstream::TableCursor {
        shard: "-".to_string(),
        keyspace: "commerce".to_string(),
        position: position.to_string(),
        last_known_pk: None,
    })
}

#[test]
fn test_parse_bare_shape() {
    let sc = serialized("P1");
    let json = format!(
        r#"{{"bookmarks":{{"employees":{{"shards":{{"-":{{"cursor":"{}"}}}}}}}}}}"#,
        sc.cursor
    );

    let state = parse(json.as_bytes()).unwrap();
    assert_eq!(state.streams["employees"].shards["-"], sc);
}

#[test]
fn test_parse_wrapped_shape() {
    let sc = serialized("P1");
    let json = format!(
        r#"{{"type":"STATE","value":{{"bookmarks":{{"employees":{{"shards":{{"-":{{"cursor":"{}"}}}}}}}}}}}}"#,
        sc.cursor
    );

    let state = parse(json.as_bytes()).unwrap();
    assert_eq!(state.streams["employees"].shards["-"], sc);
}

#[test]
fn test_parse_empty_object_yields_empty_state() {
    let state = parse(b"{}").unwrap();
    assert!(state.streams.is_empty());
}

#[test]
fn test_parse_rejects_invalid_json() {
    let err = parse(b"not json").unwrap_err();
    assert!(matches!(err, Error::State { .. }));
}

#[test]
fn test_load_missing_file_is_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let state = load(&dir.path().join("missing.json")).unwrap();
    assert!(state.streams.is_empty());
}

#[test]
fn test_write_then_load_round_trips_bare_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::new();
    state.update("employees", "-", serialized("P5"));
    state.update("employees", "40-80", serialized("P9"));
    write(&path, &state).unwrap();

    // the written form is bare: no wrapping "type" key
    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert!(raw.get("bookmarks").is_some());
    assert!(raw.get("type").is_none());

    assert_eq!(load(&path).unwrap(), state);
}

#[test]
fn test_initialize_creates_empty_cursor_per_shard() {
    let catalog = catalog_with(&["employees", "customers"]);
    let shards = vec!["-80".to_string(), "80-".to_string()];

    let state = initialize(&source(), &catalog, &shards);
    assert_eq!(state.streams.len(), 2);
    for shard_states in state.streams.values() {
        assert_eq!(shard_states.shards.len(), 2);
        for (shard, sc) in &shard_states.shards {
            let tc = cursor::decode(sc).unwrap();
            assert_eq!(&tc.shard, shard);
            assert_eq!(tc.keyspace, "commerce");
            assert!(tc.position.is_empty());
        }
    }
}

#[test]
fn test_merge_prefers_loaded_entries() {
    let catalog = catalog_with(&["employees", "customers"]);
    let shards = vec!["-".to_string()];
    let initial = initialize(&source(), &catalog, &shards);

    let mut loaded = State::new();
    loaded.update("employees", "-", serialized("P7"));

    let merged = merge(loaded, &initial);
    assert_eq!(merged.streams["employees"].shards["-"], serialized("P7"));
    // newly selected stream inherits the initial empty cursor
    let tc = cursor::decode(&merged.streams["customers"].shards["-"]).unwrap();
    assert!(tc.position.is_empty());
}

#[test]
fn test_merge_retains_stale_streams() {
    let catalog = catalog_with(&["employees"]);
    let initial = initialize(&source(), &catalog, &["-".to_string()]);

    let mut loaded = State::new();
    loaded.update("departed", "-", serialized("P2"));

    let merged = merge(loaded, &initial);
    assert!(merged.streams.contains_key("departed"));
    assert!(merged.streams.contains_key("employees"));
}

#[test]
fn test_update_replaces_cursor() {
    let mut state = State::new();
    state.update("employees", "-", serialized("P1"));
    state.update("employees", "-", serialized("P2"));
    assert_eq!(state.streams["employees"].shards["-"], serialized("P2"));
}
