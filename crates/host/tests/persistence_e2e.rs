// Path: crates/host/tests/persistence_e2e.rs
//! Durable stores: reopen semantics, height continuity, and the checks
//! that gate an open.

mod common;

use common::{config_with_pages, LegacyV1, StubLogic, WRITER};
use pagevault_host::{load_config, StoreHost};
use pagevault_logic::PageHub;
use pagevault_storage::RedbState;
use pagevault_types::error::{CallError, ErrorCode, StateError};
use pagevault_types::{codec, keys};
use std::io::Write;
use std::sync::Arc;

fn temp_store() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("vault.redb").to_str().unwrap().to_string();
    (dir, file)
}

#[test]
fn a_reopened_store_keeps_its_pages_and_its_height() {
    let (_dir, state_file) = temp_store();
    let config = config_with_pages(&state_file, &[("home", "hello")]);

    {
        let mut host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();
        host.set_page(WRITER, "about", "us").unwrap();
        assert_eq!(host.height(), 2);
    }

    let host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();
    assert_eq!(host.height(), 2);
    assert_eq!(host.total_pages().unwrap(), 2);
    assert_eq!(host.all_page_ids().unwrap(), vec!["home", "about"]);
    assert_eq!(host.page("about").unwrap(), "us");
    assert_eq!(host.privileged_writer().unwrap(), WRITER);

    // The journal is an observer, not state: a fresh process starts empty.
    assert!(host.events().is_empty());
}

#[test]
fn markers_stay_monotone_across_restarts() {
    let (_dir, state_file) = temp_store();
    let config = config_with_pages(&state_file, &[]);

    {
        let mut host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();
        host.set_page(WRITER, "a", "1").unwrap();
    }
    let marker_first = {
        let mut host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();
        host.set_page(WRITER, "b", "2").unwrap();
        host.last_updated("b").unwrap()
    };

    // The second process continued the count instead of restarting it.
    assert_eq!(marker_first, 3);
}

#[test]
fn reopening_with_newer_logic_records_the_upgrade() {
    let (_dir, state_file) = temp_store();
    let config = config_with_pages(&state_file, &[("home", "v1 content")]);

    {
        let mut host = StoreHost::open_durable(&config, Arc::new(LegacyV1)).unwrap();
        host.set_page(WRITER, "shop", "wares").unwrap();
        assert_eq!(host.active_manifest().unwrap().version, "v1.0.0");
    }

    let host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();

    let manifest = host.active_manifest().unwrap();
    assert_eq!(manifest.version, "v2.0.0");
    assert_eq!(manifest.activated_at, 3);
    assert_eq!(host.height(), 3);

    // The upgrade was journaled like an explicit call would be.
    assert_eq!(host.events().len(), 1);
    assert_eq!(host.events()[0].event.name(), "LogicUpgraded");

    // Data written by the old build is untouched and now searchable.
    assert_eq!(host.page("home").unwrap(), "v1 content");
    assert_eq!(host.search_pages("ho").unwrap(), vec!["home", "shop"]);
}

#[test]
fn a_schema_mismatch_aborts_the_open() {
    let (_dir, state_file) = temp_store();
    let config = config_with_pages(&state_file, &[("home", "hello")]);

    StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();

    let err = StoreHost::open_durable(
        &config,
        Arc::new(StubLogic {
            version: "v9.0.0",
            schema: "v0",
        }),
    )
    .unwrap_err();
    assert_eq!(err.code(), "CALL_INVALID_ARGUMENT");
    assert!(err.to_string().contains("schema"));

    // The rejected open changed nothing.
    let host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();
    assert_eq!(host.page("home").unwrap(), "hello");
    assert_eq!(host.active_manifest().unwrap().version, "v2.0.0");
}

#[test]
fn a_corrupted_registry_fails_the_open() {
    let (_dir, state_file) = temp_store();
    let config = config_with_pages(&state_file, &[("home", "hello")]);

    StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();

    // Break the length counter behind the store's back.
    {
        let mut raw = RedbState::open(&state_file).unwrap();
        use pagevault_api::state::StateAccess;
        let wrong = codec::to_bytes_canonical(&42u64).unwrap();
        raw.insert(keys::REGISTRY_LEN_KEY, &wrong).unwrap();
    }

    let err = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap_err();
    assert!(matches!(
        err,
        CallError::State(StateError::Validation(_))
    ));
}

#[test]
fn a_store_can_be_opened_from_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("vault.redb").to_str().unwrap().to_string();

    let config_path = dir.path().join("store.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
state_file = "{}"

[genesis]
writer = "{}"

[[genesis.pages]]
id = "home"
content = "from the config file"
"#,
        state_file,
        hex::encode(WRITER.0)
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let host = StoreHost::open_durable(&config, Arc::new(PageHub)).unwrap();

    assert_eq!(host.page("home").unwrap(), "from the config file");
    assert_eq!(host.height(), 1);
}
