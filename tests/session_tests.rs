//! Tests for Session
//!
//! These tests verify:
//! - Create writes an empty header immediately
//! - Save/open round trips
//! - Fail-fast: errors close the session
//! - Corrupt and truncated files are rejected
//! - Autosave and dirty tracking
//! - Command execution

use std::fs;
use std::path::PathBuf;

use slotdb::codec::{FileHeader, FILE_HEADER_SIZE, ROW_HEADER_SIZE};
use slotdb::{
    Command, Config, FieldPolicy, OpenMode, Record, Reply, Session, SessionState, SlotDbError,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.db");
    (temp_dir, path)
}

fn small_config() -> Config {
    Config::builder()
        .max_data(32)
        .max_rows(10)
        .sync_on_save(false)
        .build()
}

fn create_session() -> (TempDir, PathBuf, Session) {
    let (temp, path) = setup_temp_path();
    let session = Session::create(&path, small_config()).unwrap();
    (temp, path, session)
}

fn records(session: &Session) -> Vec<Record> {
    session.list().unwrap().cloned().collect()
}

// =============================================================================
// Create / Open Tests
// =============================================================================

#[test]
fn test_create_writes_header() {
    let (_temp, path, session) = create_session();

    assert_eq!(session.state(), SessionState::Ready);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), FILE_HEADER_SIZE);

    let header = FileHeader::decode(&mut bytes.as_slice()).unwrap();
    assert_eq!(
        header,
        FileHeader {
            max_data: 32,
            max_rows: 10,
            current_rows: 0
        }
    );
}

#[test]
fn test_create_invalid_capacity_leaves_file_alone() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, b"keep me").unwrap();

    let config = Config::builder().max_data(0).max_rows(10).build();
    let result = Session::create(&path, config);

    assert!(matches!(result, Err(SlotDbError::InvalidCapacity(_))));
    assert_eq!(fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn test_create_truncates_existing() {
    let (_temp, path, mut session) = create_session();
    session.set(1, "old", "old@x").unwrap();
    session.close().unwrap();

    let session = Session::create(&path, small_config()).unwrap();

    assert_eq!(session.store().unwrap().current_rows(), 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), FILE_HEADER_SIZE as u64);
}

#[test]
fn test_open_missing_file() {
    let (_temp, path) = setup_temp_path();

    let result = Session::open(&path, Config::default());

    assert!(matches!(result, Err(SlotDbError::Io(_))));
}

#[test]
fn test_open_uses_file_capacity() {
    let (_temp, path, mut session) = create_session();
    session.close().unwrap();

    // Config capacity is ignored for existing files
    let config = Config::builder().max_data(999).max_rows(999).build();
    let session = Session::open(&path, config).unwrap();

    let store = session.store().unwrap();
    assert_eq!(store.max_data(), 32);
    assert_eq!(store.max_rows(), 10);
}

#[test]
fn test_open_with_mode() {
    let (_temp, path) = setup_temp_path();

    let mut created = Session::open_with_mode(&path, OpenMode::Create, small_config()).unwrap();
    created.set(2, "two", "2@x").unwrap();
    created.close().unwrap();

    let mut opened = Session::open_with_mode(&path, OpenMode::Existing, small_config()).unwrap();
    assert_eq!(opened.get(2).unwrap().unwrap().name(), "two");
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip() {
    let (_temp, path, mut session) = create_session();
    session.set(0, "zero", "0@x").unwrap();
    session.set(4, "", "").unwrap();
    session.set(9, "nine", "9@x").unwrap();
    let before = records(&session);
    session.close().unwrap();

    let session = Session::open(&path, small_config()).unwrap();

    assert_eq!(records(&session), before);
    assert_eq!(session.store().unwrap().current_rows(), 3);
}

#[test]
fn test_round_trip_full_table() {
    let (_temp, path, mut session) = create_session();
    for id in 0..10 {
        session
            .set(id, &format!("name{}", id), &format!("user{}@example.com", id))
            .unwrap();
    }
    session.close().unwrap();

    let mut session = Session::open(&path, small_config()).unwrap();

    assert_eq!(session.store().unwrap().current_rows(), 10);
    for id in 0..10 {
        let record = session.get(id).unwrap().unwrap();
        assert_eq!(record.name(), format!("name{}", id));
        assert_eq!(record.email(), format!("user{}@example.com", id));
    }
}

#[test]
fn test_file_is_sparse() {
    let (_temp, path, mut session) = create_session();
    session.set(7, "ab", "cde").unwrap();

    let len = fs::metadata(&path).unwrap().len() as usize;

    assert_eq!(len, FILE_HEADER_SIZE + ROW_HEADER_SIZE + 2 + 3);
}

#[test]
fn test_save_shrinks_file_after_delete() {
    let (_temp, path, mut session) = create_session();
    session.set(1, "a long name", "a long email").unwrap();
    session.set(2, "b", "b").unwrap();

    session.delete(1).unwrap();

    let len = fs::metadata(&path).unwrap().len() as usize;
    assert_eq!(len, FILE_HEADER_SIZE + ROW_HEADER_SIZE + 2);

    session.close().unwrap();
    let mut session = Session::open(&path, small_config()).unwrap();
    assert!(session.get(1).unwrap().is_none());
    assert_eq!(session.get(2).unwrap().unwrap().name(), "b");
}

// =============================================================================
// Fail-Fast Tests
// =============================================================================

#[test]
fn test_out_of_range_closes_session() {
    let (_temp, _path, mut session) = create_session();

    let result = session.get(10);

    assert!(matches!(result, Err(SlotDbError::OutOfRange { .. })));
    assert!(session.is_closed());
    assert!(matches!(session.get(0), Err(SlotDbError::SessionClosed)));
    assert!(matches!(session.list(), Err(SlotDbError::SessionClosed)));
}

#[test]
fn test_slot_occupied_closes_session_and_keeps_first() {
    let (_temp, path, mut session) = create_session();
    session.set(3, "a", "a@x").unwrap();

    let result = session.set(3, "b", "b@x");

    assert!(matches!(result, Err(SlotDbError::SlotOccupied(3))));
    assert!(session.is_closed());

    let mut session = Session::open(&path, small_config()).unwrap();
    assert_eq!(session.get(3).unwrap().unwrap().name(), "a");
}

#[test]
fn test_field_too_long_closes_session() {
    let (_temp, path, mut session) = create_session();

    let result = session.set(0, &"x".repeat(40), "e");

    assert!(matches!(result, Err(SlotDbError::FieldTooLong { .. })));
    assert!(session.is_closed());

    let mut session = Session::open(&path, small_config()).unwrap();
    assert!(session.get(0).unwrap().is_none());
}

#[test]
fn test_operations_after_close() {
    let (_temp, _path, mut session) = create_session();
    session.close().unwrap();

    assert!(matches!(session.get(0), Err(SlotDbError::SessionClosed)));
    assert!(matches!(
        session.set(0, "a", "b"),
        Err(SlotDbError::SessionClosed)
    ));
    assert!(matches!(session.delete(0), Err(SlotDbError::SessionClosed)));
    assert!(matches!(session.save(), Err(SlotDbError::SessionClosed)));
    assert!(matches!(session.store(), Err(SlotDbError::SessionClosed)));
}

#[test]
fn test_close_is_idempotent() {
    let (_temp, _path, mut session) = create_session();

    session.close().unwrap();
    session.close().unwrap();

    assert_eq!(session.state(), SessionState::Closed);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_open_empty_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, b"").unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_truncated_header() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, [1u8, 0, 0, 0, 2, 0]).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_invalid_header_values() {
    let (_temp, path) = setup_temp_path();
    let header = FileHeader {
        max_data: 32,
        max_rows: 2,
        current_rows: 5,
    };
    fs::write(&path, header.encode().unwrap()).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_header_with_huge_capacity() {
    let (_temp, path) = setup_temp_path();
    let header = FileHeader {
        max_data: 32,
        max_rows: i32::MAX,
        current_rows: 0,
    };
    fs::write(&path, header.encode().unwrap()).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_create_huge_capacity_leaves_file_alone() {
    let (_temp, path) = setup_temp_path();

    let config = Config::builder().max_data(512).max_rows(2_000_000_000).build();
    let result = Session::create(&path, config);

    assert!(matches!(result, Err(SlotDbError::InvalidCapacity(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_missing_rows() {
    let (_temp, path) = setup_temp_path();
    let header = FileHeader {
        max_data: 32,
        max_rows: 10,
        current_rows: 1,
    };
    fs::write(&path, header.encode().unwrap()).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_truncated_row() {
    let (_temp, path, mut session) = create_session();
    session.set(1, "name", "email").unwrap();
    session.close().unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_trailing_bytes() {
    let (_temp, path, mut session) = create_session();
    session.set(1, "name", "email").unwrap();
    session.close().unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(b"junk");
    fs::write(&path, bytes).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_row_id_out_of_range() {
    let (_temp, path, mut session) = create_session();
    session.set(9, "n", "e").unwrap();
    session.close().unwrap();

    // Shrink max_rows in the header so row 9 no longer fits
    let mut bytes = fs::read(&path).unwrap();
    bytes[4..8].copy_from_slice(&5i32.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_duplicate_row_id() {
    let (_temp, path, mut session) = create_session();
    session.set(2, "n", "e").unwrap();
    session.close().unwrap();

    // Duplicate the single row and bump current_rows
    let mut bytes = fs::read(&path).unwrap();
    let row = bytes[FILE_HEADER_SIZE..].to_vec();
    bytes.extend_from_slice(&row);
    bytes[8..12].copy_from_slice(&2i32.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

#[test]
fn test_open_field_longer_than_max_data() {
    let (_temp, path, mut session) = create_session();
    session.set(0, &"n".repeat(20), "e").unwrap();
    session.close().unwrap();

    // Lower max_data below the stored name length
    let mut bytes = fs::read(&path).unwrap();
    bytes[0..4].copy_from_slice(&8i32.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let result = Session::open(&path, small_config());

    assert!(matches!(result, Err(SlotDbError::CorruptRecord(_))));
}

// =============================================================================
// Autosave / State Tests
// =============================================================================

#[test]
fn test_autosave_persists_each_mutation() {
    let (_temp, path, mut session) = create_session();

    session.set(1, "a", "b").unwrap();
    assert_eq!(session.state(), SessionState::Ready);

    // Another session sees the change without an explicit save
    let mut other = Session::open(&path, small_config()).unwrap();
    assert_eq!(other.get(1).unwrap().unwrap().name(), "a");
}

#[test]
fn test_manual_save_mode() {
    let (_temp, path) = setup_temp_path();
    let config = Config::builder()
        .max_data(32)
        .max_rows(10)
        .autosave(false)
        .sync_on_save(false)
        .build();
    let mut session = Session::create(&path, config.clone()).unwrap();

    session.set(1, "a", "b").unwrap();
    assert_eq!(session.state(), SessionState::Dirty);
    assert_eq!(fs::metadata(&path).unwrap().len(), FILE_HEADER_SIZE as u64);

    session.save().unwrap();
    assert_eq!(session.state(), SessionState::Ready);

    session.delete(1).unwrap();
    assert_eq!(session.state(), SessionState::Dirty);

    // close flushes pending changes
    session.close().unwrap();
    let session = Session::open(&path, config).unwrap();
    assert_eq!(session.store().unwrap().current_rows(), 0);
}

#[test]
fn test_delete_empty_slot_stays_ready() {
    let (_temp, _path, mut session) = create_session();

    let removed = session.delete(5).unwrap();

    assert!(!removed);
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.store().unwrap().current_rows(), 0);
}

#[test]
fn test_truncate_policy_through_session() {
    let (_temp, path) = setup_temp_path();
    let config = Config::builder()
        .max_data(4)
        .max_rows(2)
        .field_policy(FieldPolicy::Truncate)
        .sync_on_save(false)
        .build();
    let mut session = Session::create(&path, config.clone()).unwrap();

    session.set(0, "Alice", "alice@x.com").unwrap();
    session.close().unwrap();

    let mut session = Session::open(&path, config).unwrap();
    let record = session.get(0).unwrap().unwrap();
    assert_eq!(record.name(), "Ali");
    assert_eq!(record.email(), "ali");
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_execute_commands() {
    let (_temp, _path, mut session) = create_session();

    let reply = session
        .execute(Command::Set {
            id: 2,
            name: "Bob".to_string(),
            email: "bob@x".to_string(),
        })
        .unwrap();
    assert_eq!(reply, Reply::Done);

    let reply = session.execute(Command::Get { id: 2 }).unwrap();
    assert_eq!(reply, Reply::Record(Some(Record::new(2, "Bob", "bob@x"))));

    let reply = session.execute(Command::Get { id: 3 }).unwrap();
    assert_eq!(reply, Reply::Record(None));

    let reply = session.execute(Command::List).unwrap();
    assert_eq!(reply, Reply::Records(vec![Record::new(2, "Bob", "bob@x")]));

    let reply = session.execute(Command::Delete { id: 2 }).unwrap();
    assert_eq!(reply, Reply::Done);
    assert_eq!(session.execute(Command::List).unwrap(), Reply::Records(vec![]));
}
