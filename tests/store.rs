//! End-to-end byte-level checks against the on-disk format.

use std::fs;
use std::path::PathBuf;

use tempfile::{TempDir, tempdir};

use tasklog::constants::{HEADER_SIZE, MAX_RECORD_SIZE, RECORD_OVERHEAD};
use tasklog::io::codec::EntryCodec;
use tasklog::{ListFilter, TaskStore, TasklogError};

fn new_store() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tasks.db");
    TaskStore::create(&path).expect("create store");
    (dir, path)
}

#[test]
fn init_produces_the_canonical_empty_header() {
    let (_dir, path) = new_store();

    let bytes = fs::read(&path).expect("read file");
    assert_eq!(bytes.len() as u64, HEADER_SIZE);

    let mut expected = Vec::new();
    expected.extend_from_slice(&0x004e_4e4eu64.to_be_bytes()); // magic
    expected.extend_from_slice(&1u32.to_be_bytes()); // version
    expected.extend_from_slice(&28u32.to_be_bytes()); // filesize
    expected.extend_from_slice(&0u64.to_be_bytes()); // last_entry_id
    expected.extend_from_slice(&0u32.to_be_bytes()); // entry_count
    assert_eq!(bytes, expected);
}

#[test]
fn the_readme_scenario_holds_byte_for_byte() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");

    // add("buy milk"): 8 bytes of text, record is 4+32+4+8 = 48 bytes.
    let first = store.add(b"buy milk").expect("add first");
    assert_eq!(first.id, 1);
    assert_eq!(fs::metadata(&path).expect("stat").len(), HEADER_SIZE + 48);

    let header = store.header().expect("header");
    assert_eq!(u64::from(header.filesize), HEADER_SIZE + 48);
    assert_eq!(header.last_entry_id, 1);
    assert_eq!(header.entry_count, 1);

    let second = store.add(b"call mom").expect("add second");
    assert_eq!(second.id, 2);

    let entries = store.list(ListFilter::All).expect("list");
    let rendered: Vec<String> = entries
        .iter()
        .map(|e| format!("{}: {}", e.id, e.text_lossy()))
        .collect();
    assert_eq!(rendered, vec!["1: buy milk", "2: call mom"]);

    store.mark_done(1).expect("done(1)");
    let entries = store.list(ListFilter::All).expect("list after done");
    assert_ne!(entries[0].done_at, 0);
    assert_eq!(entries[1].done_at, 0);
}

#[test]
fn mark_done_touches_exactly_eight_bytes() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");
    store.add(b"buy milk").expect("add");
    store.add(b"call mom").expect("add");

    let before = fs::read(&path).expect("read before");
    store.mark_done(2).expect("done(2)");
    let after = fs::read(&path).expect("read after");

    assert_eq!(before.len(), after.len());
    let differing: Vec<usize> = (0..before.len())
        .filter(|&i| before[i] != after[i])
        .collect();

    // The second record starts at 28 + 48; its done_at field sits 28 bytes in.
    let done_at_start = (HEADER_SIZE + 48 + 28) as usize;
    assert!(!differing.is_empty());
    assert!(
        differing
            .iter()
            .all(|&i| i >= done_at_start && i < done_at_start + 8),
        "bytes outside the done_at field changed: {differing:?}"
    );
}

#[test]
fn mark_done_on_unknown_id_changes_nothing() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");
    store.add(b"buy milk").expect("add");

    let before = fs::read(&path).expect("read before");
    let err = store.mark_done(7).expect_err("should fail");
    assert!(matches!(err, TasklogError::NotFound { id: 7 }));

    let after = fs::read(&path).expect("read after");
    assert_eq!(before, after);
}

#[test]
fn stored_record_bytes_reencode_identically() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");
    store.add(b"buy milk").expect("add");

    let bytes = fs::read(&path).expect("read file");
    let record = &bytes[HEADER_SIZE as usize..];
    assert_eq!(record.len(), RECORD_OVERHEAD + 8);

    let decoded = EntryCodec::decode(&mut &record[..], HEADER_SIZE).expect("decode");
    let mut reencoded = vec![0u8; MAX_RECORD_SIZE];
    let written = EntryCodec::encode(&decoded.entry, &mut reencoded).expect("encode");
    assert_eq!(&reencoded[..written], record);
}

#[test]
fn corrupting_a_length_prefix_fails_the_scan() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");
    store.add(b"buy milk").expect("add");
    store.add(b"call mom").expect("add");
    drop(store);

    // Flip the first record's length prefix to a plausible-but-wrong value.
    let mut bytes = fs::read(&path).expect("read file");
    let prefix = HEADER_SIZE as usize;
    bytes[prefix..prefix + 4].copy_from_slice(&47u32.to_be_bytes());
    fs::write(&path, &bytes).expect("write back");

    let mut store = TaskStore::open(&path).expect("reopen");
    let err = store.list(ListFilter::All).expect_err("should fail");
    assert!(matches!(
        err,
        TasklogError::CorruptedRecord { offset, .. } if offset == HEADER_SIZE
    ));
}

#[test]
fn ids_survive_reopening_the_store() {
    let (_dir, path) = new_store();
    {
        let mut store = TaskStore::open(&path).expect("open");
        store.add(b"one").expect("add");
        store.add(b"two").expect("add");
    }
    {
        let mut store = TaskStore::open(&path).expect("reopen");
        let third = store.add(b"three").expect("add");
        assert_eq!(third.id, 3);

        let ids: Vec<u64> = store
            .list(ListFilter::All)
            .expect("list")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

#[test]
fn many_adds_keep_header_and_stream_consistent() {
    let (_dir, path) = new_store();
    let mut store = TaskStore::open(&path).expect("open");

    let mut expected_size = HEADER_SIZE;
    for i in 1..=25u64 {
        let text = format!("task number {i}");
        let entry = store.add(text.as_bytes()).expect("add");
        assert_eq!(entry.id, i);
        expected_size += (RECORD_OVERHEAD + text.len()) as u64;
    }

    let header = store.header().expect("header");
    assert_eq!(header.entry_count, 25);
    assert_eq!(header.last_entry_id, 25);
    assert_eq!(u64::from(header.filesize), expected_size);
    assert_eq!(fs::metadata(&path).expect("stat").len(), expected_size);

    let entries = store.list(ListFilter::All).expect("list");
    assert_eq!(entries.len(), 25);
    assert!(entries.iter().enumerate().all(|(i, e)| e.id == i as u64 + 1));
}
