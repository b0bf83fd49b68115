//! Integration tests for the compressed object store.

use std::fs;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use mgit_hash::hasher::Hasher;
use mgit_hash::ObjectId;
use mgit_loose::{LooseError, LooseObjectStore};
use mgit_object::header::frame;
use mgit_object::{Blob, Object, ObjectType};
use proptest::prelude::*;

fn setup_store() -> (tempfile::TempDir, LooseObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let objects_dir = dir.path().join("objects");
    fs::create_dir_all(&objects_dir).unwrap();
    let store = LooseObjectStore::open(&objects_dir);
    (dir, store)
}

/// Snapshot of every file under the objects dir with its bytes.
fn store_state(store: &LooseObjectStore) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    for oid in store.iter().unwrap() {
        let oid = oid.unwrap();
        files.push((oid.to_hex(), fs::read(store.object_path(&oid)).unwrap()));
    }
    files
}

#[test]
fn write_raw_hello_matches_known_digest() {
    let (_dir, store) = setup_store();
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    assert!(store
        .objects_dir()
        .join("ce")
        .join("013625030ba8dba906f756967f9e9ca394464a")
        .is_file());
}

#[test]
fn put_get_roundtrip() {
    let (_dir, store) = setup_store();
    let framed = frame(ObjectType::Blob, b"some content\n");
    let oid = Hasher::digest(&framed).unwrap();
    store.put(&oid, &framed).unwrap();
    assert_eq!(store.get(&oid).unwrap(), framed);
}

#[test]
fn write_then_read_parsed_object() {
    let (_dir, store) = setup_store();
    let obj = Object::Blob(Blob::new(b"\0binary\0".to_vec()));
    let oid = store.write(&obj).unwrap();
    assert_eq!(store.read(&oid).unwrap(), obj);
    assert_eq!(oid, obj.compute_oid().unwrap());
}

#[test]
fn write_is_idempotent() {
    let (_dir, store) = setup_store();
    let first = store.write_raw(ObjectType::Blob, b"same").unwrap();
    let state = store_state(&store);

    let second = store.write_raw(ObjectType::Blob, b"same").unwrap();
    assert_eq!(first, second);
    assert_eq!(store_state(&store), state);
    assert_eq!(state.len(), 1);
}

#[test]
fn put_twice_leaves_no_temp_files() {
    let (_dir, store) = setup_store();
    let oid = store.write_raw(ObjectType::Blob, b"x").unwrap();
    store.write_raw(ObjectType::Blob, b"x").unwrap();

    let fanout = store.object_path(&oid).parent().unwrap().to_path_buf();
    let names: Vec<_> = fs::read_dir(&fanout)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn write_creates_fanout_directory_when_objects_dir_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LooseObjectStore::open(dir.path().join("objects"));
    let oid = store.write_raw(ObjectType::Tree, b"").unwrap();
    assert!(store.object_path(&oid).is_file());
}

#[test]
fn get_missing_object_is_not_found() {
    let (_dir, store) = setup_store();
    let oid = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
    assert!(!store.contains(&oid));
    assert!(matches!(store.get(&oid), Err(LooseError::NotFound(o)) if o == oid));
    assert!(matches!(store.read_header(&oid), Err(LooseError::NotFound(_))));
}

#[test]
fn truncated_object_is_corrupt() {
    let (_dir, store) = setup_store();
    let oid = store
        .write_raw(ObjectType::Blob, &b"truncate me please\n".repeat(20))
        .unwrap();
    let path = store.object_path(&oid);
    let bytes = fs::read(&path).unwrap();

    fs::remove_file(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(store.get(&oid), Err(LooseError::Corrupt { .. })));
}

#[test]
fn rewriting_truncated_object_repairs_it() {
    let (_dir, store) = setup_store();
    let payload = b"repair me\n".repeat(30);
    let oid = store.write_raw(ObjectType::Blob, &payload).unwrap();
    let path = store.object_path(&oid);
    let bytes = fs::read(&path).unwrap();

    fs::remove_file(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(store.get(&oid), Err(LooseError::Corrupt { .. })));

    assert_eq!(store.write_raw(ObjectType::Blob, &payload).unwrap(), oid);
    assert_eq!(store.get(&oid).unwrap(), frame(ObjectType::Blob, &payload));
    assert_eq!(store_state(&store).len(), 1);
}

#[test]
fn object_missing_checksum_trailer_is_corrupt() {
    let (_dir, store) = setup_store();
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    let path = store.object_path(&oid);
    let bytes = fs::read(&path).unwrap();

    fs::remove_file(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

    assert!(matches!(store.get(&oid), Err(LooseError::Corrupt { .. })));
}

#[test]
fn garbage_object_is_corrupt() {
    let (_dir, store) = setup_store();
    let oid = ObjectId::from_hex("1111111111111111111111111111111111111111").unwrap();
    let path = store.object_path(&oid);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"definitely not zlib").unwrap();

    assert!(matches!(store.get(&oid), Err(LooseError::Corrupt { .. })));
    assert!(matches!(store.read_header(&oid), Err(LooseError::Corrupt { .. })));
}

#[test]
fn well_compressed_bad_frame_is_corrupt() {
    let (_dir, store) = setup_store();
    let oid = ObjectId::from_hex("2222222222222222222222222222222222222222").unwrap();
    let path = store.object_path(&oid);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(b"blob 100\0short").unwrap();
    fs::write(&path, enc.finish().unwrap()).unwrap();

    assert!(matches!(store.get(&oid), Err(LooseError::Corrupt { .. })));
}

#[test]
fn read_header_reports_type_and_size() {
    let (_dir, store) = setup_store();
    let oid = store.write_raw(ObjectType::Blob, b"twelve bytes").unwrap();
    assert_eq!(store.read_header(&oid).unwrap(), (ObjectType::Blob, 12));
}

#[test]
fn compression_level_does_not_change_identity() {
    let (_dir, mut store) = setup_store();
    store.set_compression_level(0);
    let oid = store.write_raw(ObjectType::Blob, b"level zero").unwrap();
    assert_eq!(oid, Hasher::hash_object("blob", b"level zero").unwrap());
    assert_eq!(store.get(&oid).unwrap(), frame(ObjectType::Blob, b"level zero"));
}

#[test]
fn enumerate_finds_all_objects_sorted() {
    let (_dir, store) = setup_store();
    let mut expected: Vec<ObjectId> = (0..10)
        .map(|i| {
            store
                .write_raw(ObjectType::Blob, format!("object {i}").as_bytes())
                .unwrap()
        })
        .collect();
    expected.sort();

    let found: Vec<ObjectId> = store.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(found, expected);
}

#[test]
fn enumerate_skips_foreign_files() {
    let (_dir, store) = setup_store();
    let oid = store.write_raw(ObjectType::Blob, b"real").unwrap();
    let fanout = store.object_path(&oid).parent().unwrap().to_path_buf();
    fs::write(fanout.join("tmp_obj_leftover"), b"junk").unwrap();
    fs::create_dir_all(store.objects_dir().join("info")).unwrap();

    let found: Vec<ObjectId> = store.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(found, vec![oid]);
}

#[test]
fn enumerate_empty_store() {
    let (_dir, store) = setup_store();
    assert_eq!(store.iter().unwrap().count(), 0);
}

#[test]
fn blob_readable_by_c_git() {
    use std::process::{Command, Stdio};

    let dir = tempfile::tempdir().unwrap();
    let init = Command::new("git")
        .args(["init", "--bare", "-q"])
        .current_dir(dir.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    // Interop is only checked where a git binary is available.
    let Ok(status) = init else { return };
    if !status.success() {
        return;
    }

    let store = LooseObjectStore::open(dir.path().join("objects"));
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();

    let output = Command::new("git")
        .args(["cat-file", "-p", &oid.to_hex()])
        .env("GIT_DIR", dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"hello\n");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn compression_roundtrips_exactly(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let (_dir, store) = setup_store();
        let oid = store.write_raw(ObjectType::Blob, &payload).unwrap();
        let framed = store.get(&oid).unwrap();
        prop_assert_eq!(framed, frame(ObjectType::Blob, &payload));
    }
}
