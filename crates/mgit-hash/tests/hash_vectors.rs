use mgit_hash::hasher::Hasher;
use mgit_hash::ObjectId;

// ── Raw SHA-1 digest vectors ─────────────────────────────────────────

#[test]
fn sha1_empty_string() {
    let oid = Hasher::digest(b"").unwrap();
    assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}

#[test]
fn sha1_hello_world() {
    let oid = Hasher::digest(b"hello world").unwrap();
    assert_eq!(oid.to_hex(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
}

// ── Framed object vectors ────────────────────────────────────────────
// The digest covers "<type> <len>\0<content>", never the bare content.

#[test]
fn framed_hello_newline_blob() {
    let oid = Hasher::hash_object("blob", b"hello\n").unwrap();
    assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
}

#[test]
fn framed_empty_blob() {
    let oid = Hasher::hash_object("blob", b"").unwrap();
    assert_eq!(oid.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
}

#[test]
fn framed_empty_tree() {
    let oid = Hasher::hash_object("tree", b"").unwrap();
    assert_eq!(oid.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
}

#[test]
fn framing_differs_from_bare_content() {
    let framed = Hasher::hash_object("blob", b"hello\n").unwrap();
    let bare = Hasher::digest(b"hello\n").unwrap();
    assert_ne!(framed, bare);
}

#[test]
fn type_is_part_of_the_digest() {
    let data = b"some content";
    let blob = Hasher::hash_object("blob", data).unwrap();
    let tree = Hasher::hash_object("tree", data).unwrap();
    assert_ne!(blob, tree);
}

// ── Streaming ────────────────────────────────────────────────────────

#[test]
fn streaming_matches_oneshot() {
    let data = b"the quick brown fox jumps over the lazy dog";
    let oneshot = Hasher::digest(data).unwrap();

    let mut hasher = Hasher::new();
    for chunk in data.chunks(7) {
        hasher.update(chunk);
    }
    assert_eq!(hasher.finalize().unwrap(), oneshot);
}

#[test]
fn hash_result_display_parse_roundtrip() {
    let oid = Hasher::hash_object("blob", b"test content").unwrap();
    let parsed: ObjectId = oid.to_string().parse().unwrap();
    assert_eq!(oid, parsed);
}
