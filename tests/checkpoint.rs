use ytox::Checkpoint;

/// A missing checkpoint file means a fresh run from index 0.
#[test]
fn missing_file_is_a_fresh_run() {
    let dir = tempfile::tempdir().unwrap();
    let cp = Checkpoint::load(&dir.path().join("loc.txt")).unwrap();
    assert_eq!(cp, Checkpoint::default());
}

/// Hand-edited files holding a bare integer stay valid (no id guard).
#[test]
fn bare_integer_file_loads_without_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loc.txt");
    std::fs::write(&path, "7\n").unwrap();

    let cp = Checkpoint::load(&path).unwrap();
    assert_eq!(cp.next_index, 7);
    assert_eq!(cp.last_id, None);
    cp.verify_last_id(Some("anything")).unwrap();
}

#[test]
fn store_then_load_roundtrips_index_and_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loc.txt");

    let cp = Checkpoint { next_index: 3, last_id: Some("v3".to_string()) };
    cp.store(&path).unwrap();
    assert_eq!(Checkpoint::load(&path).unwrap(), cp);
}

/// Successive stores overwrite in place; the file always reflects the latest
/// offset only.
#[test]
fn store_overwrites_previous_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loc.txt");

    Checkpoint { next_index: 1, last_id: Some("v1".to_string()) }.store(&path).unwrap();
    Checkpoint { next_index: 2, last_id: Some("v2".to_string()) }.store(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "2\nv2\n");
}

#[test]
fn verify_accepts_matching_id_and_rejects_others() {
    let cp = Checkpoint { next_index: 2, last_id: Some("v2".to_string()) };
    cp.verify_last_id(Some("v2")).unwrap();

    let err = cp.verify_last_id(Some("v9")).unwrap_err();
    assert!(err.to_string().contains("reordered"), "unexpected error: {err}");

    let err = cp.verify_last_id(None).unwrap_err();
    assert!(err.to_string().contains("beyond"), "unexpected error: {err}");
}

#[test]
fn non_integer_offset_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loc.txt");
    std::fs::write(&path, "not-a-number\n").unwrap();

    let err = Checkpoint::load(&path).unwrap_err();
    assert!(err.to_string().contains("non-integer"), "unexpected error: {err}");
}
