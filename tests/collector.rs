#[path = "common/mod.rs"]
mod common;

use common::*;
use ytox::{Collector, HarvestOptions, VideoRecord};

fn harvest_opts(dir: &std::path::Path, queries: &[&str], max_iterations: usize) -> HarvestOptions {
    HarvestOptions::default()
        .with_queries(queries.iter().copied())
        .with_raw_dir(dir)
        .with_max_iterations(max_iterations)
        .with_progress(false)
}

/// A query whose first response carries no continuation token is exhausted:
/// later iterations must not issue further requests for it.
#[test]
fn exhausted_query_gets_no_more_requests() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::new();
    search.push_page("rust", vec![search_item("v1", "Video one", "2021-05-04T07:00:00Z")], None);
    let calls = search.calls.clone();

    let opts = harvest_opts(dir.path(), &["rust"], 3);
    let capture = opts.capture_file.clone();
    let appended = Collector::new(search, opts).run().unwrap();

    assert_eq!(appended, 1);
    assert_eq!(*calls.borrow(), vec!["rust".to_string()]);
    assert_eq!(read_lines(&capture).len(), 1);
}

/// Two queries, one of them two pages deep. Iteration 0 touches both queries;
/// iteration 1 only the query that still has a token. Records land in the
/// shared capture log with the issuing query and the date-only publish field.
#[test]
fn pagination_follows_continuation_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::new();
    search.push_page(
        "rust",
        vec![search_item("v1", "Video one", "2021-05-04T07:00:00Z")],
        Some("t1"),
    );
    search.push_page("rust", vec![search_item("v2", "Video two", "2021-06-01T10:00:00Z")], None);
    search.push_page("go", vec![search_item("v3", "Video three", "2021-01-02T00:30:00Z")], None);
    let calls = search.calls.clone();

    let opts = harvest_opts(dir.path(), &["rust", "go"], 4);
    let capture = opts.capture_file.clone();
    let appended = Collector::new(search, opts).run().unwrap();

    assert_eq!(appended, 3);
    assert_eq!(*calls.borrow(), vec!["rust".to_string(), "go".to_string(), "rust".to_string()]);

    // Iteration 0 appends rust page 1 then go page 1; iteration 1 appends
    // rust page 2.
    let records: Vec<VideoRecord> = read_lines(&capture)
        .iter()
        .map(|l| VideoRecord::from_line(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].attrs.video_id, "v1");
    assert_eq!(records[0].attrs.query, "rust");
    assert_eq!(records[0].attrs.date_published, "2021-05-04");
    assert_eq!(records[1].attrs.video_id, "v3");
    assert_eq!(records[1].attrs.query, "go");
    assert_eq!(records[2].attrs.video_id, "v2");
    assert_eq!(records[2].attrs.query, "rust");
}

/// The capture log is append-only: a rerun re-collects exhausted queries and
/// the resulting duplicates are left for the dedup pass.
#[test]
fn rerun_appends_to_the_capture_log() {
    let dir = tempfile::tempdir().unwrap();
    let opts = harvest_opts(dir.path(), &["rust"], 2);
    let capture = opts.capture_file.clone();

    for _ in 0..2 {
        let search = ScriptedSearch::new();
        search.push_page(
            "rust",
            vec![search_item("v1", "Video one", "2021-05-04T07:00:00Z")],
            None,
        );
        Collector::new(search, opts.clone()).run().unwrap();
    }

    let lines = read_lines(&capture);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}
