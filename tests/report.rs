#[path = "common/mod.rs"]
mod common;

use common::*;
use std::collections::BTreeMap;
use std::fs;
use ytox::{
    comment_sentiment_line, load_comment_sentiments, load_video_sentiments, sample_sizes,
    video_sentiment_line, CommentSets, SentimentScores,
};

/// The video loader keeps the first line per id, drops empty containers and
/// blank lines, and survives a torn trailing line from a killed run.
#[test]
fn video_loader_first_occurrence_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("video_sentiments.json");

    let mut body = String::new();
    body.push('\n'); // historical leading blank line
    body.push_str(&video_sentiment_line("v1", Some(&uniform_scores(0.4))).unwrap());
    body.push('\n');
    body.push_str(&video_sentiment_line("v2", None).unwrap()); // nothing succeeded
    body.push('\n');
    body.push_str(&video_sentiment_line("v1", Some(&uniform_scores(0.9))).unwrap()); // rerun dup
    body.push('\n');
    body.push_str("{\"v3\":{\"toxi"); // torn by process kill
    fs::write(&path, body).unwrap();

    let loaded = load_video_sentiments(&path, 64 * 1024).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["v1"], uniform_scores(0.4));
}

#[test]
fn comment_loader_drops_empty_containers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comment_sentiments.json");

    let mut scored = BTreeMap::new();
    scored.insert("nice one".to_string(), uniform_scores(0.2));
    scored.insert("awful".to_string(), uniform_scores(0.8));
    let empty: BTreeMap<String, SentimentScores> = BTreeMap::new();

    let mut body = String::new();
    body.push_str(&comment_sentiment_line("v1", &scored).unwrap());
    body.push('\n');
    body.push_str(&comment_sentiment_line("v2", &empty).unwrap());
    body.push('\n');
    fs::write(&path, body).unwrap();

    let loaded = load_comment_sentiments(&path, 64 * 1024).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["v1"].len(), 2);
}

/// Sample sizes count videos, annotated videos, harvested comments, and
/// individually scored comments.
#[test]
fn sample_sizes_count_corpus_and_annotations() {
    let dir = tempfile::tempdir().unwrap();

    let videos = vec![
        record("v1", "One", "2021-01-01", "q"),
        record("v2", "Two", "2021-01-02", "q"),
        record("v3", "Three", "2021-01-03", "q"),
    ];

    let video_path = dir.path().join("video_sentiments.json");
    fs::write(
        &video_path,
        format!("{}\n", video_sentiment_line("v1", Some(&uniform_scores(0.5))).unwrap()),
    )
    .unwrap();
    let video_sentiments = load_video_sentiments(&video_path, 64 * 1024).unwrap();

    let mut comment_sets = CommentSets::new();
    comment_sets.insert("v1".to_string(), vec![comment("a", 0, 0), comment("b", 0, 0)]);
    comment_sets.insert("v2".to_string(), Vec::new());

    let mut scored = BTreeMap::new();
    scored.insert("a".to_string(), uniform_scores(0.3));
    let comment_path = dir.path().join("comment_sentiments.json");
    fs::write(&comment_path, format!("{}\n", comment_sentiment_line("v1", &scored).unwrap()))
        .unwrap();
    let comment_sentiments = load_comment_sentiments(&comment_path, 64 * 1024).unwrap();

    let sizes = sample_sizes(&videos, &video_sentiments, &comment_sets, &comment_sentiments);
    assert_eq!(sizes.videos, 3);
    assert_eq!(sizes.analyzed_videos, 1);
    assert_eq!(sizes.comments, 2);
    assert_eq!(sizes.analyzed_comments, 1);
}
