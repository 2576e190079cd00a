use crate::ndjson::NdjsonReader;
use crate::records::{
    parse_comment_sentiment_line, parse_video_sentiment_line, CommentSets, SentimentScores,
    VideoRecord,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Join map from video id to its title scores. First occurrence wins across
/// rerun overlap; lines with empty score containers are dropped.
pub type VideoSentiments = ahash::AHashMap<String, SentimentScores>;

/// Join map from video id to scored comments (comment text → scores).
pub type CommentSentiments = ahash::AHashMap<String, BTreeMap<String, SentimentScores>>;

/// Load the annotated-video log. Blank lines are skipped; a malformed
/// trailing line (torn by a killed run) is dropped with a warning rather
/// than failing the join.
pub fn load_video_sentiments(path: &Path, read_buffer_bytes: usize) -> Result<VideoSentiments> {
    let mut rdr = NdjsonReader::open(path, read_buffer_bytes)
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = VideoSentiments::default();
    let mut buf = String::new();
    while rdr.next_line(&mut buf)? {
        match parse_video_sentiment_line(&buf) {
            Ok((video_id, Some(scores))) => {
                out.entry(video_id).or_insert(scores);
            }
            Ok((_, None)) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "dropping malformed line");
            }
        }
    }
    Ok(out)
}

/// Load the annotated-comments log; same line policy as the video loader.
pub fn load_comment_sentiments(
    path: &Path,
    read_buffer_bytes: usize,
) -> Result<CommentSentiments> {
    let mut rdr = NdjsonReader::open(path, read_buffer_bytes)
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = CommentSentiments::default();
    let mut buf = String::new();
    while rdr.next_line(&mut buf)? {
        match parse_comment_sentiment_line(&buf) {
            Ok((_, scored)) if scored.is_empty() => {}
            Ok((video_id, scored)) => {
                out.entry(video_id).or_insert(scored);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "dropping malformed line");
            }
        }
    }
    Ok(out)
}

/// Corpus-level counts handed to the external plotting collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleSizes {
    pub videos: u64,
    pub analyzed_videos: u64,
    pub comments: u64,
    pub analyzed_comments: u64,
}

pub fn sample_sizes(
    videos: &[VideoRecord],
    video_sentiments: &VideoSentiments,
    comment_sets: &CommentSets,
    comment_sentiments: &CommentSentiments,
) -> SampleSizes {
    SampleSizes {
        videos: videos.len() as u64,
        analyzed_videos: video_sentiments.len() as u64,
        comments: comment_sets.values().map(|c| c.len() as u64).sum(),
        analyzed_comments: comment_sentiments.values().map(|c| c.len() as u64).sum(),
    }
}
