use crate::ndjson::{NdjsonReader, NdjsonWriter};
use crate::progress::ProgressScope;
use crate::records::{CommentSets, VideoRecord};
use crate::util::init_tracing_once;
use crate::youtube::CommentList;
use anyhow::{Context, Result};
use std::path::Path;

/// Ordered video ids of the canonical video list.
pub fn video_ids(videos: &[VideoRecord]) -> Vec<String> {
    videos.iter().map(|v| v.attrs.video_id.clone()).collect()
}

/// Fetch one page of top-level comments per video. Every id gets an entry;
/// a transient request failure leaves that video's list empty (comments are
/// frequently disabled), while a decode failure aborts the harvest.
pub fn harvest_comments<C: CommentList>(
    client: &C,
    ids: &[String],
    page_size: u32,
    progress: bool,
) -> Result<CommentSets> {
    init_tracing_once();
    let pb = ProgressScope::count("Comments: videos", ids.len() as u64, progress);

    let mut sets = CommentSets::new();
    for id in ids {
        sets.insert(id.clone(), Vec::new());
    }
    let mut fetched = 0u64;
    for id in ids {
        match client.list_comments(id, page_size) {
            Ok(comments) => {
                fetched += comments.len() as u64;
                sets.insert(id.clone(), comments);
            }
            Err(e) if e.is_transient() => {
                tracing::debug!(video_id = %id, error = %e, "comment listing failed, skipping");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("comment listing for video {id}"));
            }
        }
        pb.inc(1);
    }
    pb.finish("comments done");
    tracing::info!(videos = ids.len(), comments = fetched, "comment harvest complete");
    Ok(sets)
}

/// Write the comment sets file: one JSON object on a single line, built on a
/// temp file and promoted atomically.
pub fn write_comment_sets(path: &Path, sets: &CommentSets, write_buffer_bytes: usize) -> Result<()> {
    let tmp = path.with_extension("json.inprogress");
    let mut w = NdjsonWriter::create(&tmp, write_buffer_bytes)
        .with_context(|| format!("create {}", tmp.display()))?;
    w.write_line(&serde_json::to_string(sets)?)?;
    w.finish_atomic(path)
}

/// Load the comment sets file (single-line JSON object).
pub fn load_comment_sets(path: &Path, read_buffer_bytes: usize) -> Result<CommentSets> {
    let line = NdjsonReader::open(path, read_buffer_bytes)
        .with_context(|| format!("open {}", path.display()))?
        .read_document()?;
    serde_json::from_str(&line).with_context(|| format!("parse {}", path.display()))
}
