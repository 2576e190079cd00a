use crate::ndjson::{NdjsonReader, NdjsonWriter};
use crate::progress::ProgressScope;
use crate::records::VideoRecord;
use crate::util::init_tracing_once;
use crate::youtube::VideoStats;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Query-keyed record lists in query iteration order. A `Vec` of pairs rather
/// than a map so "first occurrence wins" has a defined meaning.
pub type GroupedRecords = Vec<(String, Vec<VideoRecord>)>;

/// Load every capture file directly under `raw_dir` into query-keyed lists.
/// Files are read in file-name order; byte-identical duplicate lines within a
/// query (rerun overlap) are dropped. A record whose query is not in
/// `queries` is a structural failure.
pub fn load_raw_captures(
    raw_dir: &Path,
    queries: &[String],
    read_buffer_bytes: usize,
) -> Result<GroupedRecords> {
    init_tracing_once();

    let index: HashMap<&str, usize> =
        queries.iter().enumerate().map(|(i, q)| (q.as_str(), i)).collect();
    let mut grouped: GroupedRecords =
        queries.iter().map(|q| (q.clone(), Vec::new())).collect();
    let mut seen_lines: Vec<ahash::AHashSet<String>> =
        queries.iter().map(|_| ahash::AHashSet::new()).collect();

    let mut files: Vec<PathBuf> = WalkDir::new(raw_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    if files.is_empty() {
        tracing::warn!(dir = %raw_dir.display(), "no capture files found");
    }

    let mut buf = String::with_capacity(4 * 1024);
    for path in &files {
        let mut rdr = NdjsonReader::open(path, read_buffer_bytes)
            .with_context(|| format!("open {}", path.display()))?;
        while rdr.next_line(&mut buf)? {
            let record = VideoRecord::from_line(&buf)
                .with_context(|| format!("malformed record in {}", path.display()))?;
            let slot = *index
                .get(record.attrs.query.as_str())
                .ok_or_else(|| anyhow!("record for unknown query {:?}", record.attrs.query))?;
            if seen_lines[slot].insert(buf.clone()) {
                grouped[slot].1.push(record);
            }
        }
    }

    Ok(grouped)
}

/// Deduplicate by video id (first occurrence wins, across query iteration
/// order then record order) and sort ascending by publish date. The dates are
/// zero-padded ISO strings, so the lexicographic sort is chronological; the
/// sort is stable, so equal dates keep first-occurrence order.
pub fn combine_records(grouped: &GroupedRecords) -> Vec<VideoRecord> {
    let mut seen = ahash::AHashSet::new();
    let mut combined: Vec<VideoRecord> = Vec::new();
    for (_query, records) in grouped {
        for record in records {
            if seen.insert(record.attrs.video_id.clone()) {
                combined.push(record.clone());
            }
        }
    }
    combined.sort_by(|a, b| a.attrs.date_published.cmp(&b.attrs.date_published));
    combined
}

/// Enrich combined records with per-video statistics. Videos the endpoint no
/// longer returns are skipped; a mismatched id aborts (the join would be
/// corrupt); any request error propagates and halts the pass.
pub fn attach_statistics<V: VideoStats>(
    client: &V,
    records: &mut [VideoRecord],
    progress: bool,
) -> Result<()> {
    init_tracing_once();
    let pb = ProgressScope::count("Merge: video statistics", records.len() as u64, progress);
    let mut enriched = 0u64;
    for record in records.iter_mut() {
        let video_id = record.attrs.video_id.clone();
        let stats = client
            .video_statistics(&video_id)
            .with_context(|| format!("statistics for video {video_id}"))?;
        pb.inc(1);
        let Some(stats) = stats else {
            tracing::debug!(video_id = %video_id, "no statistics returned, skipping");
            continue;
        };
        if stats.id != video_id {
            bail!("statistics id {:?} does not match requested video {:?}", stats.id, video_id);
        }
        record.attrs.duration = Some(stats.duration);
        record.attrs.views = Some(stats.views);
        record.attrs.likes = stats.likes;
        record.attrs.favorites = stats.favorites;
        record.attrs.comments = stats.comments;
        enriched += 1;
    }
    pb.finish("statistics attached");
    tracing::info!(enriched, total = records.len(), "statistics pass complete");
    Ok(())
}

/// Write the canonical video list: one JSON array on a single line, built on
/// a temp file and promoted atomically.
pub fn write_videos(path: &Path, records: &[VideoRecord], write_buffer_bytes: usize) -> Result<()> {
    let values: Vec<Value> = records
        .iter()
        .map(|r| -> Result<Value> {
            let mut obj = serde_json::Map::with_capacity(1);
            obj.insert(r.title.clone(), serde_json::to_value(&r.attrs)?);
            Ok(Value::Object(obj))
        })
        .collect::<Result<_>>()?;

    let tmp = path.with_extension("json.inprogress");
    let mut w = NdjsonWriter::create(&tmp, write_buffer_bytes)
        .with_context(|| format!("create {}", tmp.display()))?;
    w.write_line(&serde_json::to_string(&values)?)?;
    w.finish_atomic(path)
}

/// Load the canonical video list (single-line JSON array).
pub fn load_videos(path: &Path, read_buffer_bytes: usize) -> Result<Vec<VideoRecord>> {
    let line = NdjsonReader::open(path, read_buffer_bytes)
        .with_context(|| format!("open {}", path.display()))?
        .read_document()?;
    let values: Vec<Value> =
        serde_json::from_str(&line).with_context(|| format!("parse {}", path.display()))?;
    values.into_iter().map(VideoRecord::from_value).collect()
}
