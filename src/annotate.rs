use crate::checkpoint::Checkpoint;
use crate::config::AnnotateOptions;
use crate::ndjson::NdjsonWriter;
use crate::perspective::{ScorerPool, TextScorer};
use crate::progress::ProgressScope;
use crate::records::{
    comment_sentiment_line, video_sentiment_line, CommentSets, SentimentScores, VideoRecord,
};
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;

/// Outcome counters for one annotation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotateSummary {
    pub processed: u64, // items finished: line appended, checkpoint advanced
    pub scored: u64,    // sub-units that produced scores
    pub skipped: u64,   // sub-units lost to transient failures
}

/// Checkpointed, rate-limited batch annotator.
///
/// Per item: score its sub-units through the round-robin pool, append one
/// id-keyed JSON line (empty score container when nothing succeeded), flush,
/// then overwrite the checkpoint with the next index. That ordering keeps the
/// persisted offset at or below the number of lines actually on disk; it does
/// not promise equality, since partial sub-unit failures are accepted and
/// never replayed.
pub struct Annotator<S> {
    pool: ScorerPool<S>,
    opts: AnnotateOptions,
}

impl<S: TextScorer> Annotator<S> {
    pub fn new(pool: ScorerPool<S>, opts: AnnotateOptions) -> Self {
        Self { pool, opts }
    }

    /// Video-title variant: one scoring request per remaining video.
    pub fn annotate_videos(&mut self, videos: &[VideoRecord]) -> Result<AnnotateSummary> {
        init_tracing_once();

        let checkpoint = Checkpoint::load(&self.opts.checkpoint_path)?;
        let resumed_past = checkpoint
            .next_index
            .checked_sub(1)
            .and_then(|i| videos.get(i))
            .map(|v| v.attrs.video_id.as_str());
        checkpoint.verify_last_id(resumed_past)?;

        let mut summary = AnnotateSummary::default();
        if checkpoint.next_index >= videos.len() {
            tracing::info!(videos = videos.len(), "nothing left to annotate");
            return Ok(summary);
        }

        if let Some(dir) = self.opts.output_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = NdjsonWriter::append(&self.opts.output_path, self.opts.write_buffer_bytes)
            .with_context(|| format!("open {}", self.opts.output_path.display()))?;
        let remaining = (videos.len() - checkpoint.next_index) as u64;
        let pb = ProgressScope::count("Annotate: videos", remaining, self.opts.progress);

        for idx in checkpoint.next_index..videos.len() {
            let video = &videos[idx];
            let video_id = video.attrs.video_id.clone();
            let scores = match self.pool.score_next(&video.title) {
                Ok(s) => {
                    summary.scored += 1;
                    Some(s)
                }
                Err(e) if e.is_transient() => {
                    summary.skipped += 1;
                    tracing::debug!(video_id = %video_id, error = %e, "scoring failed, skipping");
                    None
                }
                Err(e) => return Err(e).with_context(|| format!("scoring video {video_id}")),
            };

            writer.write_line(&video_sentiment_line(&video_id, scores.as_ref())?)?;
            writer.flush()?; // the line must land before the offset moves past it
            Checkpoint { next_index: idx + 1, last_id: Some(video_id.clone()) }
                .store(&self.opts.checkpoint_path)?;

            if scores.is_some() {
                tracing::info!(video_id = %video_id, "sentiment recorded");
            } else {
                tracing::info!(video_id = %video_id, "no sentiment to analyze");
            }
            summary.processed += 1;
            pb.inc(1);
        }

        writer.finish()?;
        pb.finish("videos annotated");
        Ok(summary)
    }

    /// Per-comment variant: up to `max_comments_per_video` requests per video,
    /// one output line per video keyed by comment text.
    pub fn annotate_comments(&mut self, sets: &CommentSets) -> Result<AnnotateSummary> {
        init_tracing_once();

        // Sorted-key iteration makes the item order deterministic across
        // runs, which index-based resume requires.
        let items: Vec<(&String, &Vec<crate::records::CommentEntry>)> = sets.iter().collect();

        let checkpoint = Checkpoint::load(&self.opts.checkpoint_path)?;
        let resumed_past = checkpoint
            .next_index
            .checked_sub(1)
            .and_then(|i| items.get(i))
            .map(|(id, _)| id.as_str());
        checkpoint.verify_last_id(resumed_past)?;

        let mut summary = AnnotateSummary::default();
        if checkpoint.next_index >= items.len() {
            tracing::info!(videos = items.len(), "nothing left to annotate");
            return Ok(summary);
        }

        if let Some(dir) = self.opts.output_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = NdjsonWriter::append(&self.opts.output_path, self.opts.write_buffer_bytes)
            .with_context(|| format!("open {}", self.opts.output_path.display()))?;
        let remaining = (items.len() - checkpoint.next_index) as u64;
        let pb = ProgressScope::count("Annotate: comments", remaining, self.opts.progress);

        for idx in checkpoint.next_index..items.len() {
            let (video_id, comments) = items[idx];
            let mut scored: BTreeMap<String, SentimentScores> = BTreeMap::new();
            for entry in comments.iter().take(self.opts.max_comments_per_video) {
                match self.pool.score_next(&entry.text) {
                    Ok(s) => {
                        summary.scored += 1;
                        scored.insert(entry.text.clone(), s);
                    }
                    Err(e) if e.is_transient() => {
                        summary.skipped += 1;
                        tracing::debug!(
                            video_id = %video_id,
                            error = %e,
                            "comment scoring failed, skipping"
                        );
                    }
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("scoring comments for video {video_id}"))
                    }
                }
            }

            writer.write_line(&comment_sentiment_line(video_id, &scored)?)?;
            writer.flush()?;
            Checkpoint { next_index: idx + 1, last_id: Some(video_id.clone()) }
                .store(&self.opts.checkpoint_path)?;

            if scored.is_empty() {
                tracing::info!(video_id = %video_id, "no sentiment to analyze");
            } else {
                tracing::info!(video_id = %video_id, scored = scored.len(), "sentiment recorded");
            }
            summary.processed += 1;
            pb.inc(1);
        }

        writer.finish()?;
        pb.finish("comments annotated");
        Ok(summary)
    }
}
