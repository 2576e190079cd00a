use anyhow::{ensure, Context, Result};
use std::path::PathBuf;
use ytox::{
    attach_statistics, combine_records, harvest_comments, init_tracing_once, load_raw_captures,
    parse_day, sample_sizes, video_ids, write_comment_sets, write_videos, AnnotateOptions,
    Annotator, Collector, HarvestOptions, PublishWindow, ScorerPool, YouTubeClient,
};

const DATA_ROOT: &str = "./data";

// Search terms around (anti-)feminist discourse on Korean YouTube.
const QUERIES: &[&str] = &["페미", "안티페미", "여성주의", "반여성주의", "페미니즘", "안티페미니즘"];

const YOUTUBE_KEY_ENV: &str = "YTOX_YOUTUBE_KEY";
const PERSPECTIVE_KEYS_ENV: &str = "YTOX_PERSPECTIVE_KEYS"; // comma-separated

fn main() -> Result<()> {
    init_tracing_once();

    let data_root = PathBuf::from(DATA_ROOT);
    let youtube_key = std::env::var(YOUTUBE_KEY_ENV)
        .with_context(|| format!("{YOUTUBE_KEY_ENV} must hold a YouTube Data API key"))?;
    let perspective_keys: Vec<String> = std::env::var(PERSPECTIVE_KEYS_ENV)
        .with_context(|| format!("{PERSPECTIVE_KEYS_ENV} must hold comma-separated keys"))?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    ensure!(!perspective_keys.is_empty(), "{PERSPECTIVE_KEYS_ENV} holds no usable keys");

    let window = PublishWindow::new(parse_day("2020-03-09")?, parse_day("2024-03-09")?);
    let harvest = HarvestOptions::default()
        .with_queries(QUERIES.iter().copied())
        .with_window(window)
        .with_raw_dir(data_root.join("raw"));

    // Stage 1: paginated search harvest into the append-only capture log.
    let youtube = YouTubeClient::new(&youtube_key);
    let appended = Collector::new(youtube, harvest.clone()).run()?;
    tracing::info!(appended, "collection stage done");

    // Stage 2: merge, dedup, enrich, and freeze the canonical video list.
    let grouped = load_raw_captures(&harvest.raw_dir, &harvest.queries, harvest.read_buffer_bytes)?;
    let mut videos = combine_records(&grouped);
    let youtube = YouTubeClient::new(&youtube_key);
    attach_statistics(&youtube, &mut videos, harvest.progress)?;
    let videos_path = data_root.join("videos.json");
    write_videos(&videos_path, &videos, harvest.write_buffer_bytes)?;
    tracing::info!(videos = videos.len(), path = %videos_path.display(), "video list written");

    // Stage 3: one page of top-level comments per video.
    let ids = video_ids(&videos);
    let youtube = YouTubeClient::new(&youtube_key);
    let comment_sets = harvest_comments(&youtube, &ids, 100, harvest.progress)?;
    let comments_path = data_root.join("comments.json");
    write_comment_sets(&comments_path, &comment_sets, harvest.write_buffer_bytes)?;

    // Stage 4: checkpointed annotation, titles then comments.
    let video_opts =
        AnnotateOptions::for_videos(&data_root).with_api_keys(perspective_keys.iter().cloned());
    let video_out = video_opts.output_path.clone();
    let pool = ScorerPool::from_keys(&video_opts.api_keys, video_opts.cycle_pause);
    let summary = Annotator::new(pool, video_opts).annotate_videos(&videos)?;
    tracing::info!(
        processed = summary.processed,
        scored = summary.scored,
        skipped = summary.skipped,
        "video annotation done"
    );

    let comment_opts =
        AnnotateOptions::for_comments(&data_root).with_api_keys(perspective_keys.iter().cloned());
    let pool = ScorerPool::from_keys(&comment_opts.api_keys, comment_opts.cycle_pause);
    let summary = Annotator::new(pool, comment_opts.clone()).annotate_comments(&comment_sets)?;
    tracing::info!(
        processed = summary.processed,
        scored = summary.scored,
        skipped = summary.skipped,
        "comment annotation done"
    );

    // Stage 5: sample sizes for the downstream plotting notebooks.
    let video_sentiments = ytox::load_video_sentiments(&video_out, harvest.read_buffer_bytes)?;
    let comment_sentiments =
        ytox::load_comment_sentiments(&comment_opts.output_path, harvest.read_buffer_bytes)?;
    let sizes = sample_sizes(&videos, &video_sentiments, &comment_sets, &comment_sentiments);
    tracing::info!(
        videos = sizes.videos,
        analyzed_videos = sizes.analyzed_videos,
        comments = sizes.comments,
        analyzed_comments = sizes.analyzed_comments,
        "corpus sample sizes"
    );

    Ok(())
}
