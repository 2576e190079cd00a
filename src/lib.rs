mod config;
mod date;
mod error;
mod ndjson;
mod progress;
mod records;
mod util;

mod perspective;
mod youtube;

mod annotate;
mod checkpoint;
mod collect;
mod combine;
mod comments;
mod report;

pub use crate::config::{AnnotateOptions, HarvestOptions};
pub use crate::date::{day_of, parse_day, PublishWindow};
pub use crate::error::{ApiError, ApiResult};
pub use crate::records::{
    comment_sentiment_line, parse_comment_sentiment_line, parse_video_sentiment_line,
    video_sentiment_line, CommentEntry, CommentSets, SentimentScores, VideoAttrs, VideoRecord,
};

// Endpoint seams: production HTTP clients plus the traits tests script.
pub use crate::perspective::{PerspectiveClient, ScorerPool, TextScorer};
pub use crate::youtube::{
    CommentList, SearchItem, SearchItemId, SearchPage, SearchSnippet, SearchSpec, VideoSearch,
    VideoStatistics, VideoStats, YouTubeClient,
};

// Pipelines.
pub use crate::annotate::{AnnotateSummary, Annotator};
pub use crate::checkpoint::Checkpoint;
pub use crate::collect::Collector;
pub use crate::combine::{
    attach_statistics, combine_records, load_raw_captures, load_videos, write_videos,
    GroupedRecords,
};
pub use crate::comments::{harvest_comments, load_comment_sets, video_ids, write_comment_sets};
pub use crate::report::{
    load_comment_sentiments, load_video_sentiments, sample_sizes, CommentSentiments, SampleSizes,
    VideoSentiments,
};

// Expose NDJSON and progress helpers.
pub use crate::ndjson::{NdjsonReader, NdjsonWriter};
pub use crate::progress::ProgressScope;

// Export robust file ops and tracing init so binaries can import from crate root.
pub use crate::util::{
    append_with_backoff, create_with_backoff, init_tracing_once, open_with_backoff,
    remove_with_backoff, replace_file_atomic_backoff,
};
