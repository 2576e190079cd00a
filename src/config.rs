use crate::date::PublishWindow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::macros::date;

/// Harvest (collector) options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct HarvestOptions {
    pub queries: Vec<String>,      // fixed ordered list of search terms
    pub language: String,          // relevance language hint
    pub region: String,            // region code
    pub window: PublishWindow,     // inclusive publish-date window
    pub page_size: u32,            // results per search page
    pub max_iterations: usize,     // upper bound on pages fetched per query
    pub raw_dir: PathBuf,          // directory scanned by the merge step
    pub capture_file: PathBuf,     // shared append-only capture log
    pub progress: bool,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        let raw_dir = PathBuf::from("data/raw");
        Self {
            capture_file: raw_dir.join("capture.jsonl"),
            raw_dir,
            queries: Vec::new(),
            language: "ko".to_string(),
            region: "kr".to_string(),
            window: PublishWindow::new(date!(2020 - 03 - 09), date!(2024 - 03 - 09)),
            page_size: 50,
            max_iterations: 100,
            progress: true,
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl HarvestOptions {
    pub fn with_queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries = queries.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = lang.into();
        self
    }
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
    pub fn with_window(mut self, window: PublishWindow) -> Self {
        self.window = window;
        self
    }
    pub fn with_page_size(mut self, n: u32) -> Self {
        self.page_size = n.max(1);
        self
    }
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n.max(1);
        self
    }
    /// Point the harvest at a raw-data directory; the capture log moves with it.
    pub fn with_raw_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        self.capture_file = dir.join("capture.jsonl");
        self.raw_dir = dir;
        self
    }
    pub fn with_capture_file(mut self, path: impl AsRef<Path>) -> Self {
        self.capture_file = path.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}

/// Annotator options. The ordered credential list lives here so the scoring
/// pool is built explicitly at construction instead of from process globals.
#[derive(Clone, Debug)]
pub struct AnnotateOptions {
    pub api_keys: Vec<String>,          // ordered credential list, round-robined
    pub cycle_pause: Duration,          // sleep after each full pool cycle
    pub max_comments_per_video: usize,  // external cost cap, not a correctness bound
    pub output_path: PathBuf,           // append-only scored JSONL log
    pub checkpoint_path: PathBuf,       // resume checkpoint beside the log
    pub progress: bool,
    pub write_buffer_bytes: usize,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            cycle_pause: Duration::from_millis(1050),
            max_comments_per_video: 10,
            output_path: PathBuf::from("data/video_sentiments.json"),
            checkpoint_path: PathBuf::from("data/video_loc.txt"),
            progress: true,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl AnnotateOptions {
    /// Conventional paths for the video-title variant under `data_dir`.
    pub fn for_videos(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            output_path: dir.join("video_sentiments.json"),
            checkpoint_path: dir.join("video_loc.txt"),
            ..Self::default()
        }
    }

    /// Conventional paths for the per-comment variant under `data_dir`.
    pub fn for_comments(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            output_path: dir.join("comment_sentiments.json"),
            checkpoint_path: dir.join("comment_loc.txt"),
            ..Self::default()
        }
    }

    pub fn with_api_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_keys = keys.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_cycle_pause(mut self, pause: Duration) -> Self {
        self.cycle_pause = pause;
        self
    }
    pub fn with_max_comments_per_video(mut self, n: usize) -> Self {
        self.max_comments_per_video = n;
        self
    }
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }
    pub fn with_checkpoint_path(mut self, path: impl AsRef<Path>) -> Self {
        self.checkpoint_path = path.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
