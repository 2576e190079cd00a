use crate::config::HarvestOptions;
use crate::ndjson::NdjsonWriter;
use crate::progress::ProgressScope;
use crate::util::init_tracing_once;
use crate::youtube::{SearchSpec, VideoSearch};
use anyhow::{Context, Result};
use std::fs;

/// Continuation state for one query. A `None` token means "start from the
/// first page" on iteration 0 and "exhausted" on every later iteration.
struct QueryCursor {
    query: String,
    token: Option<String>,
}

/// Paginated search harvester. Walks the fixed query list up to
/// `max_iterations` times, appending one JSON line per result to the shared
/// capture log. Any request or decode error propagates and halts the run;
/// a rerun starts from iteration 0 and re-collects exhausted queries, which
/// the later dedup pass absorbs.
pub struct Collector<S> {
    search: S,
    opts: HarvestOptions,
}

impl<S: VideoSearch> Collector<S> {
    pub fn new(search: S, opts: HarvestOptions) -> Self {
        Self { search, opts }
    }

    /// Run the harvest. Returns the number of records appended.
    pub fn run(&mut self) -> Result<u64> {
        init_tracing_once();

        if let Some(dir) = self.opts.capture_file.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = NdjsonWriter::append(&self.opts.capture_file, self.opts.write_buffer_bytes)
            .with_context(|| format!("open capture log {}", self.opts.capture_file.display()))?;

        let spec = SearchSpec {
            language: self.opts.language.clone(),
            region: self.opts.region.clone(),
            window: self.opts.window,
            page_size: self.opts.page_size,
        };
        let mut cursors: Vec<QueryCursor> = self
            .opts
            .queries
            .iter()
            .map(|q| QueryCursor { query: q.clone(), token: None })
            .collect();

        let total_requests = (self.opts.max_iterations * cursors.len()) as u64;
        let pb = ProgressScope::count("Harvest: search pages", total_requests, self.opts.progress);

        let mut appended = 0u64;
        for iteration in 0..self.opts.max_iterations {
            for cur in cursors.iter_mut() {
                if cur.token.is_none() && iteration > 0 {
                    continue; // exhausted
                }
                let page = self
                    .search
                    .search_page(&cur.query, &spec, cur.token.as_deref())
                    .with_context(|| format!("search page for query {:?}", cur.query))?;
                cur.token = page.next_page_token;
                for item in page.items {
                    let record = item.into_record(&cur.query);
                    writer.write_line(&record.to_line()?)?;
                    appended += 1;
                }
                // The log is append-only; flushing per page bounds what a
                // killed run can lose to the current page.
                writer.flush()?;
                pb.inc(1);
            }
            tracing::debug!(iteration, appended, "harvest iteration complete");
        }

        writer.finish()?;
        pb.finish("harvest done");
        tracing::info!(appended, "capture log extended");
        Ok(appended)
    }
}
