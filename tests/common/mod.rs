use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;
use ytox::{
    ApiError, ApiResult, CommentEntry, CommentList, SearchItem, SearchItemId, SearchPage,
    SearchSnippet, SearchSpec, SentimentScores, TextScorer, VideoAttrs, VideoRecord, VideoSearch,
    VideoStatistics, VideoStats,
};

/// Read a text file line-by-line into strings, skipping empty lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Build a search hit the way the endpoint reports one: full RFC3339
/// publish timestamp, title, channel fields.
pub fn search_item(video_id: &str, title: &str, published_at: &str) -> SearchItem {
    SearchItem {
        id: SearchItemId { video_id: video_id.to_string() },
        snippet: SearchSnippet {
            published_at: published_at.to_string(),
            channel_id: format!("ch-{video_id}"),
            channel_title: format!("Channel {video_id}"),
            title: title.to_string(),
            description: format!("description for {video_id}"),
        },
    }
}

/// Build an already-harvested record (capture-file shape).
pub fn record(video_id: &str, title: &str, date_published: &str, query: &str) -> VideoRecord {
    VideoRecord {
        title: title.to_string(),
        attrs: VideoAttrs {
            video_id: video_id.to_string(),
            channel_id: format!("ch-{video_id}"),
            channel_title: format!("Channel {video_id}"),
            date_published: date_published.to_string(),
            description: String::new(),
            query: query.to_string(),
            duration: None,
            views: None,
            likes: None,
            favorites: None,
            comments: None,
        },
    }
}

pub fn comment(text: &str, likes: i64, reply_count: i64) -> CommentEntry {
    CommentEntry { text: text.to_string(), likes, reply_count }
}

/// Uniform score vector, handy for asserting which scorer answered.
pub fn uniform_scores(value: f64) -> SentimentScores {
    SentimentScores {
        toxicity: value,
        severe_toxicity: value,
        identity_attack: value,
        insult: value,
        profanity: value,
        threat: value,
    }
}

/// Scripted search backend: per query, a queue of pages handed out in
/// request order. Records every request so tests can assert call budgets.
/// A query that runs out of scripted pages serves an empty, exhausted page.
pub struct ScriptedSearch {
    pages: RefCell<BTreeMap<String, Vec<SearchPage>>>,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self { pages: RefCell::new(BTreeMap::new()), calls: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn push_page(&self, query: &str, items: Vec<SearchItem>, next_token: Option<&str>) {
        self.pages.borrow_mut().entry(query.to_string()).or_default().push(SearchPage {
            items,
            next_page_token: next_token.map(|t| t.to_string()),
        });
    }
}

impl VideoSearch for ScriptedSearch {
    fn search_page(
        &self,
        query: &str,
        _spec: &SearchSpec,
        _page_token: Option<&str>,
    ) -> ApiResult<SearchPage> {
        self.calls.borrow_mut().push(query.to_string());
        let mut pages = self.pages.borrow_mut();
        match pages.get_mut(query) {
            Some(queue) if !queue.is_empty() => Ok(queue.remove(0)),
            _ => Ok(SearchPage { items: Vec::new(), next_page_token: None }),
        }
    }
}

/// Scorer that always succeeds with a uniform score and logs each text.
pub struct FixedScorer {
    pub value: f64,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl FixedScorer {
    pub fn new(value: f64) -> Self {
        Self { value, calls: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl TextScorer for FixedScorer {
    fn score(&self, text: &str) -> ApiResult<SentimentScores> {
        self.calls.borrow_mut().push(text.to_string());
        Ok(uniform_scores(self.value))
    }
}

/// Scorer that always fails with a transient (quota-shaped) error.
pub struct FailingScorer {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl FailingScorer {
    pub fn new() -> Self {
        Self { calls: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl TextScorer for FailingScorer {
    fn score(&self, text: &str) -> ApiResult<SentimentScores> {
        self.calls.borrow_mut().push(text.to_string());
        Err(ApiError::Api { status: 429, message: "quota exceeded".to_string() })
    }
}

/// Statistics backend over a fixed map; absent ids report `None`.
pub struct FixedStats {
    pub map: BTreeMap<String, VideoStatistics>,
}

impl FixedStats {
    pub fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    pub fn insert(&mut self, requested_id: &str, stats: VideoStatistics) {
        self.map.insert(requested_id.to_string(), stats);
    }
}

impl VideoStats for FixedStats {
    fn video_statistics(&self, video_id: &str) -> ApiResult<Option<VideoStatistics>> {
        Ok(self.map.get(video_id).cloned())
    }
}

pub fn stats(id: &str, duration: &str, views: &str) -> VideoStatistics {
    VideoStatistics {
        id: id.to_string(),
        duration: duration.to_string(),
        views: views.to_string(),
        likes: Some("10".to_string()),
        favorites: None,
        comments: Some("3".to_string()),
    }
}

/// Scripted comment listing: `Ok` lists, transient failures, or a fatal
/// decode failure per video id.
pub enum CommentOutcome {
    Comments(Vec<CommentEntry>),
    Transient,
    Fatal,
}

pub struct ScriptedComments {
    pub map: BTreeMap<String, CommentOutcome>,
}

impl ScriptedComments {
    pub fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    pub fn insert(&mut self, video_id: &str, outcome: CommentOutcome) {
        self.map.insert(video_id.to_string(), outcome);
    }
}

impl CommentList for ScriptedComments {
    fn list_comments(&self, video_id: &str, _page_size: u32) -> ApiResult<Vec<CommentEntry>> {
        match self.map.get(video_id) {
            Some(CommentOutcome::Comments(list)) => Ok(list.clone()),
            Some(CommentOutcome::Transient) => {
                Err(ApiError::Api { status: 403, message: "comments disabled".to_string() })
            }
            Some(CommentOutcome::Fatal) => {
                Err(ApiError::Parse("unexpected response shape".to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}
