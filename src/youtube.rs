use crate::date::{day_of, PublishWindow};
use crate::error::{ApiError, ApiResult};
use crate::records::{CommentEntry, VideoAttrs, VideoRecord};
use serde::Deserialize;

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Server-side projection for search pages; keeps quota cost and payloads down.
const SEARCH_FIELDS: &str =
    "nextPageToken,items(id(videoId),snippet(publishedAt,channelId,channelTitle,title,description))";

/// Search parameters held constant across one harvest run.
#[derive(Clone, Debug)]
pub struct SearchSpec {
    pub language: String,
    pub region: String,
    pub window: PublishWindow,
    pub page_size: u32,
}

/// One page of search results plus the continuation token for the next page.
/// An absent token means the query is exhausted.
#[derive(Clone, Debug)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    pub title: String,
    pub description: String,
}

impl SearchItem {
    /// Shape a search hit into the capture-file record for `query`.
    pub fn into_record(self, query: &str) -> VideoRecord {
        VideoRecord {
            title: self.snippet.title,
            attrs: VideoAttrs {
                video_id: self.id.video_id,
                channel_id: self.snippet.channel_id,
                channel_title: self.snippet.channel_title,
                date_published: day_of(&self.snippet.published_at).to_string(),
                description: self.snippet.description,
                query: query.to_string(),
                duration: None,
                views: None,
                likes: None,
                favorites: None,
                comments: None,
            },
        }
    }
}

/// Per-video statistics and content details, as reported by the endpoint.
/// Counts stay strings because that is how the endpoint serializes them.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoStatistics {
    pub id: String,
    pub duration: String, // ISO8601 with the leading "PT" stripped
    pub views: String,
    pub likes: Option<String>,
    pub favorites: Option<String>,
    pub comments: Option<String>,
}

/// Paginated video search. Implemented by [`YouTubeClient`]; tests script it.
pub trait VideoSearch {
    fn search_page(
        &self,
        query: &str,
        spec: &SearchSpec,
        page_token: Option<&str>,
    ) -> ApiResult<SearchPage>;
}

/// One page of top-level comments for a video.
pub trait CommentList {
    fn list_comments(&self, video_id: &str, page_size: u32) -> ApiResult<Vec<CommentEntry>>;
}

/// Per-video statistics lookup. `None` when the endpoint no longer knows the id.
pub trait VideoStats {
    fn video_statistics(&self, video_id: &str) -> ApiResult<Option<VideoStatistics>>;
}

// ---------------- HTTP client ----------------

pub struct YouTubeClient {
    http: reqwest::blocking::Client,
    key: String,
}

impl YouTubeClient {
    pub fn new(key: impl Into<String>) -> Self {
        Self { http: reqwest::blocking::Client::new(), key: key.into() }
    }

    /// Issue a GET and decode the body, mapping non-2xx responses to
    /// `ApiError::Api` and undecodable bodies to `ApiError::Parse`.
    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<T> {
        let resp = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.key.as_str())])
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(ApiError::Api { status: status.as_u16(), message: body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<SearchItem>,
}

impl VideoSearch for YouTubeClient {
    fn search_page(
        &self,
        query: &str,
        spec: &SearchSpec,
        page_token: Option<&str>,
    ) -> ApiResult<SearchPage> {
        let url = format!("{}/search", BASE_URL);
        let page_size = spec.page_size.to_string();
        let published_after = spec.window.published_after();
        let published_before = spec.window.published_before();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "id,snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", page_size.as_str()),
            ("relevanceLanguage", spec.language.as_str()),
            ("regionCode", spec.region.as_str()),
            ("publishedAfter", published_after.as_str()),
            ("publishedBefore", published_before.as_str()),
            ("order", "viewCount"),
            ("fields", SEARCH_FIELDS),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let resp: SearchResponse = self.get_json(&url, &params)?;
        Ok(SearchPage { items: resp.items, next_page_token: resp.next_page_token })
    }
}

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
    #[serde(rename = "totalReplyCount")]
    total_reply_count: i64,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: TopLevelCommentSnippet,
}

#[derive(Debug, Deserialize)]
struct TopLevelCommentSnippet {
    #[serde(rename = "textDisplay")]
    text_display: String,
    #[serde(rename = "likeCount")]
    like_count: i64,
}

impl CommentList for YouTubeClient {
    fn list_comments(&self, video_id: &str, page_size: u32) -> ApiResult<Vec<CommentEntry>> {
        let url = format!("{}/commentThreads", BASE_URL);
        let page_size = page_size.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("part", "id,snippet"),
            ("videoId", video_id),
            ("maxResults", page_size.as_str()),
            ("order", "relevance"),
            ("textFormat", "plainText"),
        ];
        let resp: CommentThreadsResponse = self.get_json(&url, &params)?;
        Ok(resp
            .items
            .into_iter()
            .map(|t| CommentEntry {
                text: t.snippet.top_level_comment.snippet.text_display,
                likes: t.snippet.top_level_comment.snippet.like_count,
                reply_count: t.snippet.total_reply_count,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Statistics,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: String,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "favoriteCount")]
    favorite_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

impl VideoStats for YouTubeClient {
    fn video_statistics(&self, video_id: &str) -> ApiResult<Option<VideoStatistics>> {
        let url = format!("{}/videos", BASE_URL);
        let params: Vec<(&str, &str)> =
            vec![("part", "id,statistics,contentDetails"), ("id", video_id)];
        let resp: VideosResponse = self.get_json(&url, &params)?;
        let Some(item) = resp.items.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(VideoStatistics {
            id: item.id,
            duration: item.content_details.duration.replace("PT", ""),
            views: item.statistics.view_count,
            likes: item.statistics.like_count,
            favorites: item.statistics.favorite_count,
            comments: item.statistics.comment_count,
        }))
    }
}
