use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attribute set stored for one harvested video. The wire format keys the
/// whole set by the human-readable title, so the title itself lives on
/// [`VideoRecord`] rather than in here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoAttrs {
    pub video_id: String,
    pub channel_id: String,
    pub channel_title: String,
    /// Zero-padded ISO date; sorts chronologically as a plain string.
    pub date_published: String,
    pub description: String,
    pub query: String,

    // Statistics enrichment, absent until `attach_statistics` runs.
    // Counts stay strings because the endpoint reports them that way.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub views: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub likes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub favorites: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comments: Option<String>,
}

/// One harvested record: on the wire, a single-entry JSON object mapping the
/// video title to its attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoRecord {
    pub title: String,
    pub attrs: VideoAttrs,
}

impl VideoRecord {
    pub fn to_line(&self) -> Result<String> {
        let mut obj = Map::with_capacity(1);
        obj.insert(self.title.clone(), serde_json::to_value(&self.attrs)?);
        Ok(Value::Object(obj).to_string())
    }

    pub fn from_line(line: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(line).context("record line is not valid JSON")?;
        Self::from_value(v)
    }

    pub fn from_value(v: Value) -> Result<Self> {
        let (title, attrs) = single_entry(v)?;
        let attrs = serde_json::from_value(attrs).context("record attributes")?;
        Ok(Self { title, attrs })
    }
}

/// One top-level comment as stored in the comment sets file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentEntry {
    #[serde(rename = "comment")]
    pub text: String,
    pub likes: i64,
    pub reply_count: i64,
}

/// Comment lists keyed by video id. Sorted-key iteration keeps the
/// annotator's item order deterministic across runs, which index-based
/// resume depends on.
pub type CommentSets = BTreeMap<String, Vec<CommentEntry>>;

/// Six bounded [0,1] attribute scores returned by the scoring endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub toxicity: f64,
    pub severe_toxicity: f64,
    pub identity_attack: f64,
    pub insult: f64,
    pub profanity: f64,
    pub threat: f64,
}

/// Annotated-video output line: `{video_id: scores}`, with an empty object
/// when every scoring call for the video failed.
pub fn video_sentiment_line(video_id: &str, scores: Option<&SentimentScores>) -> Result<String> {
    let value = match scores {
        Some(s) => serde_json::to_value(s)?,
        None => Value::Object(Map::new()),
    };
    let mut obj = Map::with_capacity(1);
    obj.insert(video_id.to_string(), value);
    Ok(Value::Object(obj).to_string())
}

pub fn parse_video_sentiment_line(line: &str) -> Result<(String, Option<SentimentScores>)> {
    let v: Value = serde_json::from_str(line).context("sentiment line is not valid JSON")?;
    let (video_id, scores) = single_entry(v)?;
    let empty = scores.as_object().map(|m| m.is_empty()).unwrap_or(false);
    if empty {
        return Ok((video_id, None));
    }
    let scores = serde_json::from_value(scores).context("sentiment scores")?;
    Ok((video_id, Some(scores)))
}

/// Annotated-comments output line: `{video_id: {comment_text: scores, ...}}`,
/// empty inner object when nothing succeeded for the video.
pub fn comment_sentiment_line(
    video_id: &str,
    scored: &BTreeMap<String, SentimentScores>,
) -> Result<String> {
    let mut obj = Map::with_capacity(1);
    obj.insert(video_id.to_string(), serde_json::to_value(scored)?);
    Ok(Value::Object(obj).to_string())
}

pub fn parse_comment_sentiment_line(
    line: &str,
) -> Result<(String, BTreeMap<String, SentimentScores>)> {
    let v: Value = serde_json::from_str(line).context("sentiment line is not valid JSON")?;
    let (video_id, scored) = single_entry(v)?;
    let scored = serde_json::from_value(scored).context("per-comment sentiment scores")?;
    Ok((video_id, scored))
}

/// Split a single-entry JSON object into its key and value.
fn single_entry(v: Value) -> Result<(String, Value)> {
    let obj = match v {
        Value::Object(m) => m,
        _ => return Err(anyhow!("expected a JSON object")),
    };
    let mut entries = obj.into_iter();
    let entry = entries.next().ok_or_else(|| anyhow!("object has no entries"))?;
    if entries.next().is_some() {
        return Err(anyhow!("object has more than one entry"));
    }
    Ok(entry)
}
