use crate::error::{ApiError, ApiResult};
use crate::records::SentimentScores;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const ANALYZE_URL: &str =
    "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

/// Scores one text against the six toxicity-family attributes.
/// Implemented by [`PerspectiveClient`]; tests script it.
pub trait TextScorer {
    fn score(&self, text: &str) -> ApiResult<SentimentScores>;
}

pub struct PerspectiveClient {
    http: reqwest::blocking::Client,
    key: String,
}

impl PerspectiveClient {
    pub fn new(key: impl Into<String>) -> Self {
        Self { http: reqwest::blocking::Client::new(), key: key.into() }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(rename = "attributeScores")]
    attribute_scores: AttributeScores,
}

#[derive(Debug, Deserialize)]
struct AttributeScores {
    #[serde(rename = "TOXICITY")]
    toxicity: AttributeScore,
    #[serde(rename = "SEVERE_TOXICITY")]
    severe_toxicity: AttributeScore,
    #[serde(rename = "IDENTITY_ATTACK")]
    identity_attack: AttributeScore,
    #[serde(rename = "INSULT")]
    insult: AttributeScore,
    #[serde(rename = "PROFANITY")]
    profanity: AttributeScore,
    #[serde(rename = "THREAT")]
    threat: AttributeScore,
}

#[derive(Debug, Deserialize)]
struct AttributeScore {
    #[serde(rename = "spanScores")]
    span_scores: Vec<SpanScore>,
}

#[derive(Debug, Deserialize)]
struct SpanScore {
    score: ScoreValue,
}

#[derive(Debug, Deserialize)]
struct ScoreValue {
    value: f64,
}

impl AttributeScore {
    fn first(&self, attr: &str) -> ApiResult<f64> {
        self.span_scores
            .first()
            .map(|s| s.score.value)
            .ok_or_else(|| ApiError::Parse(format!("no span scores for {attr}")))
    }
}

impl TextScorer for PerspectiveClient {
    fn score(&self, text: &str) -> ApiResult<SentimentScores> {
        let body = json!({
            "comment": { "text": text },
            "requestedAttributes": {
                "TOXICITY": {}, "SEVERE_TOXICITY": {}, "IDENTITY_ATTACK": {},
                "INSULT": {}, "PROFANITY": {}, "THREAT": {}
            }
        });
        let resp = self
            .http
            .post(ANALYZE_URL)
            .query(&[("key", self.key.as_str())])
            .json(&body)
            .send()?;
        let status = resp.status();
        let text_body = resp.text()?;
        if !status.is_success() {
            return Err(ApiError::Api { status: status.as_u16(), message: text_body });
        }
        let parsed: AnalyzeResponse = serde_json::from_str(&text_body)?;
        let a = parsed.attribute_scores;
        Ok(SentimentScores {
            toxicity: a.toxicity.first("TOXICITY")?,
            severe_toxicity: a.severe_toxicity.first("SEVERE_TOXICITY")?,
            identity_attack: a.identity_attack.first("IDENTITY_ATTACK")?,
            insult: a.insult.first("INSULT")?,
            profanity: a.profanity.first("PROFANITY")?,
            threat: a.threat.first("THREAT")?,
        })
    }
}

/// Ordered pool of interchangeable scoring clients. Requests round-robin
/// across the pool; after each full cycle the pool sleeps `cycle_pause` to
/// stay under the per-credential requests-per-second ceiling. The pool
/// multiplexes quota, it does not parallelize: calls stay strictly
/// sequential.
pub struct ScorerPool<S> {
    scorers: Vec<S>,
    cycle_pause: Duration,
    cursor: usize,
}

impl<S: TextScorer> ScorerPool<S> {
    pub fn new(scorers: Vec<S>, cycle_pause: Duration) -> Self {
        assert!(!scorers.is_empty(), "scorer pool must hold at least one client");
        Self { scorers, cycle_pause, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Submit one text to the next client in rotation.
    pub fn score_next(&mut self, text: &str) -> ApiResult<SentimentScores> {
        let out = self.scorers[self.cursor].score(text);
        self.cursor += 1;
        if self.cursor == self.scorers.len() {
            self.cursor = 0;
            std::thread::sleep(self.cycle_pause);
        }
        out
    }
}

impl ScorerPool<PerspectiveClient> {
    /// Build a pool from an ordered credential list.
    pub fn from_keys(keys: &[String], cycle_pause: Duration) -> Self {
        Self::new(keys.iter().map(PerspectiveClient::new).collect(), cycle_pause)
    }
}
