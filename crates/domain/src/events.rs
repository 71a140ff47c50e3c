//! Events fanned out to real-time viewers.
//!
//! Two kinds exist: a completed DNS exchange ([`ResolutionEvent`]) and a
//! free-text message typed by a viewer ([`TextEvent`]). Both are immutable
//! once built. The [`Envelope`] wrapping is produced only when the hub
//! serializes an event for delivery.

use crate::ConnectionId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;

/// A forwarded query and the upstream answer it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionEvent {
    upstream: Arc<str>,

    #[serde(rename = "timestamp", serialize_with = "serialize_timestamp")]
    created_at: DateTime<Utc>,

    /// `name|class|type` per question, in message order.
    questions: Vec<String>,

    /// One rendering per answer record, fields joined by `|`.
    answers: Vec<String>,

    #[serde(rename = "duration", serialize_with = "serialize_millis")]
    elapsed: Duration,
}

impl ResolutionEvent {
    pub fn new(
        upstream: impl Into<Arc<str>>,
        elapsed: Duration,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Self {
        Self::new_at(upstream, elapsed, questions, answers, Utc::now())
    }

    pub fn new_at(
        upstream: impl Into<Arc<str>>,
        elapsed: Duration,
        questions: Vec<String>,
        answers: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            upstream: upstream.into(),
            created_at,
            questions,
            answers,
            elapsed,
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A message typed by a viewer, already sanitized for browser rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEvent {
    sender: ConnectionId,

    message: String,

    #[serde(rename = "timestamp", serialize_with = "serialize_timestamp")]
    created_at: DateTime<Utc>,
}

impl TextEvent {
    /// Builds an event from the raw text a viewer sent.
    ///
    /// Surrounding whitespace is trimmed and the remainder HTML-escaped, so
    /// a feed that reflects the body into a page cannot be used to inject
    /// markup.
    pub fn from_raw(sender: ConnectionId, raw: &str) -> Self {
        Self::from_raw_at(sender, raw, Utc::now())
    }

    pub fn from_raw_at(sender: ConnectionId, raw: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            sender,
            message: escape_html(raw.trim()),
            created_at,
        }
    }

    pub fn sender(&self) -> &ConnectionId {
        &self.sender
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Wire tag distinguishing event kinds inside an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    #[serde(rename = "dnslog")]
    DnsLog,
    #[serde(rename = "freetext")]
    FreeText,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DnsLog => "dnslog",
            EventKind::FreeText => "freetext",
        }
    }
}

/// Any event the hub can fan out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeedEvent {
    Resolution(ResolutionEvent),
    Text(TextEvent),
}

impl FeedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FeedEvent::Resolution(_) => EventKind::DnsLog,
            FeedEvent::Text(_) => EventKind::FreeText,
        }
    }
}

impl From<ResolutionEvent> for FeedEvent {
    fn from(event: ResolutionEvent) -> Self {
        FeedEvent::Resolution(event)
    }
}

impl From<TextEvent> for FeedEvent {
    fn from(event: TextEvent) -> Self {
        FeedEvent::Text(event)
    }
}

/// `{"type": ..., "data": ...}` as delivered to every viewer.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: EventKind,
    data: &'a FeedEvent,
}

impl<'a> Envelope<'a> {
    pub fn wrap(event: &'a FeedEvent) -> Self {
        Self {
            kind: event.kind(),
            data: event,
        }
    }

    /// Serializes the envelope into the JSON text of one frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Escapes the five characters that are significant in HTML text and
/// attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(elapsed.as_millis() as u64)
}
