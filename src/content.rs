use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One caption unit as delivered by the structured (json3) document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// Caption content in either of the shapes the timedtext endpoint answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionContent {
    Snippets(Vec<Snippet>),
    /// Legacy list of `{start, duration, text}` objects; any key may be missing.
    Entries(Vec<Map<String, Value>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Deserialize)]
struct Json3Document {
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    t_start_ms: Option<u64>,
    d_duration_ms: Option<u64>,
    segs: Option<Vec<Json3Seg>>,
    a_append: Option<u8>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

impl CaptionContent {
    /// Parse a timedtext response body.
    pub fn from_body(body: &str) -> Result<Self> {
        let body = body.trim();
        if body.is_empty() {
            return Err(Error::InvalidCaptions("empty response body".to_string()));
        }

        let value: Value = serde_json::from_str(body)?;
        match value {
            Value::Object(ref map) if map.contains_key("events") => {
                let doc: Json3Document = serde_json::from_value(value)?;
                Ok(CaptionContent::Snippets(parse_json3_events(doc.events)))
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::InvalidCaptions(format!(
                        "expected caption object, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(CaptionContent::Entries),
            _ => Err(Error::InvalidCaptions(
                "unrecognized caption document".to_string(),
            )),
        }
    }

    pub fn unit_count(&self) -> usize {
        match self {
            CaptionContent::Snippets(snippets) => snippets.len(),
            CaptionContent::Entries(entries) => entries.len(),
        }
    }

    /// Flatten into ordered segments, numbering them from zero.
    pub fn into_segments(self) -> Vec<Segment> {
        let units: Vec<(f64, f64, String)> = match self {
            CaptionContent::Snippets(snippets) => snippets
                .into_iter()
                .map(|s| (s.start, s.duration, s.text))
                .collect(),
            CaptionContent::Entries(entries) => entries
                .into_iter()
                .map(|entry| {
                    let start = entry.get("start").and_then(Value::as_f64).unwrap_or(0.0);
                    let duration = entry.get("duration").and_then(Value::as_f64).unwrap_or(0.0);
                    let text = entry
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string();
                    (start, duration, text)
                })
                .collect(),
        };

        units
            .into_iter()
            .enumerate()
            .map(|(id, (start, duration, text))| Segment {
                id,
                start,
                end: start + duration,
                text,
            })
            .collect()
    }
}

fn parse_json3_events(events: Vec<Json3Event>) -> Vec<Snippet> {
    events
        .into_iter()
        // Window/style events carry no segs; append events only add a line break.
        .filter(|event| event.a_append.unwrap_or(0) == 0)
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.into_iter().map(|seg| seg.utf8).collect();
            Some(Snippet {
                start: event.t_start_ms.unwrap_or(0) as f64 / 1000.0,
                duration: event.d_duration_ms.unwrap_or(0) as f64 / 1000.0,
                text,
            })
        })
        .collect()
}

/// Full transcript text: segment texts joined by single spaces.
pub fn joined_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// End of the last segment, or zero for an empty transcript.
pub fn total_duration(segments: &[Segment]) -> f64 {
    segments.last().map(|s| s.end).unwrap_or(0.0)
}
