use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("No transcripts found in languages: {}", language_list(.0))]
    NoTranscriptFound(Vec<String>),

    #[error("Invalid video id {0:?}: pass the video id, not the URL")]
    InvalidVideoId(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Video is age restricted and requires login")]
    AgeRestricted,

    #[error("YouTube is blocking requests from this IP: {0}")]
    RequestBlocked(String),

    #[error("Too many requests sent to YouTube (HTTP 429)")]
    TooManyRequests,

    #[error("Video is unplayable: {0}")]
    Unplayable(String),

    #[error("Failed to create consent cookie")]
    ConsentCookie,

    #[error("Caption track requires a PO token and cannot be fetched")]
    PoTokenRequired,

    #[error("Failed to extract caption tracks: {0}")]
    ExtractionFailed(String),

    #[error("Failed to parse caption content: {0}")]
    InvalidCaptions(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid caption URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Coarse classification reported in the `error` field of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    TranscriptsDisabled,
    NoTranscriptFound,
    UnknownError,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TranscriptsDisabled => ErrorKind::TranscriptsDisabled,
            Error::NoTranscriptFound(_) => ErrorKind::NoTranscriptFound,
            _ => ErrorKind::UnknownError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Render codes as `['no', 'en']`.
fn language_list(codes: &[String]) -> String {
    let quoted: Vec<String> = codes.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}
