use async_trait::async_trait;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::content::{joined_text, total_duration, CaptionContent, Segment};
use crate::error::{Error, ErrorKind, Result};
use crate::selection::{default_languages, select_track, TranscriptTrack};

/// Where caption tracks are listed and downloaded from.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Available tracks for a video, in the order the service reports them.
    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>>;

    async fn fetch(&self, track: &TranscriptTrack) -> Result<CaptionContent>;
}

#[derive(Debug, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
    pub language_code: String,
    pub duration: f64,
    pub source: &'static str,
    pub is_generated: bool,
}

#[derive(Debug, Serialize)]
pub struct FetchFailure {
    pub error: ErrorKind,
    pub message: String,
}

/// Serialized as the inner record with a leading `success` flag taken from the variant.
#[derive(Debug)]
pub enum FetchResult {
    Success(Transcript),
    Failure(FetchFailure),
}

#[derive(Serialize)]
struct Flagged<'a, T> {
    success: bool,
    #[serde(flatten)]
    record: &'a T,
}

impl Serialize for FetchResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FetchResult::Success(record) => Flagged { success: true, record }.serialize(serializer),
            FetchResult::Failure(record) => Flagged { success: false, record }.serialize(serializer),
        }
    }
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}

impl From<Error> for FetchResult {
    fn from(err: Error) -> Self {
        FetchResult::Failure(FetchFailure {
            error: err.kind(),
            message: err.to_string(),
        })
    }
}

/// Fetch the best matching transcript for `video_id`.
///
/// `languages` falls back to [`default_languages`] when absent. Every failure
/// is folded into [`FetchResult::Failure`].
pub async fn fetch_transcript<S>(
    source: &S,
    video_id: &str,
    languages: Option<Vec<String>>,
) -> FetchResult
where
    S: TranscriptSource + ?Sized,
{
    let languages = languages.unwrap_or_else(default_languages);

    match try_fetch(source, video_id, &languages).await {
        Ok(transcript) => FetchResult::Success(transcript),
        Err(err) => {
            debug!(error = %err, "transcript fetch failed");
            err.into()
        }
    }
}

async fn try_fetch<S>(source: &S, video_id: &str, languages: &[String]) -> Result<Transcript>
where
    S: TranscriptSource + ?Sized,
{
    let tracks = source.list(video_id).await?;
    debug!(count = tracks.len(), "listed caption tracks");

    let track = select_track(&tracks, languages)
        .ok_or_else(|| Error::NoTranscriptFound(languages.to_vec()))?;
    info!(
        language_code = %track.language_code,
        is_generated = track.is_generated,
        is_translatable = track.is_translatable,
        "selected caption track"
    );

    let content = source.fetch(track).await?;
    debug!(units = content.unit_count(), "fetched caption content");

    let segments = content.into_segments();

    Ok(Transcript {
        video_id: video_id.to_string(),
        text: joined_text(&segments),
        duration: total_duration(&segments),
        segments,
        language: track.language.clone(),
        language_code: track.language_code.clone(),
        source: track.source(),
        is_generated: track.is_generated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Snippet;
    use crate::selection::track;
    use std::sync::Mutex;

    struct StubSource {
        tracks: Vec<TranscriptTrack>,
        list_error: Option<fn() -> Error>,
        fetch_error: Option<fn() -> Error>,
        content: CaptionContent,
        fetched: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(tracks: Vec<TranscriptTrack>) -> Self {
            Self {
                tracks,
                list_error: None,
                fetch_error: None,
                content: CaptionContent::Snippets(vec![
                    Snippet { start: 0.0, duration: 2.0, text: "a".into() },
                    Snippet { start: 2.0, duration: 3.0, text: "b".into() },
                ]),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranscriptSource for StubSource {
        async fn list(&self, _video_id: &str) -> Result<Vec<TranscriptTrack>> {
            match self.list_error {
                Some(make) => Err(make()),
                None => Ok(self.tracks.clone()),
            }
        }

        async fn fetch(&self, track: &TranscriptTrack) -> Result<CaptionContent> {
            self.fetched.lock().unwrap().push(track.language_code.clone());
            match self.fetch_error {
                Some(make) => Err(make()),
                None => Ok(self.content.clone()),
            }
        }
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    fn expect_success(result: FetchResult) -> Transcript {
        match result {
            FetchResult::Success(transcript) => transcript,
            FetchResult::Failure(failure) => panic!("expected success, got {:?}", failure),
        }
    }

    fn expect_failure(result: FetchResult) -> FetchFailure {
        match result {
            FetchResult::Failure(failure) => failure,
            FetchResult::Success(transcript) => panic!("expected failure, got {:?}", transcript),
        }
    }

    #[tokio::test]
    async fn test_success_record() {
        let source = StubSource::new(vec![track("en", true), track("no", false)]);
        let transcript = expect_success(fetch_transcript(&source, "abc123", None).await);

        assert_eq!(transcript.video_id, "abc123");
        assert_eq!(transcript.language_code, "no");
        assert_eq!(transcript.language, "NO");
        assert_eq!(transcript.source, "youtube-manual");
        assert!(!transcript.is_generated);
        assert_eq!(transcript.text, "a b");
        assert_eq!(transcript.duration, 5.0);
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[1].end, 5.0);
        assert_eq!(source.fetched(), vec!["no"]);
    }

    #[tokio::test]
    async fn test_default_languages_match_explicit_list() {
        let tracks = vec![
            track("sv", false),
            track("da", false),
            track("en", true),
            track("no", true),
        ];

        let implicit = StubSource::new(tracks.clone());
        let explicit = StubSource::new(tracks);

        let a = expect_success(fetch_transcript(&implicit, "v", None).await);
        let b = expect_success(
            fetch_transcript(&explicit, "v", Some(langs(&["no", "en", "da", "sv"]))).await,
        );

        assert_eq!(a.language_code, "no");
        assert_eq!(a.language_code, b.language_code);
        assert_eq!(a.source, "youtube-auto");
    }

    #[tokio::test]
    async fn test_explicit_empty_preferences_use_fallbacks() {
        let source = StubSource::new(vec![track("fr", false), track("en", true)]);
        let transcript = expect_success(fetch_transcript(&source, "v", Some(Vec::new())).await);
        assert_eq!(transcript.language_code, "en");
    }

    #[tokio::test]
    async fn test_no_tracks() {
        let source = StubSource::new(Vec::new());
        let failure = expect_failure(fetch_transcript(&source, "v", Some(langs(&["de"]))).await);

        assert_eq!(failure.error, ErrorKind::NoTranscriptFound);
        assert_eq!(failure.message, "No transcripts found in languages: ['de']");
        assert!(source.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_transcripts() {
        let mut source = StubSource::new(Vec::new());
        source.list_error = Some(|| Error::TranscriptsDisabled);

        let failure = expect_failure(fetch_transcript(&source, "v", None).await);
        assert_eq!(failure.error, ErrorKind::TranscriptsDisabled);
        assert_eq!(failure.message, "Transcripts are disabled for this video");
    }

    #[tokio::test]
    async fn test_fetch_error_is_unknown() {
        let mut source = StubSource::new(vec![track("en", false)]);
        source.fetch_error = Some(|| Error::InvalidCaptions("empty response body".into()));

        let failure = expect_failure(fetch_transcript(&source, "v", None).await);
        assert_eq!(failure.error, ErrorKind::UnknownError);
        assert_eq!(failure.message, "Failed to parse caption content: empty response body");
    }

    #[tokio::test]
    async fn test_empty_content() {
        let mut source = StubSource::new(vec![track("en", true)]);
        source.content = CaptionContent::Entries(Vec::new());

        let transcript = expect_success(fetch_transcript(&source, "v", None).await);
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.text, "");
        assert_eq!(transcript.duration, 0.0);
        assert_eq!(transcript.source, "youtube-auto");
    }

    #[tokio::test]
    async fn test_json_field_order() {
        let source = StubSource::new(vec![track("no", false)]);
        let result = fetch_transcript(&source, "v", None).await;
        let json = serde_json::to_string_pretty(&result).unwrap();

        assert!(json.starts_with("{\n  \"success\": true,\n  \"video_id\": \"v\",\n  \"text\": \"a b\""));
        assert!(json.contains("\"source\": \"youtube-manual\""));

        let failure: FetchResult = Error::TranscriptsDisabled.into();
        let json = serde_json::to_string_pretty(&failure).unwrap();
        assert_eq!(
            json,
            "{\n  \"success\": false,\n  \"error\": \"TRANSCRIPTS_DISABLED\",\n  \"message\": \"Transcripts are disabled for this video\"\n}"
        );
    }

    #[tokio::test]
    async fn test_success_flag_follows_variant() {
        let source = StubSource::new(vec![track("en", false)]);
        let ok = serde_json::to_value(fetch_transcript(&source, "v", None).await).unwrap();
        assert_eq!(ok["success"], true);
        assert!(ok.get("error").is_none());

        let mut source = StubSource::new(vec![track("en", false)]);
        source.fetch_error = Some(|| Error::TooManyRequests);
        let failed = serde_json::to_value(fetch_transcript(&source, "v", None).await).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "UNKNOWN_ERROR");
        assert!(failed.get("segments").is_none());
    }
}
