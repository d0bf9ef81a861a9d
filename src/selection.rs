/// Language codes tried when the caller gives no preference.
pub const DEFAULT_LANGUAGES: [&str; 4] = ["no", "en", "da", "sv"];

/// Codes accepted by the auto-generated fallback, regardless of preference.
const GENERATED_FALLBACK_CODES: [&str; 2] = ["en", "no"];

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTrack {
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    pub base_url: String,
}

impl TranscriptTrack {
    pub fn source(&self) -> &'static str {
        if self.is_generated {
            "youtube-auto"
        } else {
            "youtube-manual"
        }
    }
}

pub fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
}

/// One rule of the selection policy.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'p> {
    /// First track matching a preferred code, preferences outermost.
    Preferred(&'p [String]),
    /// First auto-generated track in English or Norwegian.
    GeneratedFallback,
    /// Whatever was listed first.
    FirstAvailable,
}

impl Strategy<'_> {
    pub fn pick<'t>(&self, tracks: &'t [TranscriptTrack]) -> Option<&'t TranscriptTrack> {
        match self {
            Strategy::Preferred(languages) => languages.iter().find_map(|code| {
                tracks.iter().find(|t| &t.language_code == code)
            }),
            Strategy::GeneratedFallback => tracks.iter().find(|t| {
                t.is_generated && GENERATED_FALLBACK_CODES.contains(&t.language_code.as_str())
            }),
            Strategy::FirstAvailable => tracks.first(),
        }
    }
}

/// Select a track by trying each strategy in turn.
pub fn select_track<'t>(
    tracks: &'t [TranscriptTrack],
    languages: &[String],
) -> Option<&'t TranscriptTrack> {
    let strategies = [
        Strategy::Preferred(languages),
        Strategy::GeneratedFallback,
        Strategy::FirstAvailable,
    ];

    strategies.iter().find_map(|strategy| strategy.pick(tracks))
}

#[cfg(test)]
pub(crate) fn track(code: &str, is_generated: bool) -> TranscriptTrack {
    TranscriptTrack {
        language: code.to_uppercase(),
        language_code: code.to_string(),
        is_generated,
        is_translatable: true,
        base_url: format!("https://www.youtube.com/api/timedtext?v=x&lang={}", code),
    }
}
