use axum::body::Bytes;
use parley_core::AudioFormat;
use serde::{Deserialize, Serialize};

/// Validated upload from `/api/transcribe`
#[derive(Debug)]
pub struct TranscribeRequest {
    /// Raw audio data
    pub audio: Bytes,
    /// Sanitized filename, safe to use as a path component
    pub filename: String,
    /// Container format derived from the filename extension
    pub format: AudioFormat,
}

/// Transcription result returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscribeResponse {
    /// Transcript, or a sentinel describing why there is none
    pub text: String,
}

/// Audio handed to a recognition engine
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// The complete recorded signal as stored on disk
    pub audio: Vec<u8>,
    pub format: AudioFormat,
    pub filename: String,
}

/// Outcome of a recognition attempt
///
/// Unintelligible audio and an unreachable recognition service are routine
/// outcomes, not failures. They reach the client as 200 responses carrying a
/// sentinel text, so callers have to inspect the text rather than the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Transcript(String),
    Unintelligible,
    ServiceUnavailable,
}

impl Recognition {
    pub const UNINTELLIGIBLE_TEXT: &'static str = "Could not understand audio";
    pub const UNAVAILABLE_TEXT: &'static str = "Speech recognition service unavailable";

    /// Treat a blank transcript as unintelligible audio
    pub fn from_transcript(text: String) -> Self {
        if text.trim().is_empty() {
            Self::Unintelligible
        } else {
            Self::Transcript(text)
        }
    }

    /// Text sent back to the client
    pub fn into_text(self) -> String {
        match self {
            Self::Transcript(text) => text,
            Self::Unintelligible => Self::UNINTELLIGIBLE_TEXT.to_string(),
            Self::ServiceUnavailable => Self::UNAVAILABLE_TEXT.to_string(),
        }
    }
}
