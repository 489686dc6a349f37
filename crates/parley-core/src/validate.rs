//! Pure checks on request data
//!
//! Nothing here touches the filesystem or an engine, so a rejected request
//! leaves no trace behind.

use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

use crate::error::Rejection;

pub const NOT_JSON: &str = "Request must be JSON";

/// Lowercased media type of the request, without parameters
fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
}

/// Whether the request declares a JSON body (`application/json` or `application/*+json`)
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    media_type(headers)
        .is_some_and(|mime| mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")))
}

/// Whether the request declares a `multipart/form-data` body
pub fn is_multipart_form_data(headers: &HeaderMap) -> bool {
    media_type(headers).is_some_and(|mime| mime == "multipart/form-data")
}

/// Parse a body that must be a JSON object
pub fn json_object(bytes: &[u8]) -> Result<Map<String, Value>, Rejection> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(Rejection::BadRequest(NOT_JSON)),
    }
}

/// Fetch a string field that must be present and non-empty
///
/// Missing, `null`, non-string and empty values are all rejected with `message`.
pub fn required_text(object: &Map<String, Value>, field: &str, message: &'static str) -> Result<String, Rejection> {
    match object.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(Rejection::BadRequest(message)),
    }
}

/// Audio container formats accepted for transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
}

impl AudioFormat {
    /// Resolve the format from the extension after the last `.`, case-insensitively
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;

        match extension.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
        }
    }
}

/// Reduce a client-supplied filename to something safe to use as a path component
///
/// The name is NFKD-decomposed and reduced to ASCII, so accented letters
/// keep their base letter (`café` becomes `cafe`). Path separators become
/// word breaks, whitespace runs collapse to `_`, and anything outside
/// `[A-Za-z0-9_.-]` is dropped. Leading and trailing `.`/`_`
/// are trimmed so the result can never name a parent or hidden entry. The
/// result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("application/vnd.api+json")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn multipart_content_type_ignores_case() {
        assert!(is_multipart_form_data(&headers("multipart/form-data; boundary=b")));
        assert!(is_multipart_form_data(&headers("Multipart/Form-Data; boundary=b")));
        assert!(is_multipart_form_data(&headers(" MULTIPART/FORM-DATA ;boundary=b")));
        assert!(!is_multipart_form_data(&headers("multipart/mixed; boundary=b")));
        assert!(!is_multipart_form_data(&headers("application/json")));
        assert!(!is_multipart_form_data(&HeaderMap::new()));
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(json_object(br#"{"prompt":"hi"}"#).is_ok());
        assert_eq!(json_object(b"not json"), Err(Rejection::BadRequest(NOT_JSON)));
        assert_eq!(json_object(br#"["prompt"]"#), Err(Rejection::BadRequest(NOT_JSON)));
    }

    #[test]
    fn required_text_rejects_empty_and_mistyped_values() {
        let message = "No text provided";
        let cases = [json!({}), json!({"text": null}), json!({"text": ""}), json!({"text": 42})];

        for case in cases {
            let object = case.as_object().unwrap();
            assert_eq!(required_text(object, "text", message), Err(Rejection::BadRequest(message)));
        }

        let object = json!({"text": "hi"});
        assert_eq!(required_text(object.as_object().unwrap(), "text", message).unwrap(), "hi");
    }

    #[test]
    fn audio_formats_from_extension() {
        assert_eq!(AudioFormat::from_filename("clip.wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_filename("CLIP.MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_filename("voice.note.ogg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_filename("clip.flac"), None);
        assert_eq!(AudioFormat::from_filename("wav"), None);
        assert_eq!(AudioFormat::from_filename("clip.wav.exe"), None);
    }

    #[test]
    fn secure_filename_strips_traversal() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\windows\\clip.wav"), "windows_clip.wav");
        assert_eq!(secure_filename("My cool  recording.wav"), "My_cool_recording.wav");
        assert_eq!(secure_filename("quote\"d;rm -rf.mp3"), "quotedrm_-rf.mp3");
        assert_eq!(secure_filename(".hidden.ogg"), "hidden.ogg");
        assert_eq!(secure_filename("../"), "");
    }

    #[test]
    fn secure_filename_transliterates_accents() {
        assert_eq!(secure_filename("café.wav"), "cafe.wav");
        assert_eq!(secure_filename("Ångström réunion.mp3"), "Angstrom_reunion.mp3");
        assert_eq!(secure_filename("ｆｕｌｌｗｉｄｔｈ.ogg"), "fullwidth.ogg");
        assert_eq!(secure_filename("日本語.wav"), "wav");
    }
}
