use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::SttError,
    types::{AudioClip, Recognition},
};

use super::{Recognizer, classify_status, unreachable};

const DEFAULT_DEEPGRAM_API_URL: &str = "https://api.deepgram.com/v1";
const DEFAULT_DEEPGRAM_MODEL: &str = "nova-2";

/// Deepgram pre-recorded audio API
pub(crate) struct DeepgramProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    language: Option<String>,
}

impl DeepgramProvider {
    pub fn new(
        model: Option<String>,
        api_key: Option<SecretString>,
        base_url: Option<&Url>,
        language: Option<String>,
    ) -> Self {
        let base_url = base_url.map_or(DEFAULT_DEEPGRAM_API_URL, Url::as_str);

        Self {
            client: parley_core::http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_DEEPGRAM_MODEL.to_string()),
            language,
        }
    }
}

#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

#[async_trait]
impl Recognizer for DeepgramProvider {
    async fn recognize(&self, clip: &AudioClip) -> crate::error::Result<Recognition> {
        let url = format!("{}/listen", self.base_url);

        tracing::debug!(
            "Deepgram transcription request: {} bytes, model={}",
            clip.audio.len(),
            self.model,
        );

        let mut query = vec![("model", self.model.as_str()), ("punctuate", "true")];

        if let Some(ref language) = self.language {
            query.push(("language", language));
        }

        let mut builder = self
            .client
            .post(&url)
            .query(&query)
            .header(http::header::CONTENT_TYPE, clip.format.mime_type())
            .body(clip.audio.clone());

        if let Some(ref key) = self.api_key {
            builder = builder.header(http::header::AUTHORIZATION, format!("Token {}", key.expose_secret()));
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Ok(unreachable("Deepgram", &e)),
        };

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Ok(classify_status("Deepgram", status, &error_text));
        }

        let result: DeepgramResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Deepgram response: {e}");
            SttError::InvalidResponse
        })?;

        let transcript = result
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|channel| channel.alternatives.into_iter().next())
            .map(|alternative| alternative.transcript)
            .unwrap_or_default();

        tracing::debug!("Deepgram transcription complete");

        Ok(Recognition::from_transcript(transcript))
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}

#[cfg(test)]
mod tests {
    use parley_core::AudioFormat;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn clip() -> AudioClip {
        AudioClip {
            audio: b"OggS".to_vec(),
            format: AudioFormat::Ogg,
            filename: "memo.ogg".to_string(),
        }
    }

    fn provider(server: &MockServer) -> DeepgramProvider {
        let base_url = Url::parse(&server.uri()).unwrap();
        DeepgramProvider::new(None, Some(SecretString::from("dg-test")), Some(&base_url), Some("en".to_string()))
    }

    #[tokio::test]
    async fn posts_raw_audio_and_reads_first_alternative() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/listen"))
            .and(query_param("model", "nova-2"))
            .and(query_param("language", "en"))
            .and(header("authorization", "Token dg-test"))
            .and(header("content-type", "audio/ogg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": { "channels": [{ "alternatives": [{ "transcript": "remind me at noon" }] }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let recognition = provider(&server).recognize(&clip()).await.unwrap();

        assert_eq!(recognition, Recognition::Transcript("remind me at noon".to_string()));
    }

    #[tokio::test]
    async fn no_alternatives_is_unintelligible() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": { "channels": [] }
            })))
            .mount(&server)
            .await;

        let recognition = provider(&server).recognize(&clip()).await.unwrap();

        assert_eq!(recognition, Recognition::Unintelligible);
    }

    #[tokio::test]
    async fn throttling_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let recognition = provider(&server).recognize(&clip()).await.unwrap();

        assert_eq!(recognition, Recognition::ServiceUnavailable);
    }

    #[tokio::test]
    async fn bad_credentials_are_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let recognition = provider(&server).recognize(&clip()).await.unwrap();

        assert_eq!(recognition, Recognition::ServiceUnavailable);
    }

    #[tokio::test]
    async fn unreadable_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = provider(&server).recognize(&clip()).await.unwrap_err();

        assert!(matches!(err, SttError::InvalidResponse));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
