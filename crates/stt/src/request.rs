use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart, multipart::Field},
};
use parley_core::{
    AudioFormat, Rejection,
    validate::{is_multipart_form_data, secure_filename},
};

use crate::{server::Server, types::TranscribeRequest};

pub(crate) const NO_AUDIO: &str = "No audio file uploaded";
pub(crate) const NO_SELECTED_FILE: &str = "No selected file";
pub(crate) const INVALID_FILE_TYPE: &str = "Invalid file type";

/// Name of the multipart field carrying the recording
const AUDIO_FIELD: &str = "audio";

/// Extractor for the multipart upload on `/api/transcribe`
///
/// The body is buffered up to the configured upload limit before the form is
/// parsed, so an oversized upload is refused with 413 before anything touches
/// the filesystem.
pub struct ExtractUpload(pub TranscribeRequest);

impl FromRequest<Arc<Server>> for ExtractUpload {
    type Rejection = Rejection;

    async fn from_request(request: http::Request<Body>, server: &Arc<Server>) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        if !is_multipart_form_data(&parts.headers) {
            return Err(Rejection::BadRequest(NO_AUDIO));
        }

        let limit = server.max_upload_size();

        let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                Rejection::PayloadTooLarge(limit)
            } else {
                Rejection::Unreadable(err.to_string())
            }
        })?;

        let request = http::Request::from_parts(parts, Body::from(bytes));

        // A multipart content type without a usable boundary has no file in it
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| Rejection::BadRequest(NO_AUDIO))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Rejection::Unreadable(e.body_text()))?
        {
            // A plain form value named "audio" is not a file
            if field.name() != Some(AUDIO_FIELD) || field.file_name().is_none() {
                continue;
            }

            return audio_from_field(field).await.map(Self);
        }

        Err(Rejection::BadRequest(NO_AUDIO))
    }
}

async fn audio_from_field(field: Field<'_>) -> Result<TranscribeRequest, Rejection> {
    let client_name = field.file_name().unwrap_or_default().to_string();

    if client_name.is_empty() {
        return Err(Rejection::BadRequest(NO_SELECTED_FILE));
    }

    let format = AudioFormat::from_filename(&client_name).ok_or(Rejection::BadRequest(INVALID_FILE_TYPE))?;

    let audio: Bytes = field.bytes().await.map_err(|e| Rejection::Unreadable(e.body_text()))?;

    Ok(TranscribeRequest {
        audio,
        filename: storage_name(&client_name, format),
        format,
    })
}

/// Sanitized filename that still carries the validated extension
fn storage_name(client_name: &str, format: AudioFormat) -> String {
    let sanitized = secure_filename(client_name);

    if sanitized.is_empty() {
        format!("audio.{}", format.extension())
    } else if AudioFormat::from_filename(&sanitized) == Some(format) {
        sanitized
    } else {
        format!("{sanitized}.{}", format.extension())
    }
}
