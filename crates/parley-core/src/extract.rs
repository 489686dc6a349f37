use axum::body::Body;
use serde_json::{Map, Value};

use crate::{error::Rejection, validate};

/// Body limit for JSON requests (1 MiB)
pub const JSON_BODY_LIMIT_BYTES: usize = 1 << 20;

/// A typed request validated out of a JSON object
pub trait FromJsonObject: Sized {
    fn from_json_object(object: &Map<String, Value>) -> Result<Self, Rejection>;
}

/// Extractor for JSON request bodies
///
/// Rejects with `400 {"error": "Request must be JSON"}` unless the request
/// declares a JSON content type and carries a JSON object, then hands the
/// object to `T` for field validation.
#[derive(Debug)]
pub struct ExtractPayload<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
    T: FromJsonObject,
{
    type Rejection = Rejection;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        if !validate::is_json_content_type(&parts.headers) {
            return Err(Rejection::BadRequest(validate::NOT_JSON));
        }

        let bytes = axum::body::to_bytes(body, JSON_BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                Rejection::PayloadTooLarge(JSON_BODY_LIMIT_BYTES)
            } else {
                Rejection::Unreadable(err.to_string())
            }
        })?;

        let object = validate::json_object(&bytes)?;

        T::from_json_object(&object).map(Self)
    }
}
