//! Request plumbing shared by the Parley capability crates
//!
//! Validation of incoming payloads, the `{"error": ...}` response shape and
//! the HTTP client used to reach remote engines.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod extract;
mod http_client;
pub mod validate;

pub use error::{ErrorBody, Rejection, error_response};
pub use extract::{ExtractPayload, FromJsonObject, JSON_BODY_LIMIT_BYTES};
pub use http_client::http_client;
pub use validate::AudioFormat;
