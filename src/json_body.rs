//! A JSON body extractor that reports malformed bodies with the crate's error response.

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::Error;

/// Extracts a JSON request body like [axum::Json], but rejects with [Error::InvalidRequestBody].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}
