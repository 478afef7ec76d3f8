use axum::{
    body::Bytes,
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// `axum::Json` whose rejections render through [`Error`], so a body of the
/// wrong shape gets the same `{"error": ...}` 422 as a failed validation.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Decodes an optional JSON body. An empty body yields `T::default()`;
/// anything else must deserialize.
pub fn optional_json<T>(body: &Bytes) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| Error::MalformedBody(e.to_string()))
}
