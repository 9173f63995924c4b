//! Request body extractor accepting JSON or urlencoded forms.

use crate::error::ApiError;
use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::header;
use serde::de::DeserializeOwned;

/// Body deserialized from `application/json` or
/// `application/x-www-form-urlencoded`.
///
/// Any other (or missing) content type yields `T::default()`, the same as an
/// empty body.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
            Ok(Payload(value))
        } else {
            Ok(Payload(T::default()))
        }
    }
}
