//! Axum extractors for request bodies
//!
//! [`ApiJson`] wraps `axum::Json` so that deserialization failures (missing
//! content type, unparseable JSON, type mismatches, unknown keys on patch
//! bodies) surface as the API's JSON error shape instead of axum's plain-text
//! rejections.

use crate::core::error::ApiError;
use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON body extractor returning structured 400s on bad input
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
