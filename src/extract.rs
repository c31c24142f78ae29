//! Schema-validated JSON extraction
//!
//! Requests with a missing or malformed field fail fast with a 400 and the
//! `MISSING_FIELD` tag instead of defaulting silently.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON extractor whose rejections map onto [`ApiError`]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            // Body parsed as JSON but did not match the schema (missing
            // field, wrong type)
            Err(JsonRejection::JsonDataError(err)) => {
                Err(ApiError::MissingField(err.body_text()))
            }
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
