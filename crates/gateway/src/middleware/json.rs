//! JSON body extractor that answers with the shared error envelope

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use circle_common::errors::AppError;
use serde::de::DeserializeOwned;

/// Like `axum::Json`, but a malformed or mistyped body becomes a 400 `AppError`
/// instead of axum's plain-text 415/422 rejection.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
