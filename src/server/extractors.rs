//! Request extractors that reject with the API error envelope.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

/// JSON body parsed into a typed request.
///
/// Bodies that are not JSON are a `BadRequest`. JSON that does not fit `T`
/// (missing fields, wrong types) is `Unprocessable`.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(e)) => {
                tracing::debug!("Request body does not match schema: {e}");
                Err(ApiError::Unprocessable)
            }
            Err(e) => {
                tracing::debug!("Malformed request body: {e}");
                Err(ApiError::BadRequest)
            }
        }
    }
}

/// Integer id taken from the path. Anything else does not address a resource.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        Ok(Self(id))
    }
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<String>,
}

/// 1-based `?page=` number. Missing or unparsable values mean page 1.
pub struct PageNumber(pub i64);

impl<S> FromRequestParts<S> for PageNumber
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let page = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Query(params)| params.page)
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1);
        Ok(Self(page))
    }
}
