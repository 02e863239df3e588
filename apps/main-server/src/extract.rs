//! Extractors that decode and validate request input.

use api_protocol::Validate;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// JSON body that has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<T, St> FromRequest<St> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    St: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

#[axum::async_trait]
impl<T, St> FromRequestParts<St> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    St: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters. Decode failures use the JSON error body instead of
/// axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

#[axum::async_trait]
impl<T, St> FromRequestParts<St> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    St: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
        Ok(Self(value))
    }
}
