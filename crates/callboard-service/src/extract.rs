//! Request extractors that reject with [`ApiError`].
//!
//! axum's own rejections answer 422 or plain text; these keep every client
//! error in the JSON error envelope with status 400.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::Deserialize;

use callboard_core::UserId;

use crate::error::ApiError;

/// A user id taken from the route's single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct UserPath(pub UserId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        Ok(Self(raw.parse()?))
    }
}

/// A JSON request body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        Ok(Self(value))
    }
}

/// Body of the endpoints that only identify a user.
#[derive(Debug, Default, Deserialize)]
pub struct UserBody {
    /// The user, as a number or numeric string.
    #[serde(default, rename = "userId")]
    pub user_id: Option<UserId>,
}

impl UserBody {
    /// The user id, or a 400 naming the missing field.
    pub fn require(&self) -> Result<UserId, ApiError> {
        self.user_id
            .ok_or_else(|| ApiError::MissingParameters(vec!["userId"]))
    }
}
