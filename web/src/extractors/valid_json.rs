use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use domain::error::Error as DomainError;
use log::*;
use serde::de::DeserializeOwned;

/// Like `axum::Json`, but a body that can't be read as `T` is answered with the
/// same 400 JSON error body as every other validation failure.
pub(crate) struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(DomainError::input("Invalid request body").into())
            }
        }
    }
}

