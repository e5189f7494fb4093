use crate::extractors::RejectionType;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::{error::Error as DomainError, users};

pub(crate) struct AuthenticatedUser(pub users::Model);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // The `require_auth` middleware resolves the bearer token and stores the user in the request
    // extensions. Routes that aren't behind it have no user and are rejected as unauthenticated.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<users::Model>() {
            Some(user) => Ok(AuthenticatedUser(user.clone())),
            None => Err(DomainError::unauthenticated("Unauthorized").into()),
        }
    }
}
