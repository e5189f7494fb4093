use crate::{AppState, Error};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{auth as AuthApi, error::Error as DomainError};
use log::*;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware that answers 401 for requests without a valid bearer token.
///
/// On success the signed in `users::Model` is stored in the request extensions, where the
/// `AuthenticatedUser` extractor picks it up.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    {
        Some(token) => token.to_string(),
        None => {
            return Error::from(DomainError::unauthenticated(
                "Unauthorized - No token provided",
            ))
            .into_response()
        }
    };

    match AuthApi::authenticate_token(app_state.db_conn_ref(), &app_state.config, &token).await {
        Ok(user) => {
            trace!("Authenticated request from user {}", user.id);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => Error::from(e).into_response(),
    }
}
