use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::auth::CallbackParams;
use crate::response::auth::{MeResponse, UserProfile};
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use domain::auth as AuthApi;
use domain::error::Error as DomainError;

use log::*;

/// GET start the Google sign in flow
#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 307, description = "Redirect to Google's consent screen"),
        (status = 500, description = "Google OAuth is not configured")
    )
)]
pub async fn google(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let url = AuthApi::google_authorization_url(&app_state.config)?;

    debug!("Redirecting to Google consent screen");

    Ok(Redirect::temporary(&url))
}

/// GET finish the Google sign in flow and hand a session token to the frontend
#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(CallbackParams),
    responses(
        (status = 307, description = "Redirect to the frontend with a token, or with an error"),
        (status = 400, description = "Authorization code not provided")
    )
)]
pub async fn google_callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| DomainError::input("Authorization code not provided"))?;

    let redirect_url =
        match AuthApi::complete_google_sign_in(app_state.db_conn_ref(), &app_state.config, &code)
            .await
        {
            Ok(token) => AuthApi::sign_in_success_url(&app_state.config, &token),
            Err(e) => {
                error!("Google sign in failed: {e:?}");
                AuthApi::sign_in_failure_url(&app_state.config)
            }
        };

    Ok(Redirect::temporary(&redirect_url))
}

/// GET the signed in user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed in user", body = MeResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Result<impl IntoResponse, Error> {
    Ok(Json(MeResponse {
        success: true,
        user: UserProfile::from(user),
    }))
}

/// POST log out. Tokens are stateless, so the client just discards its token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
    )
)]
pub async fn logout() -> impl IntoResponse {
    Json(ApiResponse::<()>::message("Logged out successfully"))
}
