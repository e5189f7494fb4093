//! Google sign in and bearer token authentication.

use crate::error::Error;
use crate::gateway::google_oauth::GoogleOAuthClient;
use crate::{jwt, user, users};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

/// Where to send the browser to start the Google consent flow.
pub fn google_authorization_url(config: &Config) -> Result<String, Error> {
    Ok(GoogleOAuthClient::from_config(config)?.get_authorization_url())
}

/// Completes the authorization code flow and returns a session token for the signed in user.
pub async fn complete_google_sign_in(
    db: &DatabaseConnection,
    config: &Config,
    code: &str,
) -> Result<String, Error> {
    let client = GoogleOAuthClient::from_config(config)?;
    let tokens = client.exchange_code(code).await?;
    let profile = client.get_user_info(&tokens.access_token).await?;

    let user = user::upsert_from_google(db, &profile).await?;
    info!("User {} signed in with Google", user.id);

    jwt::generate_token(config, user.id, &user.email)
}

/// The redirect target after a successful sign in.
pub fn sign_in_success_url(config: &Config, token: &str) -> String {
    format!(
        "{}/auth/callback?token={}",
        config.base_url(),
        urlencoding::encode(token)
    )
}

/// The redirect target after any sign in failure.
pub fn sign_in_failure_url(config: &Config) -> String {
    format!("{}/?error=auth_failed", config.base_url())
}

/// Resolves a bearer token to the user it was issued for.
pub async fn authenticate_token(
    db: &DatabaseConnection,
    config: &Config,
    token: &str,
) -> Result<users::Model, Error> {
    let claims = jwt::verify_token(config, token)?;

    user::find_by_id(db, claims.user_id).await.map_err(|e| {
        let e = Error::from(e);
        if e.is_not_found() {
            warn!("Token for deleted user {} presented", claims.user_id);
            Error::unauthenticated("User not found")
        } else {
            e
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn redirect_urls_use_frontend_base_url() {
        let config =
            Config::parse_from(["learning_assistant", "--base-url", "https://app.example.com/"]);

        assert_eq!(
            sign_in_success_url(&config, "a.b.c"),
            "https://app.example.com/auth/callback?token=a.b.c"
        );
        assert_eq!(
            sign_in_failure_url(&config),
            "https://app.example.com/?error=auth_failed"
        );
    }

    #[test]
    fn authorization_url_requires_google_credentials() {
        let config = Config::parse_from(["learning_assistant"]);
        assert!(google_authorization_url(&config).is_err());

        let config = Config::parse_from([
            "learning_assistant",
            "--google-client-id",
            "client-1",
            "--google-client-secret",
            "shh",
        ]);
        let url = google_authorization_url(&config).unwrap();
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("prompt=select_account"));
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::Id;
    use clap::Parser;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn token_for_missing_user_is_unauthenticated() {
        let config = Config::parse_from(["learning_assistant", "--jwt-secret", "secret"]);
        let token = jwt::generate_token(&config, Id::new_v4(), "gone@example.com").unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<users::Model>::new()])
            .into_connection();

        let err = authenticate_token(&db, &config, &token).await.unwrap_err();

        assert_eq!(err.message(), "User not found");
    }
}
