//! Google OAuth client.
//!
//! Covers the authorization code flow used for sign in: building the consent URL,
//! exchanging the returned code for tokens, and reading the user's profile.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

const SCOPES: &str = "openid email profile";

/// OAuth token response from Google
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// User info from Google. The v2 endpoint names the account `id`, OpenID Connect names it `sub`.
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    pub fn google_id(&self) -> Option<&str> {
        self.sub.as_deref().or(self.id.as_deref())
    }
}

/// Request to exchange authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
}

/// Configuration for Google OAuth URLs
#[derive(Debug, Clone)]
pub struct GoogleOAuthUrls {
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthUrls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auth_url: config.google_auth_url().to_string(),
            token_url: config.google_token_url().to_string(),
            userinfo_url: config.google_userinfo_url().to_string(),
        }
    }
}

pub struct GoogleOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    urls: GoogleOAuthUrls,
}

impl GoogleOAuthClient {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        urls: GoogleOAuthUrls,
    ) -> Result<Self, Error> {
        let client = super::build_client(None)?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            urls,
        })
    }

    /// Builds a client from the Google settings in `config`; missing credentials are a config error.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let (client_id, client_secret) =
            match (config.google_client_id(), config.google_client_secret()) {
                (Some(id), Some(secret)) => (id, secret),
                _ => {
                    error!("Google OAuth client credentials are not configured");
                    return Err(Error::config());
                }
            };

        Self::new(
            &client_id,
            &client_secret,
            config.google_redirect_uri(),
            GoogleOAuthUrls::from_config(config),
        )
    }

    /// Generate the OAuth authorization URL for user consent
    pub fn get_authorization_url(&self) -> String {
        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            prompt=select_account",
            self.urls.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPES),
        )
    }

    /// Exchange authorization code for access tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            code: code.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Google token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Google OAuth".to_string(),
                    )),
                }
            })?;
            info!("Successfully exchanged Google OAuth code for tokens");
            Ok(tokens)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google OAuth error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }

    /// Get user info using the access token
    pub async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, Error> {
        let response = self
            .client
            .get(&self.urls.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get Google user info: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let user_info: GoogleUserInfo = response.json().await.map_err(|e| {
                warn!("Failed to parse Google user info: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Google".to_string(),
                    )),
                }
            })?;
            Ok(user_info)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google user info error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}
