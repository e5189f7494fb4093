//! HTTP clients for the services this backend depends on.

use crate::error::Error;
use log::*;
use std::time::Duration;

pub mod agent;
pub mod google_oauth;
pub mod health;
pub mod quiz;
pub mod r2;
pub mod rag;

/// Shared client builder so every gateway uses rustls and an optional request timeout.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder().use_rustls_tls();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Reads the body of a non-success upstream response so it can be surfaced to the client.
pub(crate) async fn error_body(response: reqwest::Response, fallback: &str) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => {
            warn!("Upstream responded with {status}: {text}");
            text
        }
        _ => {
            warn!("Upstream responded with {status} and no body");
            fallback.to_string()
        }
    }
}
