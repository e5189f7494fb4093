use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
mod extractors;
mod graphql;
mod middleware;
mod params;
mod protect;
mod response;
mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", interface, app_state.config.port);

    let cors_layer = cors_layer(&app_state.config.allowed_origins);
    let app = router::define_routes(app_state).layer(cors_layer);

    info!("Server starting... listening for connections on http://{server_url}");

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, app).await
}

/// Only the configured frontend origins may call the API with credentials.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
