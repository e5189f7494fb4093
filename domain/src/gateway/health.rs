//! Reachability checks for the upstream AI services, cached in `service::health_cache`.

use crate::error::Error;
use log::*;
use serde::Deserialize;
use service::config::Config;
use service::health_cache::{HealthCache, UpstreamService};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Returns immediately when `service` was seen healthy within the configured TTL; otherwise
/// probes `GET {url}/health` and records the outcome. Failure answers 503.
pub async fn ensure_service_healthy(
    config: &Config,
    cache: &HealthCache,
    service: UpstreamService,
) -> Result<(), Error> {
    let ttl = Duration::from_millis(config.service_health_ttl_ms);
    if cache.is_fresh(service, ttl) {
        trace!("Using cached health for {service} service");
        return Ok(());
    }

    let healthy = probe(config, service).await;
    cache.record(service, healthy);

    if healthy {
        Ok(())
    } else {
        Err(Error::unavailable(format!(
            "{} is unavailable",
            service.display_name()
        )))
    }
}

async fn probe(config: &Config, service: UpstreamService) -> bool {
    let url = format!("{}/health", config.upstream_url(service));
    let timeout = Duration::from_millis(config.service_health_timeout_ms);

    let client = match super::build_client(Some(timeout)) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build health check client: {e}");
            return false;
        }
    };

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("{} health check at {url} failed: {e}", service.display_name());
            return false;
        }
    };

    if !response.status().is_success() {
        warn!(
            "{} health check at {url} answered {}",
            service.display_name(),
            response.status()
        );
        return false;
    }

    match response.json::<HealthResponse>().await {
        Ok(HealthResponse {
            status: Some(status),
        }) if status == "healthy" => true,
        Ok(body) => {
            warn!("Unexpected health response from {service} service: {body:?}");
            false
        }
        Err(e) => {
            warn!("Unreadable health response from {service} service: {e}");
            false
        }
    }
}
