//! Reachability cache for the upstream AI services.
//!
//! A service that answered healthy recently is trusted for a short window so
//! that bursts of requests don't each pay for a probe. Unhealthy results are
//! recorded too, but never reused.

use dashmap::DashMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpstreamService {
    Rag,
    Agent,
    Quiz,
}

impl UpstreamService {
    /// Human readable name used in client-facing error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            UpstreamService::Rag => "RAG service",
            UpstreamService::Agent => "Agent service",
            UpstreamService::Quiz => "Quiz service",
        }
    }
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UpstreamService::Rag => write!(f, "rag"),
            UpstreamService::Agent => write!(f, "agent"),
            UpstreamService::Quiz => write!(f, "quiz"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct HealthEntry {
    checked_at: Instant,
    healthy: bool,
}

#[derive(Debug, Default)]
pub struct HealthCache {
    entries: DashMap<UpstreamService, HealthEntry>,
}

impl HealthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `service` was last seen healthy less than `ttl` ago.
    pub fn is_fresh(&self, service: UpstreamService, ttl: Duration) -> bool {
        self.entries
            .get(&service)
            .map(|entry| entry.healthy && entry.checked_at.elapsed() < ttl)
            .unwrap_or(false)
    }

    pub fn record(&self, service: UpstreamService, healthy: bool) {
        self.entries.insert(
            service,
            HealthEntry {
                checked_at: Instant::now(),
                healthy,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_service_is_not_fresh() {
        let cache = HealthCache::new();
        assert!(!cache.is_fresh(UpstreamService::Rag, Duration::from_secs(5)));
    }

    #[test]
    fn healthy_entry_is_fresh_within_ttl() {
        let cache = HealthCache::new();
        cache.record(UpstreamService::Agent, true);

        assert!(cache.is_fresh(UpstreamService::Agent, Duration::from_secs(5)));
        assert!(!cache.is_fresh(UpstreamService::Quiz, Duration::from_secs(5)));
    }

    #[test]
    fn unhealthy_entry_is_never_fresh() {
        let cache = HealthCache::new();
        cache.record(UpstreamService::Quiz, false);

        assert!(!cache.is_fresh(UpstreamService::Quiz, Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn healthy_entry_expires_after_ttl() {
        let cache = HealthCache::new();
        cache.record(UpstreamService::Rag, true);

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!cache.is_fresh(UpstreamService::Rag, Duration::from_millis(10)));
        assert!(cache.is_fresh(UpstreamService::Rag, Duration::from_secs(60)));
    }

    #[test]
    fn latest_result_overwrites_previous() {
        let cache = HealthCache::new();
        cache.record(UpstreamService::Rag, true);
        cache.record(UpstreamService::Rag, false);

        assert!(!cache.is_fresh(UpstreamService::Rag, Duration::from_secs(5)));
    }

    #[test]
    fn display_names_match_client_messages() {
        assert_eq!(UpstreamService::Rag.display_name(), "RAG service");
        assert_eq!(UpstreamService::Agent.display_name(), "Agent service");
        assert_eq!(UpstreamService::Quiz.display_name(), "Quiz service");
    }
}
