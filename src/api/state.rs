//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::AccessPolicy;
use crate::infra::{Cache, Database, HealthCheck, RateLimiter};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Application services
    pub services: Arc<dyn ServiceContainer>,
    /// Second authorization gate after the route allow-lists
    pub policy: Arc<AccessPolicy>,
    pub config: Arc<Config>,
    /// Request counter for the rate limit middleware
    pub limiter: Arc<dyn RateLimiter>,
    /// Backends reported by the health endpoint
    pub probes: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Create application state from live backends and config.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
        ));

        let database: Arc<dyn HealthCheck> = database;
        let limiter: Arc<dyn RateLimiter> = cache.clone();
        let cache: Arc<dyn HealthCheck> = cache;
        let probes = vec![database, cache];

        Self {
            services,
            policy: Arc::new(AccessPolicy::default()),
            config: Arc::new(config),
            limiter,
            probes,
        }
    }

    /// Create state with manually injected services and backends.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        config: Config,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            services,
            policy: Arc::new(AccessPolicy::default()),
            config: Arc::new(config),
            limiter,
            probes: Vec::new(),
        }
    }

    /// Replace the access matrix.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn HealthCheck>) -> Self {
        self.probes.push(probe);
        self
    }
}
