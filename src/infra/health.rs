//! Backend probes reported by `GET /health`.

use async_trait::async_trait;

use super::{Cache, Database};
use crate::errors::AppError;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Key under which the probe appears in the health report
    fn name(&self) -> &'static str;

    /// `Err` carries the reason the backend is unreachable
    async fn check(&self) -> Result<(), String>;
}

#[async_trait]
impl HealthCheck for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.ping().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl HealthCheck for Cache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> Result<(), String> {
        self.ping().await.map_err(|e| match e {
            AppError::Internal(reason) => reason,
            other => other.to_string(),
        })
    }
}
