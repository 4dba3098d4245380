//! Health check with backend connectivity.

use axum::{extract::State, http::StatusCode, response::Json};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: BTreeMap<&'static str, ServiceStatus>,
}

/// One backend's status
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe every backend concurrently
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let results = join_all(state.probes.iter().map(|probe| async move {
        (probe.name(), probe.check().await)
    }))
    .await;

    let mut services = BTreeMap::new();
    let mut all_healthy = true;
    for (name, result) in results {
        let status = match result {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(reason) => {
                tracing::warn!(backend = name, error = %reason, "Health probe failed");
                all_healthy = false;
                ServiceStatus {
                    status: "unhealthy",
                    error: Some(reason),
                }
            }
        };
        services.insert(name, status);
    }

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
