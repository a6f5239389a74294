// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Liveness and readiness probes

use crate::in_memory::StoreStats;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Readiness plus what the store currently serves
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreStats>,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Injected collaborators are assumed ready and report no store counts.
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let store = match &state.store {
        Some(store) => Some(store.stats().await),
        None => None,
    };
    Json(ReadinessResponse {
        status: "ready",
        store,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
