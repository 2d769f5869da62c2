// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Root and health handlers. Both are served without authorization.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub database: Option<HealthStatus>,
	pub version: String,
}

/// GET / - service banner.
pub async fn root() -> impl IntoResponse {
	concat!("atelier-server ", env!("CARGO_PKG_VERSION"))
}

/// GET /health - database reachability.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match &state.db {
		Some(db) => Some(match db.health_check().await {
			Ok(()) => HealthStatus::Healthy,
			Err(e) => {
				tracing::warn!(error = %e, "database health check failed");
				HealthStatus::Unhealthy
			}
		}),
		None => None,
	};

	let status = if database == Some(HealthStatus::Unhealthy) {
		HealthStatus::Unhealthy
	} else {
		HealthStatus::Healthy
	};
	let code = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(
		code,
		Json(HealthResponse {
			status,
			database,
			version: env!("CARGO_PKG_VERSION").to_string(),
		}),
	)
}
