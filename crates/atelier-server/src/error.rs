// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON error bodies.

use atelier_server_auth::{DenialKind, EngineError};
use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

/// Response for a denied request: the denial kind's status and a body naming
/// the kind and reason.
pub fn denial_response(kind: DenialKind, reason: &str) -> Response {
	(
		kind.status_code(),
		Json(ErrorResponse::new(kind.as_str(), reason)),
	)
		.into_response()
}

/// Response for an engine failure. The cause is logged, never returned.
pub fn engine_error_response(err: &EngineError) -> Response {
	tracing::error!(error = %err, "authorization could not be decided");
	(
		err.status_code(),
		Json(ErrorResponse::new(
			"internal_error",
			"Authorization is temporarily unavailable",
		)),
	)
		.into_response()
}

pub fn payload_too_large(limit: usize) -> Response {
	(
		StatusCode::PAYLOAD_TOO_LARGE,
		Json(ErrorResponse::new(
			"payload_too_large",
			format!("Request body exceeds {limit} bytes"),
		)),
	)
		.into_response()
}
