// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use atelier_server_auth::{CallerContext, Role};
use axum::{extract::Request, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::ErrorResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
	pub subject_id: String,
	pub role: Role,
}

/// GET /session - the caller the authorization layer established.
pub async fn current_session(request: Request) -> impl IntoResponse {
	match request.extensions().get::<CallerContext>() {
		Some(caller) => (
			StatusCode::OK,
			Json(SessionResponse {
				subject_id: caller.subject_id.clone(),
				role: caller.role,
			}),
		)
			.into_response(),
		None => (
			StatusCode::UNAUTHORIZED,
			Json(ErrorResponse::new("unauthorized", "Authentication required")),
		)
			.into_response(),
	}
}
