// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authorization layer.
//!
//! [`authorize_request`] runs before every API handler. It buffers the body
//! (bounded by `http.body_limit_bytes`), describes the request to the
//! [`AuthorizationEngine`](atelier_server_auth::AuthorizationEngine) and either
//! forwards it with a [`CallerContext`](atelier_server_auth::CallerContext) in
//! its extensions or answers with the denial.
//!
//! # Security
//!
//! - Tokens are never logged; decisions log the subject id only
//! - Engine failures answer 500 with a generic message and are logged as errors

use std::collections::HashMap;

use atelier_server_auth::{authz::routes, Decision, RequestDescriptor, Verdict};
use axum::{
	body::{Body, Bytes},
	extract::{Query, Request, State},
	http::{header::AUTHORIZATION, request::Parts},
	middleware::Next,
	response::Response,
};
use serde_json::Value;
use tracing::instrument;

use crate::error::{denial_response, engine_error_response, payload_too_large};
use crate::state::AppState;

#[instrument(
	name = "authorize_request",
	skip(state, request, next),
	fields(method = %request.method(), path = %request.uri().path())
)]
pub async fn authorize_request(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Response {
	if routes::is_ungated_path(request.uri().path()) {
		return next.run(request).await;
	}

	let (parts, body) = request.into_parts();
	let bytes = match axum::body::to_bytes(body, state.body_limit_bytes).await {
		Ok(bytes) => bytes,
		Err(e) => {
			tracing::debug!(error = %e, "failed to buffer request body");
			return payload_too_large(state.body_limit_bytes);
		}
	};

	let descriptor = describe_request(&parts, &bytes);
	match state.engine.evaluate(&descriptor).await {
		Ok(Decision {
			verdict: Verdict::Allow,
			caller,
		}) => {
			let mut request = Request::from_parts(parts, Body::from(bytes));
			if let Some(caller) = caller {
				request.extensions_mut().insert(caller);
			}
			next.run(request).await
		}
		Ok(Decision {
			verdict: Verdict::Deny { kind, reason },
			..
		}) => denial_response(kind, reason),
		Err(e) => engine_error_response(&e),
	}
}

/// Build the engine's view of a request from its head and buffered body.
///
/// Bodies that are not JSON objects are described as empty.
pub fn describe_request(parts: &Parts, body: &Bytes) -> RequestDescriptor {
	let mut descriptor = RequestDescriptor::from_route(parts.method.clone(), parts.uri.path());

	if let Ok(Query(query)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
		descriptor.query_params = query;
	}

	if !body.is_empty() {
		if let Ok(value) = serde_json::from_slice::<Value>(body) {
			descriptor = descriptor.with_body(value);
		}
	}

	if let Some(header) = parts
		.headers
		.get(AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
	{
		descriptor = descriptor.with_authorization(header);
	}

	descriptor
}
