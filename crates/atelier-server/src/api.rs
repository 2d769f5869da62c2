// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router assembly.

use axum::{middleware, routing::get, Router};

use crate::authz_middleware::authorize_request;
use crate::routes::{health, session};
use crate::state::AppState;

/// Mount `api` behind the authorization middleware, with `/` and `/health`
/// served outside it.
pub fn create_router(state: AppState, api: Router<AppState>) -> Router {
	let gated = api.layer(middleware::from_fn_with_state(
		state.clone(),
		authorize_request,
	));

	Router::new()
		.route("/", get(health::root))
		.route("/health", get(health::health_check))
		.merge(gated)
		.with_state(state)
}

/// Routes this server answers itself once a request is authorized.
pub fn api_routes() -> Router<AppState> {
	Router::new().route("/session", get(session::current_session))
}
