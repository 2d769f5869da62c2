// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use atelier_server_auth::{AuthorizationEngine, TokenCodec};
use atelier_server_config::ServerConfig;
use atelier_server_db::SqliteLookupGateway;

/// Shared state for the authorization layer and the built-in routes.
#[derive(Clone, Debug)]
pub struct AppState {
	pub engine: AuthorizationEngine,
	/// Present when the engine reads from the application database; used by
	/// the health check.
	pub db: Option<SqliteLookupGateway>,
	pub body_limit_bytes: usize,
}

impl AppState {
	pub fn new(engine: AuthorizationEngine, body_limit_bytes: usize) -> Self {
		Self {
			engine,
			db: None,
			body_limit_bytes,
		}
	}

	pub fn with_db(mut self, db: SqliteLookupGateway) -> Self {
		self.db = Some(db);
		self
	}
}

/// Build state from resolved configuration and an open database gateway.
///
/// Returns `None` when the configuration carries no signing secret, which
/// `atelier_server_config::finalize` already rejects.
pub fn create_app_state(config: &ServerConfig, db: SqliteLookupGateway) -> Option<AppState> {
	let secret = config.auth.signing_secret.as_ref()?;
	let codec = TokenCodec::new(secret, config.auth.token_ttl);
	let engine = AuthorizationEngine::new(codec, Arc::new(db.clone()))
		.with_lookup_timeout(config.auth.lookup_timeout);

	Some(AppState::new(engine, config.http.body_limit_bytes).with_db(db))
}
