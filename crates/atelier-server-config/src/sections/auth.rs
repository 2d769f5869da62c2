// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token and authorization configuration.
//!
//! The signing secret is not part of the layer. It is only read from
//! `ATELIER_SERVER_AUTH_SECRET` or `ATELIER_SERVER_AUTH_SECRET_FILE` and passed
//! to [`AuthConfigLayer::finalize`] separately.

use std::time::Duration;

use atelier_server_auth::{SigningSecret, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_TOKEN_TTL};
use serde::Deserialize;

/// Auth configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub signing_secret: Option<SigningSecret>,
	pub token_ttl: Duration,
	pub lookup_timeout: Duration,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize(None)
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub token_ttl_secs: Option<u64>,
	#[serde(default)]
	pub lookup_timeout_ms: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.token_ttl_secs.is_some() {
			self.token_ttl_secs = other.token_ttl_secs;
		}
		if other.lookup_timeout_ms.is_some() {
			self.lookup_timeout_ms = other.lookup_timeout_ms;
		}
	}

	pub fn finalize(self, signing_secret: Option<SigningSecret>) -> AuthConfig {
		AuthConfig {
			signing_secret,
			token_ttl: self
				.token_ttl_secs
				.map(Duration::from_secs)
				.unwrap_or(DEFAULT_TOKEN_TTL),
			lookup_timeout: self
				.lookup_timeout_ms
				.map(Duration::from_millis)
				.unwrap_or(DEFAULT_LOOKUP_TIMEOUT),
		}
	}
}
