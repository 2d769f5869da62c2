// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token extraction and the authenticated caller.

use std::fmt;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::token::Claims;
use crate::types::{Role, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from an `Authorization` header value.
///
/// Returns `None` unless the value starts with the exact `Bearer ` scheme
/// followed by a non-empty token.
pub fn parse_bearer(value: &str) -> Option<&str> {
	value
		.strip_prefix(BEARER_PREFIX)
		.map(str::trim)
		.filter(|token| !token.is_empty())
}

/// Extract the bearer token from request headers.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	headers
		.get(AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.and_then(parse_bearer)
		.map(String::from)
}

/// Caller identity established from a validated token.
///
/// Attached to requests that pass authorization so downstream handlers can
/// read who is calling without decoding the token again.
#[derive(Clone)]
pub struct CallerContext {
	pub subject_id: String,
	pub role: Role,
	raw_token: String,
}

impl CallerContext {
	pub fn from_claims(claims: Claims, raw_token: impl Into<String>) -> Self {
		Self {
			subject_id: claims.sub,
			role: claims.role,
			raw_token: raw_token.into(),
		}
	}

	/// The subject as a user id. `None` when the token's subject is empty or
	/// not a UUID.
	pub fn user_id(&self) -> Option<UserId> {
		self.subject_id.parse().ok()
	}

	pub fn is_admin(&self) -> bool {
		self.role.is_admin()
	}

	/// The token the caller presented, for forwarding to other services.
	pub fn raw_token(&self) -> &str {
		&self.raw_token
	}
}

impl fmt::Debug for CallerContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallerContext")
			.field("subject_id", &self.subject_id)
			.field("role", &self.role)
			.field("raw_token", &"[REDACTED]")
			.finish()
	}
}
