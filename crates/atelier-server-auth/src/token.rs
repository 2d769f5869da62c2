// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity token issuing and validation.
//!
//! Tokens are HS256 JWTs carrying the caller's user id (`sub`), [`Role`], and an
//! issued-at / expiry pair in epoch seconds. [`TokenCodec::validate`] checks the
//! signature and structure only. Whether a token is inside its validity window
//! is a separate question answered by [`Claims::is_within_window`], so callers
//! can evaluate it against an injected clock.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::secret::SigningSecret;
use crate::types::{Role, UserId};

/// Default token lifetime: 48 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(48 * 60 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
	#[error("malformed token: {0}")]
	Malformed(String),

	#[error("token signature does not match")]
	InvalidSignature,

	#[error("token lifetime out of range")]
	LifetimeOutOfRange,

	#[error("failed to encode token: {0}")]
	Encoding(String),
}

/// Claims carried by an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Subject: the caller's user id as written by the issuer.
	pub sub: String,
	pub role: Role,
	/// Issued-at, epoch seconds.
	pub iat: i64,
	/// Expiry, epoch seconds.
	pub exp: i64,
}

impl Claims {
	/// The subject parsed as a user id, if it is one.
	pub fn user_id(&self) -> Option<UserId> {
		self.sub.parse().ok()
	}

	pub fn issued_at(&self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.iat, 0)
	}

	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.exp, 0)
	}

	/// Whether `now` falls in `[iat, exp)`, compared at millisecond precision.
	pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
		let now_ms = now.timestamp_millis();
		let issued_ms = self.iat.saturating_mul(1000);
		let expires_ms = self.exp.saturating_mul(1000);
		issued_ms <= now_ms && now_ms < expires_ms
	}
}

/// Issues and validates identity tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenCodec {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	default_ttl: Duration,
}

impl TokenCodec {
	pub fn new(secret: &SigningSecret, default_ttl: Duration) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.validate_exp = false;
		validation.required_spec_claims.clear();

		Self {
			encoding_key: EncodingKey::from_secret(secret.expose()),
			decoding_key: DecodingKey::from_secret(secret.expose()),
			validation,
			default_ttl,
		}
	}

	pub fn default_ttl(&self) -> Duration {
		self.default_ttl
	}

	/// Issue a token valid from now for the default lifetime.
	pub fn issue(&self, subject_id: &str, role: Role) -> Result<String, TokenError> {
		self.issue_at(subject_id, role, self.default_ttl, Utc::now())
	}

	pub fn issue_with_ttl(
		&self,
		subject_id: &str,
		role: Role,
		ttl: Duration,
	) -> Result<String, TokenError> {
		self.issue_at(subject_id, role, ttl, Utc::now())
	}

	/// Issue a token as if the current time were `issued_at`.
	#[instrument(level = "trace", skip_all, fields(role = %role, ttl_secs = ttl.as_secs()))]
	pub fn issue_at(
		&self,
		subject_id: &str,
		role: Role,
		ttl: Duration,
		issued_at: DateTime<Utc>,
	) -> Result<String, TokenError> {
		let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::LifetimeOutOfRange)?;
		let iat = issued_at.timestamp();
		let exp = iat
			.checked_add(ttl_secs)
			.ok_or(TokenError::LifetimeOutOfRange)?;

		let claims = Claims {
			sub: subject_id.to_string(),
			role,
			iat,
			exp,
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(|e| TokenError::Encoding(e.to_string()))
	}

	/// Verify a token's signature and decode its claims.
	///
	/// Expiry is not checked here; see [`Claims::is_within_window`].
	#[instrument(level = "trace", skip_all)]
	pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
		decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|e| match e.kind() {
				ErrorKind::InvalidSignature => TokenError::InvalidSignature,
				_ => TokenError::Malformed(e.to_string()),
			})
	}
}

impl fmt::Debug for TokenCodec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenCodec")
			.field("algorithm", &Algorithm::HS256)
			.field("default_ttl", &self.default_ttl)
			.finish_non_exhaustive()
	}
}
