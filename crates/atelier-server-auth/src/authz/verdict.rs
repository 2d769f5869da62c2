// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization outcomes.

use http::StatusCode;
use serde::Serialize;
use std::fmt;

/// Why a request was denied. Each kind maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
	/// The request is structurally wrong (malformed id, missing owner field).
	BadRequest,
	/// No usable identity: missing, malformed, forged, expired or not yet valid token.
	Unauthorized,
	/// Identity established but the caller may not do this.
	Forbidden,
	/// A resource the decision depends on does not exist.
	NotFound,
}

impl DenialKind {
	pub fn status_code(self) -> StatusCode {
		match self {
			DenialKind::BadRequest => StatusCode::BAD_REQUEST,
			DenialKind::Unauthorized => StatusCode::UNAUTHORIZED,
			DenialKind::Forbidden => StatusCode::FORBIDDEN,
			DenialKind::NotFound => StatusCode::NOT_FOUND,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			DenialKind::BadRequest => "bad_request",
			DenialKind::Unauthorized => "unauthorized",
			DenialKind::Forbidden => "forbidden",
			DenialKind::NotFound => "not_found",
		}
	}
}

impl fmt::Display for DenialKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The engine's answer for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
	Allow,
	Deny {
		kind: DenialKind,
		reason: &'static str,
	},
}

impl Verdict {
	pub fn deny(kind: DenialKind, reason: &'static str) -> Self {
		Verdict::Deny { kind, reason }
	}

	pub fn bad_request(reason: &'static str) -> Self {
		Self::deny(DenialKind::BadRequest, reason)
	}

	pub fn unauthorized(reason: &'static str) -> Self {
		Self::deny(DenialKind::Unauthorized, reason)
	}

	pub fn forbidden(reason: &'static str) -> Self {
		Self::deny(DenialKind::Forbidden, reason)
	}

	pub fn not_found(reason: &'static str) -> Self {
		Self::deny(DenialKind::NotFound, reason)
	}

	pub fn is_allowed(&self) -> bool {
		matches!(self, Verdict::Allow)
	}

	pub fn denial_kind(&self) -> Option<DenialKind> {
		match self {
			Verdict::Allow => None,
			Verdict::Deny { kind, .. } => Some(*kind),
		}
	}

	/// Status a transport should answer with. `200 OK` for ALLOW means "pass
	/// the request on", not a literal response.
	pub fn status_code(&self) -> StatusCode {
		self.denial_kind()
			.map(DenialKind::status_code)
			.unwrap_or(StatusCode::OK)
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Verdict::Allow => f.write_str("allow"),
			Verdict::Deny { kind, reason } => write!(f, "deny ({kind}): {reason}"),
		}
	}
}
