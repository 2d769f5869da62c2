// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixed route tables consulted before any ownership rule.

use http::Method;

/// Account registration. POST only, no token required.
pub const REGISTRATION_ROUTE: &str = "/users";

/// Credential exchange. POST only, no token required.
pub const LOGIN_ROUTE: &str = "/login";

/// POST routes that any authenticated caller with a sane subject may use.
pub const SYSTEM_POST_ROUTES: &[&str] = &[
	"/password-reset",
	"/password-reset/confirm",
	"/notifications/email",
	"/search",
	"/payments/setup-intent",
	"/payments/customers",
];

/// Paths served without authorization. Routers mount these outside the
/// authorization layer.
pub const UNGATED_PATHS: &[&str] = &["/", "/health"];

/// Strip trailing slashes, keeping the root path intact.
pub fn normalize_path(path: &str) -> &str {
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() {
		"/"
	} else {
		trimmed
	}
}

/// Whether the request skips token inspection entirely.
pub fn is_unauthenticated_route(method: &Method, path: &str) -> bool {
	if *method != Method::POST {
		return false;
	}
	let path = normalize_path(path);
	path == REGISTRATION_ROUTE || path == LOGIN_ROUTE
}

pub fn is_system_post_route(path: &str) -> bool {
	SYSTEM_POST_ROUTES.contains(&normalize_path(path))
}

pub fn is_ungated_path(path: &str) -> bool {
	UNGATED_PATHS.contains(&normalize_path(path))
}
