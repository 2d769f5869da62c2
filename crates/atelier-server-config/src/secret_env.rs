// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secrets from the environment, with `*_FILE` support.
//!
//! `VAR_FILE` names a file holding the secret (Docker and Kubernetes secret
//! mounts); it takes precedence over `VAR`. A single trailing newline in the
//! file is stripped.

use std::path::PathBuf;
use std::{env, fs};

use atelier_server_auth::SigningSecret;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// Returns `Ok(None)` when neither variable is set or `VAR` is empty.
pub fn load_secret_env(var: &str) -> Result<Option<SigningSecret>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}
		let path = PathBuf::from(path_str);
		let mut content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;
		if content.ends_with('\n') {
			content.pop();
			if content.ends_with('\r') {
				content.pop();
			}
		}
		return Ok(Some(SigningSecret::new(content)));
	}

	Ok(env::var(var)
		.ok()
		.filter(|value| !value.is_empty())
		.map(SigningSecret::new))
}
