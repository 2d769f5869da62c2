// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Atelier API server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`ATELIER_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use atelier_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod secret_env;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use secret_env::{load_secret_env, SecretEnvError};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use atelier_server_auth::SigningSecret;
use tracing::{debug, info};

/// Environment variable holding the token signing secret.
pub const AUTH_SECRET_ENV: &str = "ATELIER_SERVER_AUTH_SECRET";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub auth: AuthConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ATELIER_SERVER_*`)
/// 2. Config file (`/etc/atelier/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	let secret =
		load_secret_env(AUTH_SECRET_ENV).map_err(|e| ConfigError::Secret(e.to_string()))?;
	finalize(merged, secret)
}

/// Finalize a merged layer and the signing secret into resolved config.
pub fn finalize(
	layer: ServerConfigLayer,
	signing_secret: Option<SigningSecret>,
) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize(signing_secret);
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&http, &auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		token_ttl_secs = auth.token_ttl.as_secs(),
		lookup_timeout_ms = auth.lookup_timeout.as_millis() as u64,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		auth,
		database,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(http: &HttpConfig, auth: &AuthConfig) -> Result<(), ConfigError> {
	match &auth.signing_secret {
		Some(secret) if !secret.is_empty() => {}
		_ => {
			return Err(ConfigError::Validation(format!(
				"{AUTH_SECRET_ENV} (or {AUTH_SECRET_ENV}_FILE) must be set to a non-empty value"
			)))
		}
	}
	if auth.token_ttl.is_zero() {
		return Err(ConfigError::Validation(
			"token TTL must be greater than zero".to_string(),
		));
	}
	if auth.lookup_timeout.is_zero() {
		return Err(ConfigError::Validation(
			"lookup timeout must be greater than zero".to_string(),
		));
	}
	if http.body_limit_bytes == 0 {
		return Err(ConfigError::Validation(
			"request body limit must be greater than zero".to_string(),
		));
	}
	Ok(())
}
